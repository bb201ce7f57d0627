use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::PostSummary;

/// Server-side ordering of the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    /// Newest first (descending `created_at`).
    #[default]
    Latest,
    /// Most liked first (descending `like_count`).
    Popular,
}

impl FeedFilter {
    /// Value of the `isPopular` listing flag.
    pub fn is_popular(self) -> bool {
        matches!(self, FeedFilter::Popular)
    }

    /// Value of the `isNew` listing flag.
    pub fn is_new(self) -> bool {
        matches!(self, FeedFilter::Latest)
    }

    /// Sort posts the way the server orders them for this filter.
    pub fn sort(self, posts: &mut [PostSummary]) {
        match self {
            FeedFilter::Latest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            FeedFilter::Popular => posts.sort_by(|a, b| b.like_count.cmp(&a.like_count)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeedFilter::Latest => "latest",
            FeedFilter::Popular => "popular",
        }
    }
}

impl fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" | "new" => Ok(FeedFilter::Latest),
            "popular" => Ok(FeedFilter::Popular),
            other => Err(format!("unknown feed filter: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_flag_set() {
        for filter in [FeedFilter::Latest, FeedFilter::Popular] {
            assert_ne!(filter.is_new(), filter.is_popular());
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Popular".parse::<FeedFilter>(), Ok(FeedFilter::Popular));
        assert_eq!("latest".parse::<FeedFilter>(), Ok(FeedFilter::Latest));
        assert!("trending".parse::<FeedFilter>().is_err());
    }
}
