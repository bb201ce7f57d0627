use std::str::FromStr;

use wander_core::domain::{FeedFilter, PostId};

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Filter(FeedFilter),
    Scroll,
    Retry,
    Like(PostId),
    /// Empty text resubmits the draft kept from a failed attempt.
    Comment(PostId, String),
    Open(PostId),
    Back,
    Login { username: String, password: String },
    Logout,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  latest | popular         switch feed ordering
  scroll                   move down one screen (loads more near the end)
  retry                    retry the failed request
  like <id>                toggle your like on a post
  comment <id> <text>      comment on a post
  open <id>                show a post with its comments
  back                     return to the feed
  login <user> <pass>      sign in
  logout                   sign out
  quit                     exit";

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let post_id = || {
            rest.split_whitespace()
                .next()
                .map(PostId::from)
                .ok_or_else(|| format!("usage: {word} <id>"))
        };

        match word.to_ascii_lowercase().as_str() {
            "latest" | "new" => Ok(Command::Filter(FeedFilter::Latest)),
            "popular" => Ok(Command::Filter(FeedFilter::Popular)),
            "scroll" | "s" | "" => Ok(Command::Scroll),
            "retry" | "r" => Ok(Command::Retry),
            "like" => post_id().map(Command::Like),
            "open" => post_id().map(Command::Open),
            "comment" => {
                let id = post_id()?;
                let text = rest
                    .split_once(char::is_whitespace)
                    .map(|(_, text)| text.trim().to_string())
                    .unwrap_or_default();
                Ok(Command::Comment(id, text))
            }
            "back" | "b" => Ok(Command::Back),
            "login" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some(username), Some(password)) => Ok(Command::Login {
                        username: username.to_string(),
                        password: password.to_string(),
                    }),
                    _ => Err("usage: login <user> <pass>".to_string()),
                }
            }
            "logout" => Ok(Command::Logout),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command: {other} (try 'help')")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("popular".parse::<Command>(), Ok(Command::Filter(FeedFilter::Popular)));
        assert_eq!("".parse::<Command>(), Ok(Command::Scroll));
        assert_eq!("like p1".parse::<Command>(), Ok(Command::Like(PostId::new("p1"))));
        assert_eq!(
            "comment p1   what a view!".parse::<Command>(),
            Ok(Command::Comment(PostId::new("p1"), "what a view!".to_string()))
        );
        assert_eq!(
            "comment p1".parse::<Command>(),
            Ok(Command::Comment(PostId::new("p1"), String::new()))
        );
        assert_eq!(
            "login sarah secret1".parse::<Command>(),
            Ok(Command::Login {
                username: "sarah".to_string(),
                password: "secret1".to_string()
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("like".parse::<Command>().is_err());
        assert!("login sarah".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }
}
