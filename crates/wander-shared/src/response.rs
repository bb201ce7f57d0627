//! Error bodies returned by the posts API.

use serde::{Deserialize, Serialize};

/// Error body of a failed request.
///
/// The server answers either with a plain `{ "message": ... }` object or with
/// RFC 7807 problem details; both shapes fit here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// A short, human-readable summary of the problem type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// A human-readable explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// The most specific message the body carries.
    pub fn summary(&self) -> Option<&str> {
        [&self.message, &self.detail, &self.title, &self.error]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|text| !text.trim().is_empty())
    }
}
