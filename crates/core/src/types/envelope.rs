//! The API's error envelope.
//!
//! Failed requests answer with `{ "reasons": [{ "message": "..." }] }`. The
//! first reason is what the user gets to see.

use serde::{Deserialize, Serialize};

/// Text shown when a failure carries no usable reason.
pub const FALLBACK_ERROR_MESSAGE: &str = "Đã có lỗi xảy ra, vui lòng thử lại sau";

/// A single structured error reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    #[serde(default)]
    pub message: String,
}

/// Error body returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub reasons: Vec<Reason>,
}

impl ErrorEnvelope {
    /// Parse an error body, tolerating anything that isn't an envelope.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// The first non-blank reason message, if any.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.reasons
            .iter()
            .map(|r| r.message.trim())
            .find(|m| !m.is_empty())
    }

    /// The message to surface to the user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        self.first_message().unwrap_or(FALLBACK_ERROR_MESSAGE)
    }
}
