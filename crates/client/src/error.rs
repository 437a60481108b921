//! Failure taxonomy for requests to the frame.
//!
//! The UI only ever sees [`FrameApiError::user_message`]; the variants
//! exist so the message and the log line can be chosen per failure kind.

/// Shown when the frame cannot be reached at all (timeout, refused, DNS).
pub const MSG_CANNOT_REACH: &str = "Cannot reach the picture frame right now.";

/// Shown when the frame answered with a status the operation does not accept.
pub const MSG_UNEXPECTED_RESPONSE: &str = "The frame returned an unexpected response.";

/// Errors from the frame REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum FrameApiError {
    /// The frame could not be reached: connect failure or timeout.
    #[error("Frame unreachable: {0}")]
    Connectivity(#[source] reqwest::Error),

    /// Any other transport-level failure (builder, body read, redirect loop).
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The frame returned a status the operation does not accept.
    #[error("Frame API error ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body was not the JSON the operation expected.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot carry an API path.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FrameApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Connectivity(err)
        } else {
            Self::Request(err)
        }
    }
}

impl FrameApiError {
    /// Text published to the UI for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Connectivity(_) => MSG_CANNOT_REACH.to_string(),
            Self::UnexpectedStatus { .. } => MSG_UNEXPECTED_RESPONSE.to_string(),
            Self::Decode(err) => err.to_string(),
            Self::Request(err) => err.to_string(),
            Self::InvalidUrl(_) => self.to_string(),
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}
