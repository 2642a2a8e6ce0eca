//! Laundry API errors.

use thiserror::Error;

/// Message shown when the API gives us nothing better.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when calling the laundry REST API.
///
/// `Clone` so that one failed in-flight request can be reported to every
/// caller waiting on the same cache key.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("API request to {path} failed: {message}")]
    Transport { path: String, message: String },

    /// The response body was not what we expected.
    #[error("API response from {path} could not be decoded: {message}")]
    Decode { path: String, message: String },

    /// The API answered with a non-success status.
    #[error("API returned {status} for {path}")]
    Status {
        path: String,
        status: u16,
        /// `message` field of the error body, if any.
        message: Option<String>,
    },

    /// The endpoint path could not be joined onto the base URL.
    #[error("invalid API path: {0}")]
    InvalidPath(String),
}

/// Coarse classification used by views and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    Client,
    Server,
    Network,
    Decode,
}

impl ApiError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Transport { .. } => ApiErrorKind::Network,
            Self::Decode { .. } => ApiErrorKind::Decode,
            Self::InvalidPath(_) => ApiErrorKind::Client,
            Self::Status { status, .. } => match *status {
                401 => ApiErrorKind::Unauthenticated,
                403 => ApiErrorKind::Forbidden,
                404 => ApiErrorKind::NotFound,
                400..=499 => ApiErrorKind::Client,
                _ => ApiErrorKind::Server,
            },
        }
    }

    /// Message safe to show to the user. Never empty.
    ///
    /// Any non-blank `message` the API put in its error body is shown as is,
    /// whatever the status. Bodies without one, network and decode failures
    /// get the generic text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.trim().to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the API rejected our access token.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self.kind(), ApiErrorKind::Unauthenticated)
    }

    pub(crate) fn transport(path: &str, err: &reqwest::Error) -> Self {
        Self::Transport {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(path: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, message: Option<&str>) -> ApiError {
        ApiError::Status {
            path: "/orders".to_string(),
            status,
            message: message.map(String::from),
        }
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(status(401, None).kind(), ApiErrorKind::Unauthenticated);
        assert_eq!(status(403, None).kind(), ApiErrorKind::Forbidden);
        assert_eq!(status(404, None).kind(), ApiErrorKind::NotFound);
        assert_eq!(status(422, None).kind(), ApiErrorKind::Client);
        assert_eq!(status(502, None).kind(), ApiErrorKind::Server);
        assert_eq!(
            ApiError::decode("/orders", "eof").kind(),
            ApiErrorKind::Decode
        );
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        assert_eq!(
            status(400, Some("Address already exists")).user_message(),
            "Address already exists"
        );
    }

    #[test]
    fn test_user_message_shows_server_error_text() {
        assert_eq!(
            status(500, Some(" Outlet is closed for maintenance ")).user_message(),
            "Outlet is closed for maintenance"
        );
        assert_eq!(
            status(503, Some("Laundry machines are offline")).user_message(),
            "Laundry machines are offline"
        );
    }

    #[test]
    fn test_user_message_falls_back() {
        assert_eq!(status(400, None).user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(status(400, Some("   ")).user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(status(500, None).user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(status(503, Some("")).user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(
            ApiError::decode("/orders", "eof").user_message(),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(
            ApiError::InvalidPath("::".to_string()).user_message(),
            GENERIC_ERROR_MESSAGE
        );
    }
}
