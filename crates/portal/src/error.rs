//! Unified error handling with Sentry integration.
//!
//! Handlers that cannot degrade to an inline error banner return
//! `Result<T, AppError>`. Server-side failures are captured to Sentry before
//! the response is written; clients only see a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use freshwash_core::{UserId, guard::LOGIN_PATH};

use crate::api::{ApiError, ApiErrorKind, GENERIC_ERROR_MESSAGE};

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// Laundry API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_side(&self) -> bool {
        match self {
            Self::Api(err) => matches!(
                err.kind(),
                ApiErrorKind::Server | ApiErrorKind::Network | ApiErrorKind::Decode
            ),
            Self::Session(_) | Self::Internal(_) => true,
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) => match err.kind() {
                ApiErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
                ApiErrorKind::Forbidden => StatusCode::FORBIDDEN,
                ApiErrorKind::NotFound => StatusCode::NOT_FOUND,
                ApiErrorKind::Client => StatusCode::BAD_REQUEST,
                ApiErrorKind::Server | ApiErrorKind::Network | ApiErrorKind::Decode => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_side() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Portal request error"
            );
        }

        // An expired API token sends the user back through login.
        if let Self::Api(err) = &self
            && err.is_unauthenticated()
        {
            return Redirect::to(LOGIN_PATH).into_response();
        }

        let message = match &self {
            Self::Api(err) => err.user_message(),
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
            Self::Session(_) | Self::Internal(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        };

        (self.status(), message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate Sentry events of this request with a user.
pub fn set_sentry_user(user_id: UserId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: Option<&str>) -> AppError {
        AppError::Api(ApiError::Status {
            path: "/orders".to_string(),
            status,
            message: message.map(String::from),
        })
    }

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order abc".to_string());
        assert_eq!(err.to_string(), "Not found: order abc");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(status_of(api(403, None)), StatusCode::FORBIDDEN);
        assert_eq!(status_of(api(404, None)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(api(422, Some("bad"))), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(api(500, None)), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_of(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_expired_token_redirects_to_login() {
        let response = api(401, None).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], LOGIN_PATH);
    }

    #[test]
    fn test_server_side_classification() {
        assert!(api(502, None).is_server_side());
        assert!(!api(404, None).is_server_side());
        assert!(AppError::Internal("x".to_string()).is_server_side());
        assert!(!AppError::BadRequest("x".to_string()).is_server_side());
    }
}
