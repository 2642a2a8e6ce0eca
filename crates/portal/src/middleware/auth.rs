//! Session accessor and authentication extractors.
//!
//! The session holds two values written at login: the [`CurrentUser`] and
//! the API access token. Everything that needs "who is signed in" reads it
//! through this module.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use tower_sessions::Session;
use tracing::warn;

use freshwash_core::guard::LOGIN_PATH;

use crate::models::{CurrentUser, session_keys};

/// The signed-in user, if any.
///
/// A session that cannot be read counts as signed out.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    match session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "failed to read current user from session");
            None
        }
    }
}

/// The API token stored at login.
pub async fn access_token(session: &Session) -> Option<SecretString> {
    match session.get::<String>(session_keys::ACCESS_TOKEN).await {
        Ok(token) => token.map(SecretString::from),
        Err(e) => {
            warn!(error = %e, "failed to read access token from session");
            None
        }
    }
}

/// Record a successful login.
///
/// The session ID is rotated first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn sign_in(
    session: &Session,
    user: &CurrentUser,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await?;
    session.insert(session_keys::ACCESS_TOKEN, token).await?;
    Ok(())
}

/// Forget the signed-in user.
///
/// # Errors
///
/// Returns an error if the session store cannot delete the record.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Extractor for the optional signed-in user.
///
/// Never rejects; pages that render for everyone use this.
pub struct SessionUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await,
            None => None,
        };
        Ok(Self(user))
    }
}

/// Extractor that requires a signed-in user.
///
/// Role checks happen in the route guard; this only guarantees identity.
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Rejection when no user is signed in.
#[derive(Debug)]
pub struct RedirectToLogin;

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = RedirectToLogin;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let SessionUser(user) = SessionUser::from_request_parts(parts, state)
            .await
            .unwrap_or(SessionUser(None));
        user.map(Self).ok_or(RedirectToLogin)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use secrecy::ExposeSecret;
    use tower_sessions::MemoryStore;

    use freshwash_core::{OutletId, Role, UserId};

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn worker() -> CurrentUser {
        CurrentUser {
            id: UserId::new(12),
            email: "worker@freshwash.test".to_string(),
            name: "Wati".to_string(),
            role: Role::Worker,
            outlet_id: Some(OutletId::new(3)),
        }
    }

    #[tokio::test]
    async fn test_empty_session_is_signed_out() {
        let session = session();
        assert!(current_user(&session).await.is_none());
        assert!(access_token(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_sign_in_then_out() {
        let session = session();
        sign_in(&session, &worker(), "tok-123").await.unwrap();

        assert_eq!(current_user(&session).await, Some(worker()));
        assert_eq!(
            access_token(&session).await.unwrap().expose_secret(),
            "tok-123"
        );

        sign_out(&session).await.unwrap();
        assert!(current_user(&session).await.is_none());
    }
}
