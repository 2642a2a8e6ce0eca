//! Page guard middleware.
//!
//! Runs before routing reaches any handler, so a redirected request never
//! touches the API. The decision depends on the session alone.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::debug;

use freshwash_core::GuardDecision;

use super::auth::current_user;
use crate::error::set_sentry_user;
use crate::state::AppState;

/// Apply the route guard table to the request path.
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let user = match request.extensions().get::<Session>() {
        Some(session) => current_user(session).await,
        None => None,
    };
    if let Some(user) = &user {
        set_sentry_user(user.id, Some(&user.email));
    }

    let path = request.uri().path();
    let role = user.as_ref().map(|u| u.role);
    let decision = state.guards().evaluate(path, role);

    match decision {
        GuardDecision::Public | GuardDecision::Authorized => {
            debug!(path, ?role, outcome = ?decision, "guard passed");
            next.run(request).await
        }
        GuardDecision::Redirect { to, reason } => {
            debug!(path, ?role, ?reason, to = %to, "guard redirected");
            Redirect::to(&to).into_response()
        }
    }
}
