//! Login and logout against the laundry API.

use serde_json::Value;
use tracing::{instrument, warn};

use super::DataContext;
use crate::api::types::{LoginRequest, LoginResponse};
use crate::query::{Mutation, MutationOutcome};

/// Exchange credentials for a user and access token.
///
/// Nothing is cached before login, so nothing is invalidated.
#[instrument(skip(ctx, request), fields(email = %request.email))]
pub async fn login(ctx: &DataContext, request: &LoginRequest) -> MutationOutcome<LoginResponse> {
    let api = ctx.api();
    ctx.mutate(
        Mutation::new("login", "Signed in successfully."),
        api.post("/auth/login", request),
    )
    .await
}

/// Tell the API the token is done. Failure only gets logged.
#[instrument(skip(ctx))]
pub async fn logout(ctx: &DataContext) {
    if !ctx.api().is_authenticated() {
        return;
    }
    if let Err(e) = ctx
        .api()
        .post::<Value, _>("/auth/logout", &serde_json::json!({}))
        .await
    {
        warn!(error = %e, "API logout failed");
    }
}
