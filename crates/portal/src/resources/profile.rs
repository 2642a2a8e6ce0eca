//! Customer profile. The profile also carries the address book.

use serde_json::Value;
use tracing::instrument;

use freshwash_core::{QueryKey, UserId};

use super::DataContext;
use crate::api::types::{ProfileUpdate, UserProfile};
use crate::query::{Invalidation, Mutation, MutationOutcome, Query, QueryState};

/// `["user", id]`
#[must_use]
pub fn key(id: UserId) -> QueryKey {
    QueryKey::new("user").with(&id)
}

/// Profile of the signed-in user; disabled when nobody is signed in.
#[instrument(skip(ctx))]
pub async fn get(ctx: &DataContext) -> QueryState<UserProfile> {
    let Some(id) = ctx.user().map(|u| u.id) else {
        return QueryState::Disabled;
    };
    let api = ctx.api();
    let path = format!("/users/{id}");
    ctx.query(Query::new(key(id), || api.get_json(&path, &())))
        .await
}

#[instrument(skip(ctx, update))]
pub async fn update(ctx: &DataContext, id: UserId, update: &ProfileUpdate) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/users/{id}");
    ctx.mutate(
        Mutation::new("update_profile", "Profile updated.")
            .invalidates(Invalidation::Exact(key(id))),
        api.patch(&path, update),
    )
    .await
}
