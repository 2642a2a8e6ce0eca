//! Customer address book.
//!
//! Addresses are read through the profile query, so every change marks
//! `["user", id]` stale.

use serde_json::Value;
use tracing::instrument;

use freshwash_core::{AddressId, UserId};

use super::{DataContext, profile};
use crate::api::types::{Address, NewAddress};
use crate::query::{Invalidation, Mutation, MutationOutcome, QueryState};

fn changed(name: &'static str, message: &str, user: UserId) -> Mutation {
    Mutation::new(name, message).invalidates(Invalidation::Exact(profile::key(user)))
}

/// Addresses of the signed-in user, primary first.
pub async fn list(ctx: &DataContext) -> QueryState<Vec<Address>> {
    profile::get(ctx).await.map(|profile| {
        let mut addresses = profile.addresses;
        addresses.sort_by_key(|a| !a.is_primary);
        addresses
    })
}

#[instrument(skip(ctx, address), fields(name = %address.address_name))]
pub async fn create(ctx: &DataContext, user: UserId, address: &NewAddress) -> MutationOutcome<Value> {
    let api = ctx.api();
    ctx.mutate(
        changed("create_address", "Address added.", user),
        api.post("/addresses", address),
    )
    .await
}

#[instrument(skip(ctx))]
pub async fn set_primary(ctx: &DataContext, user: UserId, id: AddressId) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/addresses/{id}/primary");
    ctx.mutate(
        changed("set_primary_address", "Primary address updated.", user),
        api.patch(&path, &serde_json::json!({})),
    )
    .await
}

#[instrument(skip(ctx))]
pub async fn delete(ctx: &DataContext, user: UserId, id: AddressId) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/addresses/{id}");
    ctx.mutate(
        changed("delete_address", "Address deleted.", user),
        api.delete(&path),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_changes_invalidate_profile_only() {
        let mutation = changed("delete_address", "Address deleted.", UserId::new(9));
        assert_eq!(
            mutation.invalidations(),
            &[Invalidation::Exact(profile::key(UserId::new(9)))]
        );
    }
}
