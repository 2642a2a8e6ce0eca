//! Staff accounts (ADMIN only).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use freshwash_core::{QueryKey, Role, UserId};

use super::{DataContext, blank_as_none};
use crate::api::types::{NewStaffUser, Paginated, StaffUser};
use crate::query::{Invalidation, Mutation, MutationOutcome, Query, QueryState};

const RESOURCE: &str = "admin-users";

/// List filter of `GET /admin-super`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub take: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub role: Option<Role>,
}

#[must_use]
pub fn list_key(filter: &UserFilter) -> QueryKey {
    QueryKey::new(RESOURCE).with(filter)
}

#[instrument(skip(ctx))]
pub async fn list(ctx: &DataContext, filter: &UserFilter) -> QueryState<Paginated<StaffUser>> {
    let api = ctx.api();
    ctx.query(Query::new(list_key(filter), || api.get_json("/admin-super", filter)))
        .await
}

#[instrument(skip(ctx, user), fields(email = %user.email, role = %user.role))]
pub async fn create(ctx: &DataContext, user: &NewStaffUser) -> MutationOutcome<Value> {
    let api = ctx.api();
    ctx.mutate(
        Mutation::new("create_user", "User created.")
            .invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE))),
        api.post("/admin-super", user),
    )
    .await
}

#[instrument(skip(ctx))]
pub async fn delete(ctx: &DataContext, id: UserId) -> MutationOutcome<Value> {
    let api = ctx.api();
    let path = format!("/admin-super/{id}");
    ctx.mutate(
        Mutation::new("delete_user", "User deleted.")
            .invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE))),
        api.delete(&path),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_produce_distinct_keys() {
        let all = UserFilter::default();
        let drivers = UserFilter {
            role: Some(Role::Driver),
            ..UserFilter::default()
        };
        assert_eq!(list_key(&all), list_key(&UserFilter::default()));
        assert_ne!(list_key(&all), list_key(&drivers));
        assert!(list_key(&drivers).starts_with(&QueryKey::new(RESOURCE)));
    }
}
