//! Attendance: employees check in and out; admins read the history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use freshwash_core::{OutletId, QueryKey};

use super::{DataContext, blank_as_none};
use crate::api::types::{Attendance, Paginated};
use crate::query::{Invalidation, Mutation, MutationOutcome, Query, QueryState};

const RESOURCE: &str = "attendance";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub take: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub to: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub outlet_id: Option<OutletId>,
}

impl AttendanceFilter {
    /// A range with `from` after `to` matches nothing.
    #[must_use]
    pub fn has_valid_range(&self) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }
}

/// Attendance records. Employees get their own; admins see their scope.
#[instrument(skip(ctx))]
pub async fn history(
    ctx: &DataContext,
    filter: &AttendanceFilter,
) -> QueryState<Paginated<Attendance>> {
    let outlet = ctx.outlet_scope(filter.outlet_id);
    let filter = AttendanceFilter {
        outlet_id: outlet.outlet_id(),
        ..filter.clone()
    };
    let api = ctx.api();
    ctx.query(
        Query::new(QueryKey::new(RESOURCE).with(&filter), || {
            api.get_json("/attendance", &filter)
        })
        .enabled(!outlet.is_denied() && filter.has_valid_range()),
    )
    .await
}

fn changed(name: &'static str, message: &str) -> Mutation {
    Mutation::new(name, message).invalidates(Invalidation::Prefix(QueryKey::new(RESOURCE)))
}

#[instrument(skip(ctx))]
pub async fn check_in(ctx: &DataContext) -> MutationOutcome<Value> {
    let api = ctx.api();
    ctx.mutate(
        changed("check_in", "Checked in."),
        api.post("/attendance/check-in", &serde_json::json!({})),
    )
    .await
}

#[instrument(skip(ctx))]
pub async fn check_out(ctx: &DataContext) -> MutationOutcome<Value> {
    let api = ctx.api();
    ctx.mutate(
        changed("check_out", "Checked out."),
        api.post("/attendance/check-out", &serde_json::json!({})),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validity() {
        let date = |s: &str| s.parse::<NaiveDate>().ok();
        let mut filter = AttendanceFilter::default();
        assert!(filter.has_valid_range());

        filter.from = date("2024-05-02");
        filter.to = date("2024-05-01");
        assert!(!filter.has_valid_range());

        filter.to = date("2024-05-02");
        assert!(filter.has_valid_range());
    }
}
