//! Sales report (ADMIN, OUTLET_ADMIN). Computation happens in the API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use freshwash_core::{OutletId, QueryKey};

use super::{DataContext, blank_as_none};
use crate::api::types::{DateRange, ReportGrouping, SalesReport};
use crate::query::{Query, QueryState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub to: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub outlet_id: Option<OutletId>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub group_by: Option<ReportGrouping>,
}

impl SalesFilter {
    /// The requested range, if both ends are present.
    #[must_use]
    pub fn range(&self) -> Option<DateRange> {
        Some(DateRange {
            from: self.from?,
            to: self.to?,
        })
    }
}

/// Sales report; disabled until a range with `from <= to` is chosen.
#[instrument(skip(ctx))]
pub async fn sales(ctx: &DataContext, filter: &SalesFilter) -> QueryState<SalesReport> {
    let outlet = ctx.outlet_scope(filter.outlet_id);
    let filter = SalesFilter {
        outlet_id: outlet.outlet_id(),
        group_by: Some(filter.group_by.unwrap_or_default()),
        ..filter.clone()
    };
    let enabled = !outlet.is_denied() && filter.range().is_some_and(|r| r.is_valid());
    let api = ctx.api();
    ctx.query(
        Query::new(QueryKey::new("sales-report").with(&filter), || {
            api.get_json("/reports/sales", &filter)
        })
        .enabled(enabled),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_requires_both_ends() {
        let date = |s: &str| s.parse::<NaiveDate>().ok();
        let mut filter = SalesFilter {
            from: date("2024-01-01"),
            ..SalesFilter::default()
        };
        assert!(filter.range().is_none());

        filter.to = date("2023-12-31");
        assert!(!filter.range().unwrap().is_valid());

        filter.to = date("2024-01-31");
        assert!(filter.range().unwrap().is_valid());
    }
}
