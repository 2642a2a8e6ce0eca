//! Request and response types of the laundry REST API.
//!
//! Field names follow the API's camelCase JSON.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use freshwash_core::{
    AddressId, AttendanceId, BypassRequestId, BypassStatus, DeliveryId, ItemId, JobStatus,
    OrderStatus, OrderUuid, OutletId, PickupId, Role, UserId, WorkerStation,
};

// =============================================================================
// Envelopes
// =============================================================================

/// Pagination metadata of list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub take: u32,
    pub total: u64,
}

impl PageMeta {
    /// Number of pages, at least one.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        if self.take == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.take)).max(1)
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.page_count()
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// A page of results: `{ "data": [...], "meta": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Page selection shared by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "Pagination::first_page")]
    pub page: u32,
    #[serde(default = "Pagination::default_take")]
    pub take: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::first_page(),
            take: Self::default_take(),
        }
    }
}

impl Pagination {
    const MAX_TAKE: u32 = 100;

    const fn first_page() -> u32 {
        1
    }

    const fn default_take() -> u32 {
        10
    }

    /// Clamp user-supplied values into the range the API accepts.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            take: self.take.clamp(1, Self::MAX_TAKE),
        }
    }
}

// =============================================================================
// Auth & users
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: AuthUser,
    pub access_token: String,
}

/// Identity returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub fullname: String,
    pub role: Role,
    #[serde(default)]
    pub outlet_id: Option<OutletId>,
}

/// Staff account as listed by `/admin-super`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    pub id: UserId,
    pub email: String,
    pub fullname: String,
    pub role: Role,
    #[serde(default)]
    pub outlet_name: Option<String>,
    #[serde(default)]
    pub station: Option<WorkerStation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaffUser {
    pub email: String,
    pub fullname: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlet_id: Option<OutletId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<WorkerStation>,
}

/// Customer profile, including saved addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub fullname: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub fullname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub address_name: String,
    pub address_line: String,
    pub city: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub address_name: String,
    pub address_line: String,
    pub city: String,
    #[serde(default)]
    pub is_primary: bool,
}

// =============================================================================
// Outlets & items
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outlet {
    pub id: OutletId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOutlet {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Kind of garment the outlets accept (shirt, trousers, bed sheet, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaundryItem {
    pub id: ItemId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLaundryItem {
    pub name: String,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub outlet_name: Option<String>,
    #[serde(default)]
    pub total_weight: Option<Decimal>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub pickup_address: Option<String>,
}

/// Weighing and pricing done by the outlet admin on arrival.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOrder {
    pub total_weight: Decimal,
    pub items: Vec<ProcessOrderLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOrderLine {
    pub item_id: ItemId,
    pub quantity: u32,
}

// =============================================================================
// Worker stations & drivers
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationTask {
    pub order_uuid: OrderUuid,
    pub order_number: String,
    pub station: WorkerStation,
    pub status: OrderStatus,
    #[serde(default)]
    pub bypass_pending: bool,
    pub created_at: DateTime<Utc>,
}

/// Item counts checked by the worker before handing the order on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteStation {
    pub station: WorkerStation,
    pub items: Vec<ProcessOrderLine>,
}

/// A pickup or delivery job for drivers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverJob<I> {
    pub id: I,
    pub order_uuid: OrderUuid,
    pub order_number: String,
    pub customer_name: String,
    pub address: String,
    pub status: JobStatus,
    #[serde(default)]
    pub distance_km: Option<Decimal>,
}

pub type PickupJob = DriverJob<PickupId>;
pub type DeliveryJob = DriverJob<DeliveryId>;

// =============================================================================
// Attendance & bypass requests
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: AttendanceId,
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub outlet_name: Option<String>,
    pub check_in: DateTime<Utc>,
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BypassRequest {
    pub id: BypassRequestId,
    pub order_uuid: OrderUuid,
    #[serde(default)]
    pub order_number: Option<String>,
    pub station: WorkerStation,
    pub reason: String,
    pub status: BypassStatus,
    #[serde(default)]
    pub worker_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBypassRequest {
    pub order_uuid: OrderUuid,
    pub station: WorkerStation,
    pub reason: String,
}

// =============================================================================
// Reports
// =============================================================================

/// How sales rows are bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportGrouping {
    #[default]
    Day,
    Month,
    Year,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub total_orders: u64,
    pub total_revenue: Decimal,
    #[serde(default)]
    pub rows: Vec<SalesRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRow {
    pub period: String,
    #[serde(default)]
    pub outlet_name: Option<String>,
    pub orders: u64,
    pub revenue: Decimal,
}

/// Inclusive date range used by reports and attendance history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Whether `from` is not after `to`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.from <= self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_meta_navigation() {
        let meta = PageMeta {
            page: 1,
            take: 10,
            total: 25,
        };
        assert_eq!(meta.page_count(), 3);
        assert!(meta.has_next());
        assert!(!meta.has_previous());

        let last = PageMeta { page: 3, ..meta };
        assert!(!last.has_next());
        assert!(last.has_previous());

        let empty = PageMeta {
            page: 1,
            take: 10,
            total: 0,
        };
        assert_eq!(empty.page_count(), 1);
        assert!(!empty.has_next());
    }

    #[test]
    fn test_pagination_normalized() {
        let p = Pagination { page: 0, take: 500 }.normalized();
        assert_eq!(p, Pagination { page: 1, take: 100 });
    }

    #[test]
    fn test_order_detail_flattens_order() {
        let json = serde_json::json!({
            "uuid": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "orderNumber": "FW-0001",
            "status": "BEING_WASHED",
            "totalPrice": "45000",
            "createdAt": "2026-10-01T08:00:00Z",
            "items": [{ "itemName": "Kemeja", "quantity": 3 }]
        });
        let detail: OrderDetail = serde_json::from_value(json).unwrap();
        assert_eq!(detail.order.order_number, "FW-0001");
        assert_eq!(detail.order.status, OrderStatus::BeingWashed);
        assert_eq!(detail.order.total_price, Some(Decimal::new(45000, 0)));
        assert_eq!(detail.items.len(), 1);
        assert!(!detail.order.is_paid);
    }

    #[test]
    fn test_date_range_validity() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();
        assert!(DateRange { from: day(1), to: day(1) }.is_valid());
        assert!(!DateRange { from: day(2), to: day(1) }.is_valid());
    }
}
