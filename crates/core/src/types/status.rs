//! Status enums for laundry entities.
//!
//! The portal only displays and filters on these values; transitions are
//! decided by the laundry API.

use serde::{Deserialize, Serialize};

/// Stage of a laundry order, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    WaitingForPickupDriver,
    OnTheWayToOutlet,
    ArrivedAtOutlet,
    ReadyForWashing,
    BeingWashed,
    BeingIroned,
    BeingPacked,
    WaitingForPayment,
    ReadyForDelivery,
    BeingDeliveredToCustomer,
    DeliveredToCustomer,
    Completed,
}

impl OrderStatus {
    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WaitingForPickupDriver => "Waiting for pickup driver",
            Self::OnTheWayToOutlet => "On the way to outlet",
            Self::ArrivedAtOutlet => "Arrived at outlet",
            Self::ReadyForWashing => "Ready for washing",
            Self::BeingWashed => "Being washed",
            Self::BeingIroned => "Being ironed",
            Self::BeingPacked => "Being packed",
            Self::WaitingForPayment => "Waiting for payment",
            Self::ReadyForDelivery => "Ready for delivery",
            Self::BeingDeliveredToCustomer => "Being delivered",
            Self::DeliveredToCustomer => "Delivered",
            Self::Completed => "Completed",
        }
    }

    /// Whether the customer can confirm receipt of an order in this state.
    #[must_use]
    pub const fn awaits_customer_confirmation(self) -> bool {
        matches!(self, Self::DeliveredToCustomer)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Processing station a worker is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerStation {
    Washing,
    Ironing,
    Packing,
}

impl std::fmt::Display for WorkerStation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Washing => write!(f, "Washing"),
            Self::Ironing => write!(f, "Ironing"),
            Self::Packing => write!(f, "Packing"),
        }
    }
}

/// Approval state of a bypass request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BypassStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for BypassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// State of a driver pickup or delivery job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Available,
    Taken,
    Completed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "Available"),
            Self::Taken => write!(f, "Taken"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}
