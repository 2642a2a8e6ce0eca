//! Portal roles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of an authenticated portal user.
///
/// Serialized exactly as the laundry API emits it (`"OUTLET_ADMIN"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Company-wide administrator.
    Admin,
    /// Administrator of a single outlet.
    OutletAdmin,
    /// Outlet worker assigned to a washing, ironing or packing station.
    Worker,
    /// Pickup and delivery driver.
    Driver,
    /// End customer.
    Customer,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Admin,
        Self::OutletAdmin,
        Self::Worker,
        Self::Driver,
        Self::Customer,
    ];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::OutletAdmin => "OUTLET_ADMIN",
            Self::Worker => "WORKER",
            Self::Driver => "DRIVER",
            Self::Customer => "CUSTOMER",
        }
    }

    /// Whether this role belongs to outlet staff (workers and drivers).
    #[must_use]
    pub const fn is_employee(self) -> bool {
        matches!(self, Self::Worker | Self::Driver)
    }

    /// Landing page shown after login.
    #[must_use]
    pub const fn home_path(self) -> &'static str {
        match self {
            Self::Admin | Self::OutletAdmin => "/admin/dashboard",
            Self::Worker | Self::Driver => "/employee/orders",
            Self::Customer => "/user/orders",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known role.
#[derive(Debug, Clone, Error)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    /// Accepts the wire names case-insensitively, with `-` or `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| RoleParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&Role::OutletAdmin).unwrap();
        assert_eq!(json, "\"OUTLET_ADMIN\"");
        let role: Role = serde_json::from_str("\"DRIVER\"").unwrap();
        assert_eq!(role, Role::Driver);
    }

    #[test]
    fn test_role_from_str_is_lenient() {
        assert_eq!("outlet-admin".parse::<Role>().unwrap(), Role::OutletAdmin);
        assert_eq!("Worker".parse::<Role>().unwrap(), Role::Worker);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn test_home_paths() {
        assert_eq!(Role::Admin.home_path(), "/admin/dashboard");
        assert_eq!(Role::Driver.home_path(), "/employee/orders");
        assert_eq!(Role::Customer.home_path(), "/user/orders");
    }
}
