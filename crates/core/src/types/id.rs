//! Newtype IDs for type-safe entity references.
//!
//! The laundry API identifies most records with integer ids; orders are the
//! exception and travel as UUIDs (see [`OrderUuid`]).

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>`, `Into<i32>` and `FromStr`
///
/// # Example
///
/// ```rust
/// # use freshwash_core::define_id;
/// define_id!(ShiftId);
/// define_id!(TicketId);
///
/// let shift = ShiftId::new(1);
/// let ticket: TicketId = "7".parse().unwrap();
/// assert_eq!(ticket.as_i32(), 7);
///
/// // These are different types, so this won't compile:
/// // let _: ShiftId = ticket;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(AddressId);
define_id!(OutletId);
define_id!(ItemId);
define_id!(PickupId);
define_id!(DeliveryId);
define_id!(AttendanceId);
define_id!(BypassRequestId);

/// Public identifier of a laundry order.
///
/// Orders are addressed by UUID in every API path (`/orders/confirm/{uuid}`),
/// never by their numeric database id.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct OrderUuid(uuid::Uuid);

impl OrderUuid {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl core::fmt::Display for OrderUuid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

impl core::str::FromStr for OrderUuid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s.trim()).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parse_and_display() {
        let id: AddressId = " 42 ".parse().unwrap();
        assert_eq!(id, AddressId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<AddressId>().is_err());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&UserId::new(5)).unwrap();
        assert_eq!(json, "5");
        let back: UserId = serde_json::from_str("5").unwrap();
        assert_eq!(back, UserId::new(5));
    }

    #[test]
    fn test_order_uuid_roundtrip() {
        let raw = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let uuid: OrderUuid = raw.parse().unwrap();
        assert_eq!(uuid.to_string(), raw);
        assert!("not-a-uuid".parse::<OrderUuid>().is_err());
    }
}
