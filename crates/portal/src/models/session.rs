//! Session-related types for portal authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use freshwash_core::{OutletId, Role, UserId};

use crate::api::types::AuthUser;
use crate::query::CacheScope;

/// Session-stored identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// API access token lives under its own key so it never ends up in logs
/// through `Debug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's API id.
    pub id: UserId,
    pub email: String,
    /// Display name.
    pub name: String,
    pub role: Role,
    /// Outlet the user works at (outlet admins, workers, drivers).
    pub outlet_id: Option<OutletId>,
}

impl CurrentUser {
    /// Cache partition for this user's query results.
    #[must_use]
    pub const fn cache_scope(&self) -> CacheScope {
        CacheScope::User(self.id)
    }
}

impl From<AuthUser> for CurrentUser {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.fullname,
            role: user.role,
            outlet_id: user.outlet_id,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the laundry API access token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for queued toast notifications.
    pub const FLASH: &str = "flash";
}
