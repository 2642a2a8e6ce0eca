//! Mutation descriptors and their user-facing outcome.

use serde::{Deserialize, Serialize};

use freshwash_core::QueryKey;

use crate::api::ApiError;

/// Cached queries a mutation makes stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// Only this key.
    Exact(QueryKey),
    /// This key and every key that extends it.
    Prefix(QueryKey),
}

impl Invalidation {
    /// Whether a cached `key` is covered.
    #[must_use]
    pub fn covers(&self, key: &QueryKey) -> bool {
        match self {
            Self::Exact(target) => key == target,
            Self::Prefix(prefix) => key.starts_with(prefix),
        }
    }
}

/// A state-changing API call with its success effects.
#[derive(Debug, Clone)]
pub struct Mutation {
    pub(crate) name: &'static str,
    pub(crate) success_message: String,
    pub(crate) invalidates: Vec<Invalidation>,
}

impl Mutation {
    pub fn new(name: &'static str, success_message: impl Into<String>) -> Self {
        Self {
            name,
            success_message: success_message.into(),
            invalidates: Vec::new(),
        }
    }

    /// Declare a dependent query.
    #[must_use]
    pub fn invalidates(mut self, target: Invalidation) -> Self {
        self.invalidates.push(target);
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn invalidations(&self) -> &[Invalidation] {
        &self.invalidates
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Error,
}

/// One-shot notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }
}

/// What a mutation produced: the API result plus the toast to show.
#[derive(Debug, Clone)]
pub struct MutationOutcome<T> {
    pub result: Result<T, ApiError>,
    pub toast: Toast,
}

impl<T> MutationOutcome<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshwash_core::UserId;

    #[test]
    fn test_exact_covers_only_itself() {
        let user = QueryKey::new("user").with(&UserId::new(5));
        let target = Invalidation::Exact(user.clone());
        assert!(target.covers(&user));
        assert!(!target.covers(&user.clone().with("addresses")));
        assert!(!target.covers(&QueryKey::new("user").with(&UserId::new(6))));
    }

    #[test]
    fn test_prefix_covers_family() {
        let target = Invalidation::Prefix(QueryKey::new("orders"));
        assert!(target.covers(&QueryKey::new("orders")));
        assert!(target.covers(&QueryKey::new("orders").with(&1)));
        assert!(!target.covers(&QueryKey::new("order").with(&1)));
    }

    #[test]
    fn test_toast_serde_shape() {
        let json = serde_json::to_value(Toast::success("Saved")).unwrap();
        assert_eq!(json, serde_json::json!({ "level": "success", "message": "Saved" }));
    }
}
