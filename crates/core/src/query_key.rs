//! Cache keys for API queries.
//!
//! A [`QueryKey`] is an ordered list of parts, each stored as compact JSON.
//! Parameter structs are encoded through `serde_json::Value`, whose object
//! maps are sorted, so two deep-equal parameter values always produce the
//! same key regardless of field order, and any differing field produces a
//! different one.
//!
//! ```rust
//! use freshwash_core::QueryKey;
//!
//! let a = QueryKey::new("orders").with(&serde_json::json!({ "page": 1, "status": null }));
//! let b = QueryKey::new("orders").with(&serde_json::json!({ "status": null, "page": 1 }));
//! assert_eq!(a, b);
//! assert!(a.starts_with(&QueryKey::new("orders")));
//! ```

use serde::Serialize;

/// Identifier of a cached query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    parts: Vec<String>,
}

impl QueryKey {
    /// Start a key with the resource name.
    #[must_use]
    pub fn new(resource: &str) -> Self {
        Self {
            parts: vec![encode(&resource)],
        }
    }

    /// Append a part.
    ///
    /// Values that cannot be represented as JSON (maps with non-string
    /// keys) collapse to `null`; parameter structs never hit that case.
    #[must_use]
    pub fn with<T: Serialize + ?Sized>(mut self, part: &T) -> Self {
        self.parts.push(encode(part));
        self
    }

    /// Whether `prefix` is this key or a leading part of it.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.parts.starts_with(&prefix.parts)
    }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false; every key carries a resource name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.parts.join(","))
    }
}

fn encode<T: Serialize + ?Sized>(part: &T) -> String {
    serde_json::to_value(part)
        .unwrap_or(serde_json::Value::Null)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    #[derive(Serialize)]
    struct Params {
        page: u32,
        search: Option<String>,
    }

    #[test]
    fn test_equal_params_equal_keys() {
        let a = QueryKey::new("items").with(&Params {
            page: 1,
            search: Some("shirt".into()),
        });
        let b = QueryKey::new("items").with(&Params {
            page: 1,
            search: Some("shirt".into()),
        });
        assert_eq!(a, b);
    }

    #[test]
    fn test_any_differing_param_changes_key() {
        let base = QueryKey::new("items").with(&Params {
            page: 1,
            search: None,
        });
        let other_page = QueryKey::new("items").with(&Params {
            page: 2,
            search: None,
        });
        let other_search = QueryKey::new("items").with(&Params {
            page: 1,
            search: Some(String::new()),
        });
        assert_ne!(base, other_page);
        assert_ne!(base, other_search);
        assert_ne!(other_page, other_search);
    }

    #[test]
    fn test_resource_name_distinguishes_keys() {
        assert_ne!(
            QueryKey::new("user").with(&UserId::new(1)),
            QueryKey::new("addresses").with(&UserId::new(1))
        );
    }

    #[test]
    fn test_prefix_matching() {
        let family = QueryKey::new("user").with(&UserId::new(5));
        let exact = QueryKey::new("user").with(&UserId::new(5));
        let nested = QueryKey::new("user").with(&UserId::new(5)).with("addresses");
        let sibling = QueryKey::new("user").with(&UserId::new(50));

        assert!(exact.starts_with(&family));
        assert!(nested.starts_with(&family));
        assert!(!sibling.starts_with(&family));
        assert!(!family.starts_with(&nested));
    }

    #[test]
    fn test_display() {
        let key = QueryKey::new("user").with(&UserId::new(5));
        assert_eq!(key.to_string(), r#"["user",5]"#);
        assert_eq!(key.len(), 2);
    }
}
