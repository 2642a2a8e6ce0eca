//! Query and mutation contract used by every data hook.
//!
//! A hook describes *what* to fetch with a [`Query`] (key, fetcher, options)
//! and hands it to the shared [`QueryCache`], which decides whether the
//! network is touched. State-changing calls go through
//! [`QueryCache::mutate`] with a [`Mutation`] that lists the keys it makes
//! stale.

mod cache;
mod mutation;

pub use cache::{CacheScope, QueryCache};
pub use mutation::{Invalidation, Mutation, MutationOutcome, Toast, ToastLevel};

use std::time::Duration;

use freshwash_core::QueryKey;

use crate::api::ApiError;

/// Options of a query.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// When false the fetcher is never called.
    pub enabled: bool,
    /// Override of the cache's default freshness window.
    pub stale_time: Option<Duration>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_time: None,
        }
    }
}

/// A query descriptor.
///
/// Two descriptors with equal keys must fetch the same logical resource:
/// the cache hands the first one's result to both.
pub struct Query<F> {
    pub(crate) key: QueryKey,
    pub(crate) fetcher: F,
    pub(crate) options: QueryOptions,
}

impl<F> Query<F> {
    pub const fn new(key: QueryKey, fetcher: F) -> Self {
        Self {
            key,
            fetcher,
            options: QueryOptions {
                enabled: true,
                stale_time: None,
            },
        }
    }

    /// Gate execution on prerequisite state.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.options.enabled = enabled;
        self
    }

    #[must_use]
    pub const fn stale_time(mut self, stale_time: Duration) -> Self {
        self.options.stale_time = Some(stale_time);
        self
    }

    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }
}

/// Result of running a query.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
    /// The query was not enabled; nothing was fetched.
    Disabled,
    Ready(T),
    Failed(ApiError),
}

impl<T> QueryState<T> {
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            Self::Disabled => QueryState::Disabled,
            Self::Ready(data) => QueryState::Ready(f(data)),
            Self::Failed(err) => QueryState::Failed(err),
        }
    }
}

impl<T> From<Result<T, ApiError>> for QueryState<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(err) => Self::Failed(err),
        }
    }
}
