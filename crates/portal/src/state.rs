//! Application state shared across handlers.

use std::sync::Arc;

use freshwash_core::{GuardTable, GuardTableError};

use crate::api::{ApiClient, ApiError};
use crate::config::PortalConfig;
use crate::query::QueryCache;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid route guard table: {0}")]
    Guard(#[from] GuardTableError),
    #[error("failed to build API client: {0}")]
    Api(#[from] ApiError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the process-wide API client, query
/// cache and guard table built once at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    api: ApiClient,
    cache: QueryCache,
    guards: GuardTable,
}

impl AppState {
    /// Create the state with the portal's route table.
    ///
    /// # Errors
    ///
    /// Returns an error if the guard table is malformed or the HTTP client
    /// cannot be built.
    pub fn new(config: PortalConfig) -> Result<Self, StateError> {
        let guards = GuardTable::portal()?;
        Self::with_guards(config, guards)
    }

    /// Create the state with a custom guard table.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_guards(config: PortalConfig, guards: GuardTable) -> Result<Self, StateError> {
        let api = ApiClient::new(&config.api)?;
        let cache = QueryCache::new(config.query);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                cache,
                guards,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// The anonymous API client. Use `with_token` for signed-in calls.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn guards(&self) -> &GuardTable {
        &self.inner.guards
    }
}
