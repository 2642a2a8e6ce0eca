//! Process-wide query cache.
//!
//! Backed by `moka`. Entries are partitioned by [`CacheScope`] so one user's
//! results are never served to another. `try_get_with` gives us at most one
//! in-flight fetch per key: concurrent callers wait on the same future, and
//! if the caller driving it is dropped another waiter takes over. Failed
//! fetches are not stored. Each entry expires after its query's stale time,
//! so a stale key refetches through the same single-flight path.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use freshwash_core::{QueryKey, UserId};

use super::mutation::{Invalidation, Mutation, MutationOutcome, Toast};
use super::{Query, QueryState};
use crate::api::{ApiError, decode_data};
use crate::config::QueryConfig;

/// Partition of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    Anonymous,
    User(UserId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScopedKey {
    scope: CacheScope,
    key: QueryKey,
}

#[derive(Debug, Clone)]
struct CachedEntry {
    value: Arc<Value>,
    stale_after: Duration,
}

/// Expires every entry once its own stale time has passed.
struct StaleAfter;

impl Expiry<ScopedKey, CachedEntry> for StaleAfter {
    fn expire_after_create(
        &self,
        _key: &ScopedKey,
        value: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.stale_after)
    }
}

/// Shared cache of API query results.
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<ScopedKey, CachedEntry>,
    stale_time: Duration,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.entry_count())
            .field("stale_time", &self.stale_time)
            .finish()
    }
}

impl QueryCache {
    #[must_use]
    pub fn new(config: QueryConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.capacity)
            .expire_after(StaleAfter)
            .support_invalidation_closures()
            .build();

        Self {
            entries,
            stale_time: config.stale_time,
        }
    }

    /// Run a query: serve a fresh cached value or fetch once per key.
    #[instrument(skip(self, query), fields(key = %query.key))]
    pub async fn query<T, F, Fut>(&self, scope: CacheScope, query: Query<F>) -> QueryState<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        if !query.options.enabled {
            debug!("query disabled");
            return QueryState::Disabled;
        }

        let path = query.key.to_string();
        let stale_time = query.options.stale_time.unwrap_or(self.stale_time);
        let scoped = ScopedKey {
            scope,
            key: query.key,
        };

        let fetcher = query.fetcher;
        let result = self
            .entries
            .try_get_with(scoped, async move {
                debug!("fetching");
                fetcher().await.map(|value| CachedEntry {
                    value: Arc::new(value),
                    stale_after: stale_time,
                })
            })
            .await;

        match result {
            Ok(entry) => decode_data(&path, Value::clone(&entry.value)).into(),
            Err(err) => QueryState::Failed(ApiError::clone(&err)),
        }
    }

    /// Mark cached queries stale so their next read refetches.
    pub async fn invalidate(&self, scope: CacheScope, target: &Invalidation) {
        match target {
            Invalidation::Exact(key) => {
                self.entries
                    .invalidate(&ScopedKey {
                        scope,
                        key: key.clone(),
                    })
                    .await;
            }
            Invalidation::Prefix(prefix) => {
                let prefix = prefix.clone();
                let result = self
                    .entries
                    .invalidate_entries_if(move |k, _| k.scope == scope && k.key.starts_with(&prefix));
                if let Err(e) = result {
                    warn!(error = %e, "failed to register cache invalidation");
                }
            }
        }
    }

    /// Run a mutation: exactly one call, no retry.
    ///
    /// On success every declared dependent key is invalidated in `scope`;
    /// on failure the cache is left untouched.
    #[instrument(skip(self, mutation, call), fields(mutation = mutation.name))]
    pub async fn mutate<T, Fut>(
        &self,
        scope: CacheScope,
        mutation: Mutation,
        call: Fut,
    ) -> MutationOutcome<T>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match call.await {
            Ok(value) => {
                for target in &mutation.invalidates {
                    self.invalidate(scope, target).await;
                }
                debug!(invalidated = mutation.invalidates.len(), "mutation succeeded");
                MutationOutcome {
                    result: Ok(value),
                    toast: Toast::success(mutation.success_message),
                }
            }
            Err(err) => {
                warn!(error = %err, "mutation failed");
                MutationOutcome {
                    toast: Toast::error(err.user_message()),
                    result: Err(err),
                }
            }
        }
    }

    /// Drop every entry of a scope (logout).
    pub fn clear_scope(&self, scope: CacheScope) {
        if let Err(e) = self.entries.invalidate_entries_if(move |k, _| k.scope == scope) {
            warn!(error = %e, "failed to clear cache scope");
        }
    }

    /// Whether a fresh value is cached for `key`.
    pub async fn contains(&self, scope: CacheScope, key: &QueryKey) -> bool {
        self.entries
            .get(&ScopedKey {
                scope,
                key: key.clone(),
            })
            .await
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::api::GENERIC_ERROR_MESSAGE;
    use crate::query::Query;

    const ALICE: CacheScope = CacheScope::User(UserId::new(5));
    const BOB: CacheScope = CacheScope::User(UserId::new(6));

    fn cache() -> QueryCache {
        QueryCache::new(QueryConfig {
            stale_time: Duration::from_secs(60),
            capacity: 100,
        })
    }

    fn user_key() -> QueryKey {
        QueryKey::new("user").with(&UserId::new(5))
    }

    async fn read(
        cache: &QueryCache,
        scope: CacheScope,
        key: QueryKey,
        hits: &AtomicUsize,
    ) -> QueryState<u32> {
        cache
            .query(
                scope,
                Query::new(key, move || async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok(Value::from(n))
                }),
            )
            .await
    }

    #[tokio::test]
    async fn test_identical_keys_are_served_from_cache() {
        let cache = cache();
        let hits = AtomicUsize::new(0);

        let first = read(&cache, ALICE, user_key(), &hits).await;
        let second = read(&cache, ALICE, user_key(), &hits).await;

        assert_eq!(first.data(), Some(&1));
        assert_eq!(second.data(), Some(&1));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_fetch() {
        let cache = cache();
        let hits = Arc::new(AtomicUsize::new(0));

        let slow = || {
            let cache = cache.clone();
            let hits = Arc::clone(&hits);
            async move {
                cache
                    .query::<u32, _, _>(
                        ALICE,
                        Query::new(user_key(), move || async move {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            hits.fetch_add(1, Ordering::SeqCst);
                            Ok(Value::from(7))
                        }),
                    )
                    .await
            }
        };

        let (a, b, c) = tokio::join!(slow(), slow(), slow());
        assert_eq!(a.data(), Some(&7));
        assert_eq!(b.data(), Some(&7));
        assert_eq!(c.data(), Some(&7));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let cache = cache();
        let hits = AtomicUsize::new(0);

        read(&cache, ALICE, user_key(), &hits).await;
        let bob = read(&cache, BOB, user_key(), &hits).await;

        assert_eq!(bob.data(), Some(&2));
    }

    #[tokio::test]
    async fn test_disabled_query_never_fetches() {
        let cache = cache();
        let hits = AtomicUsize::new(0);
        let counter = &hits;

        let state: QueryState<u32> = cache
            .query(
                ALICE,
                Query::new(user_key(), move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::from(1))
                })
                .enabled(false),
            )
            .await;

        assert!(state.is_disabled());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!cache.contains(ALICE, &user_key()).await);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = cache();
        let failing: QueryState<u32> = cache
            .query(
                ALICE,
                Query::new(user_key(), || async {
                    Err(ApiError::Status {
                        path: "/users/5".to_string(),
                        status: 500,
                        message: None,
                    })
                }),
            )
            .await;
        assert!(failing.error().is_some());

        let hits = AtomicUsize::new(0);
        let retry = read(&cache, ALICE, user_key(), &hits).await;
        assert_eq!(retry.data(), Some(&1));
    }

    #[tokio::test]
    async fn test_stale_entries_refetch() {
        let cache = cache();
        let hits = AtomicUsize::new(0);
        let counter = &hits;

        for _ in 0..2 {
            let _: QueryState<u32> = cache
                .query(
                    ALICE,
                    Query::new(user_key(), move || async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(Value::from(1))
                    })
                    .stale_time(Duration::ZERO),
                )
                .await;
        }
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches_once_for_concurrent_readers() {
        let cache = cache();
        let hits = Arc::new(AtomicUsize::new(0));

        let short_lived = || {
            let cache = cache.clone();
            let hits = Arc::clone(&hits);
            async move {
                cache
                    .query::<usize, _, _>(
                        ALICE,
                        Query::new(user_key(), move || async move {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok(Value::from(hits.fetch_add(1, Ordering::SeqCst) + 1))
                        })
                        .stale_time(Duration::from_millis(100)),
                    )
                    .await
            }
        };

        assert_eq!(short_lived().await.data(), Some(&1));
        assert_eq!(short_lived().await.data(), Some(&1));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!cache.contains(ALICE, &user_key()).await);

        let (a, b, c) = tokio::join!(short_lived(), short_lived(), short_lived());
        assert_eq!(a.data(), Some(&2));
        assert_eq!(b.data(), Some(&2));
        assert_eq!(c.data(), Some(&2));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_mutation_success_invalidates_exactly_declared_keys() {
        let cache = cache();
        let hits = AtomicUsize::new(0);
        let other_hits = AtomicUsize::new(0);
        let orders = QueryKey::new("orders").with(&1);

        read(&cache, ALICE, user_key(), &hits).await;
        read(&cache, ALICE, orders.clone(), &other_hits).await;
        read(&cache, BOB, user_key(), &other_hits).await;

        let mutation = Mutation::new("delete_address", "Address deleted")
            .invalidates(Invalidation::Exact(user_key()));
        let outcome = cache
            .mutate(ALICE, mutation, async { Ok::<_, ApiError>(()) })
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.toast, Toast::success("Address deleted"));
        assert!(!cache.contains(ALICE, &user_key()).await);
        assert!(cache.contains(ALICE, &orders).await);
        assert!(cache.contains(BOB, &user_key()).await);

        let refreshed = read(&cache, ALICE, user_key(), &hits).await;
        assert_eq!(refreshed.data(), Some(&2));
    }

    #[tokio::test]
    async fn test_prefix_invalidation() {
        let cache = cache();
        let hits = AtomicUsize::new(0);
        let page1 = QueryKey::new("orders").with(&1);
        let page2 = QueryKey::new("orders").with(&2);
        let items = QueryKey::new("items");

        read(&cache, ALICE, page1.clone(), &hits).await;
        read(&cache, ALICE, page2.clone(), &hits).await;
        read(&cache, ALICE, items.clone(), &hits).await;

        cache
            .invalidate(ALICE, &Invalidation::Prefix(QueryKey::new("orders")))
            .await;

        assert!(!cache.contains(ALICE, &page1).await);
        assert!(!cache.contains(ALICE, &page2).await);
        assert!(cache.contains(ALICE, &items).await);
    }

    #[tokio::test]
    async fn test_mutation_failure_keeps_cache_and_reports_message() {
        let cache = cache();
        let hits = AtomicUsize::new(0);
        read(&cache, ALICE, user_key(), &hits).await;

        let mutation = Mutation::new("delete_address", "Address deleted")
            .invalidates(Invalidation::Exact(user_key()));
        let outcome: MutationOutcome<()> = cache
            .mutate(ALICE, mutation.clone(), async {
                Err(ApiError::Status {
                    path: "/addresses/5".to_string(),
                    status: 409,
                    message: Some("Primary address cannot be deleted".to_string()),
                })
            })
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.toast, Toast::error("Primary address cannot be deleted"));
        assert!(cache.contains(ALICE, &user_key()).await);

        let fallback: MutationOutcome<()> = cache
            .mutate(ALICE, mutation, async {
                Err(ApiError::Transport {
                    path: "/addresses/5".to_string(),
                    message: "connection refused".to_string(),
                })
            })
            .await;
        assert_eq!(fallback.toast, Toast::error(GENERIC_ERROR_MESSAGE));
        assert!(cache.contains(ALICE, &user_key()).await);
    }

    #[tokio::test]
    async fn test_clear_scope() {
        let cache = cache();
        let hits = AtomicUsize::new(0);
        read(&cache, ALICE, user_key(), &hits).await;
        read(&cache, BOB, user_key(), &hits).await;

        cache.clear_scope(ALICE);

        assert!(!cache.contains(ALICE, &user_key()).await);
        assert!(cache.contains(BOB, &user_key()).await);
    }
}
