//! Cache-backed query runtime.
//!
//! # Design
//! [`QueryClient`] tracks one state machine per query key
//! (`idle → loading → success | error`) and keeps successful results in a
//! moka cache. Expiry and invalidation mechanics belong to the cache
//! library; this layer only decides when to consult it. A fetch against a
//! warm key resolves from the cache without running the fetcher; a cold
//! key transitions to `Loading` while the fetcher runs, observable from
//! other threads via [`QueryClient::state`].

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use moka::sync::Cache;

use crate::error::ApiError;

/// Tuning knobs for a [`QueryClient`].
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// Extra attempts after a failed fetch. The default performs exactly
    /// one attempt per uncached activation.
    pub retry: u32,
    /// Lifetime of cached results. `None` keeps entries until invalidated.
    pub cache_ttl: Option<Duration>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            retry: 0,
            cache_ttl: None,
        }
    }
}

/// Lifecycle of one query activation.
///
/// Exactly one phase holds at a time; data exists only in `Success` and an
/// error only in `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    /// The key has never been fetched, or was invalidated.
    Idle,
    /// A fetch is in flight; no data yet.
    Loading,
    /// The fetch succeeded; carries the (possibly cached) data.
    Success(T),
    /// The fetch failed; carries the error verbatim.
    Error(ApiError),
}

impl<T> QueryState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, QueryState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }

    /// The fetched data; present exactly when the state is `Success`.
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The fetch error; present exactly when the state is `Error`.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            QueryState::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Cache-backed query runtime, generic over the cached value.
pub struct QueryClient<T> {
    cache: Cache<String, T>,
    states: RwLock<HashMap<String, QueryState<T>>>,
    options: QueryOptions,
}

impl<T> QueryClient<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(options: QueryOptions) -> Self {
        let mut builder = Cache::builder();
        if let Some(ttl) = options.cache_ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            cache: builder.build(),
            states: RwLock::new(HashMap::new()),
            options,
        }
    }

    /// Current state of `key`, without side effects.
    pub fn state(&self, key: &str) -> QueryState<T> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .unwrap_or(QueryState::Idle)
    }

    /// Activate the query for `key`.
    ///
    /// A warm cache entry resolves to `Success` without calling `run`.
    /// Otherwise the key goes through `Loading` and `run` is invoked, up
    /// to `retry` further times on failure, before the key settles in
    /// `Success` (caching the data) or `Error`.
    pub fn fetch(
        &self,
        key: &str,
        mut run: impl FnMut() -> Result<T, ApiError>,
    ) -> QueryState<T> {
        if let Some(data) = self.cache.get(key) {
            tracing::debug!(key, "query served from cache");
            return self.settle(key, QueryState::Success(data));
        }

        self.set_state(key, QueryState::Loading);

        let mut attempt = 0;
        let outcome = loop {
            match run() {
                Ok(data) => break Ok(data),
                Err(err) if attempt < self.options.retry => {
                    attempt += 1;
                    tracing::debug!(key, attempt, %err, "query attempt failed, retrying");
                }
                Err(err) => break Err(err),
            }
        };

        match outcome {
            Ok(data) => {
                self.cache.insert(key.to_string(), data.clone());
                self.settle(key, QueryState::Success(data))
            }
            Err(err) => {
                tracing::warn!(key, %err, "query failed");
                self.settle(key, QueryState::Error(err))
            }
        }
    }

    /// Drop the cached result and state for `key`; the next fetch runs
    /// again.
    pub fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn set_state(&self, key: &str, state: QueryState<T>) {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), state);
    }

    fn settle(&self, key: &str, state: QueryState<T>) -> QueryState<T> {
        self.set_state(key, state.clone());
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn client() -> QueryClient<Vec<u32>> {
        QueryClient::new(QueryOptions::default())
    }

    #[test]
    fn unknown_key_is_idle() {
        let state = client().state("numbers");
        assert!(state.is_idle());
        assert!(state.data().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn loading_is_observable_while_fetch_runs() {
        let client = client();
        let state = client.fetch("numbers", || {
            let mid_flight = client.state("numbers");
            assert!(mid_flight.is_loading());
            assert!(mid_flight.data().is_none());
            Ok(vec![1, 2])
        });
        assert!(state.is_success());
    }

    #[test]
    fn success_caches_and_skips_refetch() {
        let client = client();
        let calls = Cell::new(0u32);

        let first = client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Ok(vec![7])
        });
        assert_eq!(first.data(), Some(&vec![7]));

        let second = client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Ok(vec![8])
        });
        assert_eq!(second.data(), Some(&vec![7]), "cached data must win");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failure_settles_in_error_after_single_attempt() {
        let client = client();
        let calls = Cell::new(0u32);

        let state = client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Err(ApiError::Http {
                status: 500,
                body: "boom".to_string(),
            })
        });

        assert!(state.is_error());
        assert!(state.error().unwrap().to_string().contains("500"));
        assert_eq!(calls.get(), 1);
        assert!(client.state("numbers").is_error());
    }

    #[test]
    fn retry_budget_reruns_failed_fetch() {
        let client: QueryClient<Vec<u32>> = QueryClient::new(QueryOptions {
            retry: 2,
            cache_ttl: None,
        });
        let calls = Cell::new(0u32);

        let state = client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(ApiError::Timeout)
            } else {
                Ok(vec![9])
            }
        });

        assert!(state.is_success());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn retry_budget_is_exhausted_on_persistent_failure() {
        let client: QueryClient<Vec<u32>> = QueryClient::new(QueryOptions {
            retry: 2,
            cache_ttl: None,
        });
        let calls = Cell::new(0u32);

        let state = client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Err(ApiError::Timeout)
        });

        assert!(state.is_error());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let client = client();
        let calls = Cell::new(0u32);

        client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Ok(vec![1])
        });
        client.invalidate("numbers");
        assert!(client.state("numbers").is_idle());

        let state = client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Ok(vec![2])
        });
        assert_eq!(state.data(), Some(&vec![2]));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn expired_entry_is_fetched_again() {
        let client: QueryClient<Vec<u32>> = QueryClient::new(QueryOptions {
            retry: 0,
            cache_ttl: Some(Duration::from_millis(50)),
        });
        let calls = Cell::new(0u32);

        client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Ok(vec![1])
        });
        std::thread::sleep(Duration::from_millis(120));

        client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Ok(vec![2])
        });
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn failed_key_is_not_cached() {
        let client = client();
        let calls = Cell::new(0u32);

        client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Err(ApiError::Timeout)
        });
        let state = client.fetch("numbers", || {
            calls.set(calls.get() + 1);
            Ok(vec![3])
        });

        assert!(state.is_success());
        assert_eq!(calls.get(), 2);
    }
}
