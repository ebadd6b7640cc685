//! Cache-aware queries and mutations
//!
//! [`QueryClient`] caches query results for a short staleness window, retries
//! failed fetches and drops cached results when a related mutation succeeds.
//! [`Queries`] wraps every domain service in that policy.

mod hooks;
mod key;

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;
use tracing::debug;

use crate::config::ClientOptions;
use crate::error::Error;

pub use hooks::*;
pub use key::*;

type Entry = Arc<dyn Any + Send + Sync>;

/// Query result cache
///
/// Cloning is cheap and clones share the same cache.
#[derive(Clone)]
pub struct QueryClient {
    cache: Cache<QueryKey, Entry>,
    retry: u32,
}

impl QueryClient {
    /// Create a new QueryClient from the stale time, retry and capacity options
    pub fn new(options: &ClientOptions) -> Self {
        let cache = Cache::builder()
            .max_capacity(options.cache_capacity)
            .time_to_live(options.stale_time)
            .build();
        Self {
            cache,
            retry: options.retry,
        }
    }

    /// Return the cached value for `key` while fresh, otherwise run `fetcher`
    ///
    /// A failing fetch is retried up to the configured count. Only successes
    /// are cached.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, Error>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if let Some(value) = self.get_query_data::<T>(&key).await {
            debug!(%key, "query cache hit");
            return Ok(value);
        }
        debug!(%key, "query cache miss");

        let mut attempt = 0;
        loop {
            match fetcher().await {
                Ok(value) => {
                    self.set_query_data(key, value.clone()).await;
                    return Ok(value);
                }
                Err(err) if attempt < self.retry => {
                    attempt += 1;
                    debug!(%key, attempt, error = %err, "retrying query");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Run a mutation and, if it succeeds, invalidate every key under `invalidates`
    pub async fn mutate<T, Fut>(&self, invalidates: &[QueryKey], mutation: Fut) -> Result<T, Error>
    where
        Fut: Future<Output = Result<T, Error>>,
    {
        let value = mutation.await?;
        for prefix in invalidates {
            self.invalidate(prefix).await;
        }
        Ok(value)
    }

    /// Drop `prefix` and every key below it
    pub async fn invalidate(&self, prefix: &QueryKey) {
        let stale: Vec<Arc<QueryKey>> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key)
            .collect();

        debug!(%prefix, count = stale.len(), "invalidating queries");
        for key in stale {
            self.cache.invalidate(key.as_ref()).await;
        }
    }

    /// Cached value for `key`, if fresh and of type `T`
    pub async fn get_query_data<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entry = self.cache.get(key).await?;
        entry.downcast::<T>().ok().map(|value| value.as_ref().clone())
    }

    /// Seed or overwrite the cached value for `key`
    pub async fn set_query_data<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let entry: Entry = Arc::new(value);
        self.cache.insert(key, entry).await;
    }

    /// Drop every cached result
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
