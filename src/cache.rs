//! A time-boxed cache of the denormalized transaction rows.
//!
//! Every dashboard render aggregates the full transaction set, so the rows are
//! kept in memory between requests. Handlers that write to the database must
//! call [TransactionCache::invalidate] once the write has been committed.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use crate::{Error, transaction::TransactionRow};

/// How long cached rows are served before they are reloaded.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug)]
struct CacheEntry {
    loaded_at: Instant,
    rows: Arc<Vec<TransactionRow>>,
}

#[derive(Debug, Default)]
struct CacheState {
    /// Bumped on every invalidation so loads that started earlier are discarded.
    generation: u64,
    entry: Option<CacheEntry>,
}

/// Caches the result of loading every [TransactionRow] for a fixed duration.
#[derive(Debug)]
pub struct TransactionCache {
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl Default for TransactionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl TransactionCache {
    /// Create an empty cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Get the cached rows, calling `loader` if the cache is empty or expired.
    ///
    /// The cache lock is not held while `loader` runs. Errors from `loader`
    /// are returned to the caller and leave the cache empty. If the cache is
    /// invalidated while `loader` runs, the loaded rows are returned but not
    /// stored.
    pub fn get_or_load<F>(&self, loader: F) -> Result<Arc<Vec<TransactionRow>>, Error>
    where
        F: FnOnce() -> Result<Vec<TransactionRow>, Error>,
    {
        let generation = {
            let state = self.lock_state();

            if let Some(entry) = state.entry.as_ref()
                && entry.loaded_at.elapsed() < self.ttl
            {
                return Ok(entry.rows.clone());
            }

            state.generation
        };

        let rows = Arc::new(loader()?);
        tracing::debug!("loaded {} transaction rows", rows.len());

        let mut state = self.lock_state();
        if state.generation == generation {
            state.entry = Some(CacheEntry {
                loaded_at: Instant::now(),
                rows: rows.clone(),
            });
        } else {
            tracing::debug!("discarding transaction rows loaded before an invalidation");
        }

        Ok(rows)
    }

    /// Drop the cached rows so the next read goes to the database.
    ///
    /// Loads that are in progress when this is called will not be cached.
    pub fn invalidate(&self) {
        let mut state = self.lock_state();
        state.generation = state.generation.wrapping_add(1);

        if state.entry.take().is_some() {
            tracing::debug!("transaction cache invalidated");
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        // The state is only ever updated whole, so a poisoned lock never holds partial state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, time::Duration};

    use time::macros::datetime;

    use crate::{Error, cache::TransactionCache, transaction::TransactionRow};

    fn sample_rows() -> Vec<TransactionRow> {
        vec![TransactionRow {
            date: datetime!(2024-01-05 0:00),
            amount: 1000.0,
            description: None,
            category_name: "Salário".to_owned(),
        }]
    }

    #[test]
    fn serves_cached_rows_within_ttl() {
        let cache = TransactionCache::new(Duration::from_secs(60));
        let calls = Cell::new(0);
        let loader = || {
            calls.set(calls.get() + 1);
            Ok(sample_rows())
        };

        let first = cache.get_or_load(loader).unwrap();
        let second = cache.get_or_load(loader).unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn reloads_after_expiry() {
        let cache = TransactionCache::new(Duration::ZERO);
        let calls = Cell::new(0);
        let loader = || {
            calls.set(calls.get() + 1);
            Ok(sample_rows())
        };

        cache.get_or_load(loader).unwrap();
        cache.get_or_load(loader).unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn reloads_after_invalidation() {
        let cache = TransactionCache::new(Duration::from_secs(60));
        cache.get_or_load(|| Ok(Vec::new())).unwrap();

        cache.invalidate();
        let rows = cache.get_or_load(|| Ok(sample_rows())).unwrap();

        assert_eq!(*rows, sample_rows());
    }

    #[test]
    fn does_not_cache_loader_errors() {
        let cache = TransactionCache::new(Duration::from_secs(60));

        let result = cache.get_or_load(|| Err(Error::DatabaseLockError));
        let rows = cache.get_or_load(|| Ok(sample_rows())).unwrap();

        assert_eq!(result, Err(Error::DatabaseLockError));
        assert_eq!(*rows, sample_rows());
    }

    #[test]
    fn discards_rows_loaded_across_an_invalidation() {
        let cache = TransactionCache::new(Duration::from_secs(60));

        // A write commits and invalidates while the old rows are being read.
        let stale = cache
            .get_or_load(|| {
                cache.invalidate();
                Ok(Vec::new())
            })
            .unwrap();
        let rows = cache.get_or_load(|| Ok(sample_rows())).unwrap();

        assert!(stale.is_empty());
        assert_eq!(*rows, sample_rows());
    }
}
