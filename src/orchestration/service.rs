use crate::cache::{CacheKey, TtlCache, PNL_TABLE};
use crate::engine::PnlTable;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::loader::{PnlLoader, RefreshError};

/// Where the cached table is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshState {
    /// No table, or the cached one is older than the TTL.
    Stale,
    /// A recomputation is in flight.
    Fetching,
    /// A fresh table is cached.
    Ready,
}

/// Serves the PnL table, recomputing it at most once per TTL.
///
/// Recomputation is all-or-nothing: a failed load leaves the cache untouched
/// and the error goes to the caller that triggered it.
pub struct PnlService {
    loader: Arc<dyn PnlLoader>,
    cache: TtlCache<CacheKey, PnlTable>,
    refresh_lock: Mutex<()>,
    fetching: AtomicBool,
}

impl PnlService {
    pub fn new(loader: Arc<dyn PnlLoader>, ttl: Duration) -> Self {
        Self {
            loader,
            cache: TtlCache::new(ttl),
            refresh_lock: Mutex::new(()),
            fetching: AtomicBool::new(false),
        }
    }

    fn table_key() -> CacheKey {
        CacheKey::new(PNL_TABLE, "")
    }

    /// Current table, loading it first if the cached copy is missing or stale.
    ///
    /// Concurrent callers during a refresh wait for it and share the result.
    pub async fn table(&self) -> Result<Arc<PnlTable>, RefreshError> {
        let key = Self::table_key();
        if let Some(table) = self.cache.get(&key).await {
            debug!("PnL table served from cache");
            return Ok(table);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(table) = self.cache.get(&key).await {
            return Ok(table);
        }

        let result = {
            let _fetching = FetchingFlag::raise(&self.fetching);
            info!(source = %self.loader.describe(), "Refreshing PnL table");
            self.loader.load().await
        };

        match result {
            Ok(table) => Ok(self.cache.insert(key, table).await),
            Err(e) => {
                warn!(error = %e, "PnL refresh failed");
                Err(e)
            }
        }
    }

    /// Drop the cached table so the next `table()` call recomputes.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&Self::table_key()).await;
    }

    pub async fn refresh_state(&self) -> RefreshState {
        if self.fetching.load(Ordering::SeqCst) {
            RefreshState::Fetching
        } else if self.cache.get(&Self::table_key()).await.is_some() {
            RefreshState::Ready
        } else {
            RefreshState::Stale
        }
    }

    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }
}

/// Holds the fetching flag up until dropped, including when the refresh future is cancelled.
struct FetchingFlag<'a>(&'a AtomicBool);

impl<'a> FetchingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for FetchingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{DataSourceError, MockDataSource};
    use crate::domain::{Asset, DebtSnapshot, Decimal, Timestamp};
    use crate::orchestration::LiveLoader;

    fn mock() -> MockDataSource {
        MockDataSource::new().with_debt_snapshots(vec![DebtSnapshot::new(
            Asset::new("sETH"),
            Timestamp::from_secs(150).unwrap(),
            Decimal::from(20),
        )])
    }

    fn service(mock: &MockDataSource, ttl: Duration) -> PnlService {
        let loader = Arc::new(LiveLoader::new(Arc::new(mock.clone())));
        PnlService::new(loader, ttl)
    }

    #[tokio::test]
    async fn caches_within_ttl() {
        let mock = mock();
        let service = service(&mock, Duration::from_secs(3600));

        assert_eq!(service.refresh_state().await, RefreshState::Stale);
        let first = service.table().await.unwrap();
        let second = service.table().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(mock.fetch_count(), 1);
        assert_eq!(service.refresh_state().await, RefreshState::Ready);
    }

    #[tokio::test]
    async fn recomputes_after_expiry() {
        let mock = mock();
        let service = service(&mock, Duration::ZERO);

        let first = service.table().await.unwrap();
        let second = service.table().await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
        assert_eq!(mock.fetch_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let mock = mock();
        let service = service(&mock, Duration::from_secs(3600));

        service.table().await.unwrap();
        service.invalidate().await;
        assert_eq!(service.refresh_state().await, RefreshState::Stale);
        service.table().await.unwrap();
        assert_eq!(mock.fetch_count(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_surfaces_error_and_caches_nothing() {
        let mock = mock();
        let service = service(&mock, Duration::from_secs(3600));
        mock.set_failure(Some(DataSourceError::Database("down".to_string())));

        let err = service.table().await.unwrap_err();
        assert!(matches!(err, RefreshError::DataSource(DataSourceError::Database(_))));
        assert_eq!(service.refresh_state().await, RefreshState::Stale);

        mock.set_failure(None);
        let table = service.table().await.unwrap();
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let mock = mock();
        let service = Arc::new(service(&mock, Duration::from_secs(3600)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.table().await.map(|t| t.len()) })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 1);
        }
        assert_eq!(mock.fetch_count(), 1);
    }
}
