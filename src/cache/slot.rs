//! Single-slot, single-flight endpoint memo.

use super::keying::{credential_fingerprint, CacheKeying};
use crate::resolver::ResolvedEndpoint;
use crate::Result;
use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

static PROCESS_CACHE: Lazy<Arc<ResolutionCache>> =
    Lazy::new(|| Arc::new(ResolutionCache::new(CacheKeying::Process)));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Successful resolutions stored in the slot.
    pub resolutions: u64,
    pub invalidations: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    resolutions: AtomicU64,
    invalidations: AtomicU64,
}

impl AtomicStats {
    fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            resolutions: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

struct CachedEntry {
    endpoint: ResolvedEndpoint,
    /// Present only under [`CacheKeying::PerCredential`].
    fingerprint: Option<String>,
}

pub struct ResolutionCache {
    keying: CacheKeying,
    slot: ArcSwapOption<CachedEntry>,
    fill: Mutex<()>,
    stats: AtomicStats,
}

impl ResolutionCache {
    pub fn new(keying: CacheKeying) -> Self {
        Self {
            keying,
            slot: ArcSwapOption::empty(),
            fill: Mutex::new(()),
            stats: AtomicStats::new(),
        }
    }

    /// The cache shared by everything in this process that asks for it.
    pub fn process_wide() -> Arc<Self> {
        Arc::clone(&PROCESS_CACHE)
    }

    pub fn keying(&self) -> CacheKeying {
        self.keying
    }

    /// Return the stored endpoint, or run `resolve` once and store its result.
    ///
    /// Concurrent callers that miss wait for the in-flight resolution instead of
    /// starting their own. An `Err` from `resolve` is returned to the caller
    /// that ran it and leaves the slot empty.
    pub async fn get_or_resolve<F, Fut>(&self, credential: &str, resolve: F) -> Result<ResolvedEndpoint>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResolvedEndpoint>>,
    {
        let fingerprint = match self.keying {
            CacheKeying::Process => None,
            CacheKeying::PerCredential => Some(credential_fingerprint(credential)),
        };

        if let Some(endpoint) = self.lookup(fingerprint.as_deref()) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(endpoint);
        }

        let _fill = self.fill.lock().await;
        // Another caller may have filled the slot while we waited.
        if let Some(endpoint) = self.lookup(fingerprint.as_deref()) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(endpoint);
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        debug!("resolution cache miss, resolving endpoint");
        let endpoint = resolve().await?;

        self.slot.store(Some(Arc::new(CachedEntry {
            endpoint: endpoint.clone(),
            fingerprint,
        })));
        self.stats.resolutions.fetch_add(1, Ordering::Relaxed);
        Ok(endpoint)
    }

    /// Current endpoint without resolving or touching stats.
    pub fn peek(&self) -> Option<ResolvedEndpoint> {
        let guard = self.slot.load();
        (*guard).as_ref().map(|e| e.endpoint.clone())
    }

    /// Forget the stored endpoint; the next caller resolves again.
    pub fn invalidate(&self) {
        self.slot.store(None);
        self.stats.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!("resolution cache invalidated");
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    fn lookup(&self, fingerprint: Option<&str>) -> Option<ResolvedEndpoint> {
        let guard = self.slot.load();
        let entry = (*guard).as_ref()?;
        match self.keying {
            CacheKeying::Process => Some(entry.endpoint.clone()),
            CacheKeying::PerCredential if entry.fingerprint.as_deref() == fingerprint => {
                Some(entry.endpoint.clone())
            }
            CacheKeying::PerCredential => None,
        }
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(CacheKeying::default())
    }
}
