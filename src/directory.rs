//! In-process cache of streaming service descriptors.
//!
//! The directory is fetched lazily on first use and then served from memory.
//! The catalogue can gain services after we fetched, so a lookup miss marks
//! the directory stale and refetches it once before giving up on the key.
//!
//! # Concurrency
//!
//! - The mapping is an immutable [`Snapshot`] behind an `Arc`. Readers clone
//!   the `Arc` under a short read lock and never see a half-built mapping.
//! - Refetches are single-flight: the fetch runs in its own tokio task and
//!   every caller that misses while it runs awaits the same shared result.
//!   The task installs the new snapshot itself, so a caller that stops
//!   waiting doesn't cancel the refresh for anyone else.
//! - A key that is still missing after a refetch is remembered for
//!   `miss_cooldown`, so repeated lookups of it don't refetch every time.
//!   Expired entries are dropped on the next refetch or lookup of the key.
//! - Generations only ever increase, including across [`ServiceDirectory::invalidate`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::{Mutex, RwLock};

use crate::catalogue::{CatalogueApi, CatalogueError, ServiceDescriptor};

/// Default time a confirmed-missing key is answered without refetching
pub const DEFAULT_MISS_COOLDOWN: Duration = Duration::from_secs(60);

/// Service directory settings
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// How long a key that was missing after a refetch stays "known missing".
    /// Zero disables the suppression.
    pub miss_cooldown: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            miss_cooldown: DEFAULT_MISS_COOLDOWN,
        }
    }
}

/// One fetched version of the directory
#[derive(Debug)]
struct Snapshot {
    generation: u64,
    services: Vec<ServiceDescriptor>,
    by_key: HashMap<String, usize>,
}

impl Snapshot {
    fn new(generation: u64, fetched: Vec<ServiceDescriptor>) -> Self {
        let mut services = Vec::with_capacity(fetched.len());
        let mut by_key = HashMap::with_capacity(fetched.len());

        for svc in fetched {
            if by_key.contains_key(&svc.key) {
                tracing::warn!("Service directory lists {:?} twice, keeping the first", svc.key);
                continue;
            }
            by_key.insert(svc.key.clone(), services.len());
            services.push(svc);
        }

        Self {
            generation,
            services,
            by_key,
        }
    }

    fn get(&self, key: &str) -> Option<&ServiceDescriptor> {
        self.by_key.get(key).map(|&i| &self.services[i])
    }
}

type RefreshFuture = Shared<BoxFuture<'static, Result<Arc<Snapshot>, CatalogueError>>>;

struct Inner {
    api: Arc<dyn CatalogueApi>,
    config: DirectoryConfig,
    /// `None` until the first successful fetch
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    in_flight: Mutex<Option<RefreshFuture>>,
    /// Keys still missing after a refetch, with when that was confirmed
    misses: Mutex<HashMap<String, Instant>>,
    /// Last generation handed out; never reset
    generation: AtomicU64,
    fetches: AtomicUsize,
}

impl Inner {
    fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().clone()
    }

    /// Fetch the directory and install it. Runs inside its own task.
    async fn fetch(self: Arc<Self>) -> Result<Arc<Snapshot>, CatalogueError> {
        let result = self.api.list_services().await;

        let outcome = match result {
            Ok(services) => {
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                let snapshot = Arc::new(Snapshot::new(generation, services));
                *self.snapshot.write() = Some(Arc::clone(&snapshot));

                let cooldown = self.config.miss_cooldown;
                self.misses
                    .lock()
                    .retain(|key, at| snapshot.get(key).is_none() && at.elapsed() < cooldown);
                tracing::info!(
                    "Service directory refreshed: {} services (generation {})",
                    snapshot.services.len(),
                    generation
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch service directory: {}", e);
                Err(e)
            }
        };

        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.in_flight.lock().take();
        outcome
    }
}

/// Shared handle to the service directory cache.
///
/// Cloning is cheap; all clones see the same cache.
#[derive(Clone)]
pub struct ServiceDirectory {
    inner: Arc<Inner>,
}

impl ServiceDirectory {
    pub fn new(api: Arc<dyn CatalogueApi>, config: DirectoryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                config,
                snapshot: RwLock::new(None),
                in_flight: Mutex::new(None),
                misses: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
                fetches: AtomicUsize::new(0),
            }),
        }
    }

    /// Look up a service by key.
    ///
    /// Fetches the directory on first use. A miss against an already
    /// populated directory triggers one refetch and one retry; if the key is
    /// still missing the result is `NotFound`.
    pub async fn get_service(&self, key: &str) -> Result<ServiceDescriptor, CatalogueError> {
        let snapshot = match self.inner.current() {
            Some(snapshot) => snapshot,
            None => {
                // Freshly fetched, so a miss here is final
                let snapshot = self.refresh(None).await?;
                return self.lookup_fresh(&snapshot, key);
            }
        };

        if let Some(svc) = snapshot.get(key) {
            return Ok(svc.clone());
        }

        if self.recently_missed(key) {
            tracing::debug!("Service {:?} is known missing, not refetching", key);
            return Err(CatalogueError::NotFound);
        }

        tracing::debug!(
            "Service {:?} not in directory generation {}, refetching",
            key,
            snapshot.generation
        );
        let refreshed = self.refresh(Some(snapshot.generation)).await?;
        self.lookup_fresh(&refreshed, key)
    }

    /// Every known service, in the order the catalogue lists them
    pub async fn services(&self) -> Result<Vec<ServiceDescriptor>, CatalogueError> {
        let snapshot = match self.inner.current() {
            Some(snapshot) => snapshot,
            None => self.refresh(None).await?,
        };
        Ok(snapshot.services.clone())
    }

    /// Drop the cached directory; the next lookup fetches it again
    pub fn invalidate(&self) {
        *self.inner.snapshot.write() = None;
        self.inner.misses.lock().clear();
        tracing::debug!("Service directory invalidated");
    }

    /// Number of completed directory fetches (successful or not)
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    pub fn is_populated(&self) -> bool {
        self.inner.current().is_some()
    }

    fn lookup_fresh(&self, snapshot: &Snapshot, key: &str) -> Result<ServiceDescriptor, CatalogueError> {
        match snapshot.get(key) {
            Some(svc) => Ok(svc.clone()),
            None => {
                self.remember_miss(key);
                Err(CatalogueError::NotFound)
            }
        }
    }

    fn recently_missed(&self, key: &str) -> bool {
        let cooldown = self.inner.config.miss_cooldown;
        if cooldown.is_zero() {
            return false;
        }
        let mut misses = self.inner.misses.lock();
        match misses.get(key) {
            Some(at) if at.elapsed() < cooldown => true,
            Some(_) => {
                misses.remove(key);
                false
            }
            None => false,
        }
    }

    fn remember_miss(&self, key: &str) {
        if !self.inner.config.miss_cooldown.is_zero() {
            self.inner.misses.lock().insert(key.to_string(), Instant::now());
        }
    }

    /// Join the in-flight refresh or start one.
    ///
    /// `observed` is the generation the caller missed against. If a newer
    /// generation is already installed, it is returned without fetching.
    fn refresh(&self, observed: Option<u64>) -> RefreshFuture {
        let mut in_flight = self.inner.in_flight.lock();

        if let Some(pending) = in_flight.as_ref() {
            return pending.clone();
        }

        if let Some(current) = self.inner.current() {
            let newer = observed.is_none_or(|seen| current.generation > seen);
            if newer {
                return futures::future::ready(Ok(current)).boxed().shared();
            }
        }

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(inner.fetch());
        let pending = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(CatalogueError::Unreachable(format!(
                    "Service directory refresh failed: {}",
                    e
                ))),
            }
        }
        .boxed()
        .shared();

        *in_flight = Some(pending.clone());
        pending
    }
}
