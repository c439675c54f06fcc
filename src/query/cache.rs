use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::debug;
use moka::future::Cache as MokaCache;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::domain::entity::EntityKind;
use crate::domain::list::{ListQuery, ListResponse};
use crate::gateway::errors::{ApiError, ApiResult};
use crate::query::{CacheEvent, CacheKey, QueryState};

pub type FetchResult = Result<Arc<ListResponse<Value>>, ApiError>;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
const EVENT_CAPACITY: usize = 64;
/// Entries untouched for this many TTLs are dropped altogether.
const EVICT_AFTER_TTLS: u32 = 5;

/// Last known outcome for one key.
#[derive(Clone, Default)]
struct Entry {
    data: Option<Arc<ListResponse<Value>>>,
    error: Option<ApiError>,
    fetched_at: Option<Instant>,
    /// Invalidation generation of the entity when the data was fetched.
    generation: u64,
}

/// A load is shared only by callers that saw the same generation, so a fetch
/// started before an invalidation is never joined after it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LoadKey {
    key: CacheKey,
    generation: u64,
}

#[derive(Default)]
struct Counters {
    /// Bumped by every invalidation of the entity.
    generations: HashMap<EntityKind, u64>,
    /// Running loads per key. A load that is dropped unfinished decrements
    /// its count through [`LoadGuard`].
    running: HashMap<CacheKey, usize>,
}

struct LoadGuard {
    counters: Arc<Mutex<Counters>>,
    key: CacheKey,
}

impl LoadGuard {
    fn start(counters: &Arc<Mutex<Counters>>, key: CacheKey) -> Self {
        *lock(counters).running.entry(key.clone()).or_default() += 1;
        Self {
            counters: Arc::clone(counters),
            key,
        }
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        let mut counters = lock(&self.counters);
        if let Some(count) = counters.running.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                counters.running.remove(&self.key);
            }
        }
    }
}

fn lock(counters: &Mutex<Counters>) -> MutexGuard<'_, Counters> {
    counters.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory cache of list responses keyed by entity and serialized query.
///
/// Cloning is cheap and every clone shares the same store, so one instance is
/// created at start-up and handed to handlers and controllers explicitly.
///
/// Concurrent loads of one key are coalesced by moka: when the caller running
/// the load is dropped, a waiting caller takes over with its own fetcher.
#[derive(Clone)]
pub struct QueryCache {
    entries: MokaCache<CacheKey, Entry>,
    loads: MokaCache<LoadKey, Arc<ListResponse<Value>>>,
    counters: Arc<Mutex<Counters>>,
    events: broadcast::Sender<CacheEvent>,
    ttl: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: MokaCache::builder()
                .time_to_idle(ttl * EVICT_AFTER_TTLS)
                .build(),
            loads: MokaCache::builder().build(),
            counters: Arc::new(Mutex::new(Counters::default())),
            events,
            ttl,
        }
    }

    fn generation(&self, kind: EntityKind) -> u64 {
        lock(&self.counters)
            .generations
            .get(&kind)
            .copied()
            .unwrap_or_default()
    }

    fn is_running(&self, key: &CacheKey) -> bool {
        lock(&self.counters).running.contains_key(key)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Returns the list for `query`, calling `fetcher` only when there is no
    /// fresh entry and no fetch for the same key already in flight.
    pub async fn fetch<F, Fut>(
        &self,
        kind: EntityKind,
        query: &ListQuery,
        fetcher: F,
    ) -> FetchResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<ListResponse<Value>>>,
    {
        let key = CacheKey::new(kind, query);
        let generation = self.generation(kind);

        if let Some(entry) = self.entries.get(&key).await {
            let fresh = entry.generation == generation
                && entry
                    .fetched_at
                    .is_some_and(|at| at.elapsed() < self.ttl);
            if let (true, Some(data)) = (fresh, entry.data) {
                return Ok(data);
            }
        }

        let load_key = LoadKey {
            key: key.clone(),
            generation,
        };
        let load = {
            let counters = Arc::clone(&self.counters);
            let key = key.clone();
            async move {
                let _guard = LoadGuard::start(&counters, key.clone());
                debug!("Fetching {key}");
                fetcher().await.map(Arc::new)
            }
        };

        let result = self
            .loads
            .try_get_with(load_key.clone(), load)
            .await
            .map_err(|err| ApiError::clone(&err));
        self.loads.invalidate(&load_key).await;
        self.settle(&key, generation, &result).await;
        result
    }

    /// Stores the outcome unless the entity was invalidated since
    /// `generation` was read.
    async fn settle(&self, key: &CacheKey, generation: u64, result: &FetchResult) {
        if self.generation(key.kind) != generation {
            debug!("Dropping result for {key} fetched before an invalidation");
            return;
        }

        let mut entry = self.entries.get(key).await.unwrap_or_default();
        match result {
            Ok(data) => {
                entry.data = Some(Arc::clone(data));
                entry.error = None;
                entry.fetched_at = Some(Instant::now());
                entry.generation = generation;
            }
            Err(err) => {
                debug!("Fetch for {key} failed: {err}");
                entry.error = Some(err.clone());
            }
        }
        self.entries.insert(key.clone(), entry).await;
        let _ = self.events.send(CacheEvent::Updated(key.clone()));
    }

    /// Snapshot of the flags and data cached for `query`.
    pub async fn state(&self, kind: EntityKind, query: &ListQuery) -> QueryState<Value> {
        let key = CacheKey::new(kind, query);
        let entry = self.entries.get(&key).await.unwrap_or_default();
        let is_fetching = self.is_running(&key);
        QueryState {
            is_loading: is_fetching && entry.data.is_none(),
            is_fetching,
            data: entry.data,
            error: entry.error,
        }
    }

    /// Marks every list of `kind` stale. Data is kept for dimmed rendering but
    /// the next read goes to the backend, and fetches already in flight are
    /// no longer trusted to refresh the entry.
    pub fn invalidate(&self, kind: EntityKind) {
        let generation = {
            let mut counters = lock(&self.counters);
            let generation = counters.generations.entry(kind).or_default();
            *generation += 1;
            *generation
        };
        debug!("Invalidated cached {kind} lists (generation {generation})");
        let _ = self.events.send(CacheEvent::Invalidated(kind));
    }

    pub async fn is_stale(&self, kind: EntityKind, query: &ListQuery) -> bool {
        let key = CacheKey::new(kind, query);
        let generation = self.generation(kind);
        self.entries
            .get(&key)
            .await
            .is_some_and(|entry| entry.data.is_some() && entry.generation != generation)
    }
}
