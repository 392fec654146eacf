//! Read-through cache for evaluation lists, keyed by entity id.
//!
//! The cache is a latency optimization only; correctness never depends on
//! it. It is an explicit capability injected into the read path rather than
//! ambient process state, so deployments can swap it out and tests can
//! disable it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::domain::{EntiteId, Evaluation};

/// Default time-to-live for cached evaluation lists.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

pub trait EvaluationCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<Evaluation>>;
    fn set(&self, key: &str, value: Vec<Evaluation>, ttl: Duration);
    fn invalidate(&self, key: &str);
}

/// Cache key for an entity's evaluation history.
pub fn history_cache_key(entite_id: &EntiteId) -> String {
    format!("evaluations_{entite_id}")
}

/// In-memory cache with per-entry expiry. Entries are dropped lazily on the
/// next read past their deadline.
#[derive(Default)]
pub struct TtlCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    expires_at: Instant,
    value: Vec<Evaluation>,
}

impl EvaluationCache for TtlCache {
    fn get(&self, key: &str) -> Option<Vec<Evaluation>> {
        let mut guard = self.entries.lock().expect("cache mutex poisoned");
        match guard.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                guard.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: Vec<Evaluation>, ttl: Duration) {
        let mut guard = self.entries.lock().expect("cache mutex poisoned");
        guard.insert(
            key.to_string(),
            CacheEntry {
                expires_at: Instant::now() + ttl,
                value,
            },
        );
    }

    fn invalidate(&self, key: &str) {
        let mut guard = self.entries.lock().expect("cache mutex poisoned");
        guard.remove(key);
    }
}

/// Cache that stores nothing, for tests and cache-less deployments.
#[derive(Default, Clone, Copy)]
pub struct NoopCache;

impl EvaluationCache for NoopCache {
    fn get(&self, _key: &str) -> Option<Vec<Evaluation>> {
        None
    }

    fn set(&self, _key: &str, _value: Vec<Evaluation>, _ttl: Duration) {}

    fn invalidate(&self, _key: &str) {}
}
