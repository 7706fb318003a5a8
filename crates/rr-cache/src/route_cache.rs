//! Route-set cache with single-flight computation per key.
//!
//! # Keying
//!
//! A request is identified by `(start, end, max_alternatives, mode)`; the
//! storage key is `routes_<start>_<end>_<max>_<mode>`.  Inside the location
//! names `%` becomes `%25` and `_` becomes `%5F`, so `_` only ever separates
//! fields and distinct tuples never share a key.  Departure time and
//! `min_alternatives` are not part of the key.
//!
//! # Staleness
//!
//! | Policy           | A stored entry is served when …                      |
//! |------------------|------------------------------------------------------|
//! | `Never`          | always (entries never go stale)                      |
//! | `Ttl { secs }`   | it is at most `secs` old                             |
//! | `TrafficVersion` | it was computed under the current traffic version    |
//!
//! Stale, unreadable, or corrupt entries are treated as misses and
//! overwritten by the recomputed result.
//!
//! # Concurrency
//!
//! Concurrent misses on the same key are serialised by a per-key mutex: the
//! first caller computes and stores, the rest wait and then read the stored
//! result.  Different keys never block each other.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use rr_core::TravelMode;
use rr_search::RouteSet;

use crate::envelope::{Envelope, get_record, put_record, unix_now};
use crate::{CacheError, KvStore};

/// Envelope kind of cached route sets.
pub const ROUTE_SET_KIND: &str = "route_set";

// ── RouteKey ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub start:            String,
    pub end:              String,
    pub max_alternatives: usize,
    pub mode:             TravelMode,
}

impl RouteKey {
    pub fn new(start: &str, end: &str, max_alternatives: usize, mode: TravelMode) -> Self {
        Self { start: start.to_owned(), end: end.to_owned(), max_alternatives, mode }
    }

    /// Storage key.
    pub fn storage_key(&self) -> String {
        format!(
            "routes_{}_{}_{}_{}",
            escape_field(&self.start),
            escape_field(&self.end),
            self.max_alternatives,
            self.mode
        )
    }
}

/// Percent-escape the field separator (and the escape character itself).
fn escape_field(name: &str) -> Cow<'_, str> {
    if !name.contains(['_', '%']) {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        match c {
            '%' => out.push_str("%25"),
            '_' => out.push_str("%5F"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({}, max {})", self.start, self.end, self.mode, self.max_alternatives)
    }
}

// ── StalenessPolicy ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalenessPolicy {
    #[default]
    Never,
    Ttl { secs: u64 },
    TrafficVersion,
}

impl StalenessPolicy {
    fn is_fresh<T>(self, entry: &Envelope<T>, traffic_version: u64, now: u64) -> bool {
        match self {
            StalenessPolicy::Never => true,
            StalenessPolicy::Ttl { secs } => entry.age_secs(now) <= secs,
            StalenessPolicy::TrafficVersion => entry.traffic_version == traffic_version,
        }
    }
}

// ── RouteCache ────────────────────────────────────────────────────────────────

pub struct RouteCache {
    store:  Arc<dyn KvStore>,
    policy: StalenessPolicy,
    // Per-key single-flight locks.  Entries are dropped once nobody holds them.
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RouteCache {
    pub fn new(store: Arc<dyn KvStore>, policy: StalenessPolicy) -> Self {
        Self { store, policy, inflight: Mutex::new(HashMap::new()) }
    }

    pub fn policy(&self) -> StalenessPolicy {
        self.policy
    }

    /// The stored route set for `key`, if present, readable, and fresh.
    pub fn get(&self, key: &RouteKey, traffic_version: u64) -> Option<RouteSet> {
        let storage_key = key.storage_key();
        match get_record::<RouteSet>(self.store.as_ref(), &storage_key, ROUTE_SET_KIND) {
            Ok(Some(entry)) if self.policy.is_fresh(&entry, traffic_version, unix_now()) => {
                Some(entry.payload)
            }
            Ok(Some(_)) => {
                debug!("cached routes for {key} are stale under {:?}", self.policy);
                None
            }
            Ok(None) => None,
            Err(e @ CacheError::Corrupt { .. }) => {
                warn!("{e}; recomputing");
                None
            }
            Err(e) => {
                warn!("route cache read failed for {key}: {e}; recomputing");
                None
            }
        }
    }

    /// Store `routes` for `key`.  Failures are logged, never returned.
    pub fn put(&self, key: &RouteKey, traffic_version: u64, routes: &RouteSet) {
        let storage_key = key.storage_key();
        if let Err(e) = put_record(self.store.as_ref(), &storage_key, ROUTE_SET_KIND, traffic_version, routes) {
            warn!("failed to cache routes for {key}: {e}");
        }
    }

    /// Serve `key` from the cache, or compute, store, and return it.
    ///
    /// At most one `compute` runs per key at a time.  Errors from `compute`
    /// are returned and nothing is stored.
    pub fn get_or_compute<E>(
        &self,
        key:             &RouteKey,
        traffic_version: u64,
        compute:         impl FnOnce() -> Result<RouteSet, E>,
    ) -> Result<RouteSet, E> {
        if let Some(hit) = self.get(key, traffic_version) {
            info!("routes for {key} served from cache");
            return Ok(hit);
        }

        let storage_key = key.storage_key();
        let slot = self.slot(&storage_key);
        let result = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

            // Another caller may have filled the entry while we waited.
            if let Some(hit) = self.get(key, traffic_version) {
                debug!("routes for {key} computed by a concurrent request");
                Ok(hit)
            } else {
                let computed = compute();
                if let Ok(routes) = &computed {
                    self.put(key, traffic_version, routes);
                }
                computed
            }
        };
        self.release(&storage_key, slot);
        result
    }

    fn slot(&self, storage_key: &str) -> Arc<Mutex<()>> {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(inflight.entry(storage_key.to_owned()).or_default())
    }

    fn release(&self, storage_key: &str, slot: Arc<Mutex<()>>) {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference held by the map, one by `slot`.
        if Arc::strong_count(&slot) == 2 {
            inflight.remove(storage_key);
        }
    }
}

impl fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCache").field("policy", &self.policy).finish_non_exhaustive()
    }
}
