//! Tagged record envelope around every cached payload.
//!
//! ```json
//! { "kind": "route_set", "format_version": 1, "created_unix_secs": 1717000000,
//!   "traffic_version": 3, "payload": [ ... ] }
//! ```
//!
//! Decoding checks `kind` and `format_version` before touching the payload.
//! Any mismatch or parse failure is reported as [`CacheError::Corrupt`] so
//! callers can take the recompute branch.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{CacheError, CacheResult, KvStore};

/// Bumped whenever a payload layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub kind:              String,
    pub format_version:    u32,
    pub created_unix_secs: u64,
    /// Traffic version the payload was computed under.
    pub traffic_version:   u64,
    pub payload:           T,
}

/// Seconds since the Unix epoch (0 if the clock is before it).
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl<T> Envelope<T> {
    /// Wrap `payload`, stamped with the current time.
    pub fn new(kind: &str, traffic_version: u64, payload: T) -> Self {
        Self {
            kind: kind.to_owned(),
            format_version: FORMAT_VERSION,
            created_unix_secs: unix_now(),
            traffic_version,
            payload,
        }
    }

    /// Age at `now`, saturating at zero for entries from the future.
    pub fn age_secs(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_unix_secs)
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn encode(&self) -> CacheResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode bytes stored under `key`, expecting a `kind` record.
    pub fn decode(key: &str, kind: &str, bytes: &[u8]) -> CacheResult<Self> {
        let corrupt = |reason: String| CacheError::Corrupt { key: key.to_owned(), reason };

        // Header first, so a kind/version mismatch is reported as such rather
        // than as whatever payload error it would cause.
        #[derive(Deserialize)]
        struct Header {
            kind:           String,
            format_version: u32,
        }
        let header: Header = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
        if header.kind != kind {
            return Err(corrupt(format!("expected {kind:?} record, found {:?}", header.kind)));
        }
        if header.format_version != FORMAT_VERSION {
            return Err(corrupt(format!(
                "format version {} (expected {FORMAT_VERSION})",
                header.format_version
            )));
        }

        serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))
    }
}

// ── Typed access ──────────────────────────────────────────────────────────────

/// Read and decode a record.  `Ok(None)` when the key is absent.
pub fn get_record<T: DeserializeOwned>(
    store: &dyn KvStore,
    key:   &str,
    kind:  &str,
) -> CacheResult<Option<Envelope<T>>> {
    match store.get(key)? {
        None => Ok(None),
        Some(bytes) => Envelope::decode(key, kind, &bytes).map(Some),
    }
}

/// Encode and store a record, overwriting any previous value.
pub fn put_record<T: Serialize>(
    store:           &dyn KvStore,
    key:             &str,
    kind:            &str,
    traffic_version: u64,
    payload:         &T,
) -> CacheResult<()> {
    let bytes = Envelope::new(kind, traffic_version, payload).encode()?;
    store.put(key, &bytes)
}
