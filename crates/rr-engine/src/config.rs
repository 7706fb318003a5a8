//! Engine configuration.
//!
//! Typically loaded from a JSON file by the application and handed to
//! [`EngineBuilder`](crate::EngineBuilder).  Every field has a default, so a
//! file only needs to name what it changes:
//!
//! ```json
//! { "area_name": "Bengkulu, Indonesia", "route_cache_policy": { "ttl": { "secs": 900 } } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rr_cache::StalenessPolicy;
use rr_core::GeoPoint;
use rr_network::{AreaQuery, DEFAULT_BIND_SEARCH_K};
use rr_network::loader::{DEFAULT_CENTER, DEFAULT_RADIUS_M};

use crate::{EngineError, EngineResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Named-area query handed to the graph loader.
    pub area_name: String,

    /// Centre of the point-radius fallback query.
    pub fallback_center: GeoPoint,

    /// Radius of the point-radius fallback query, metres.
    pub fallback_radius_m: f64,

    /// Nearest candidates inspected when a location's nearest node has no
    /// edges.
    pub bind_search_k: usize,

    /// When a cached route set stops being served.
    pub route_cache_policy: StalenessPolicy,

    /// Route count used by callers that do not specify one.
    pub default_max_alternatives: usize,

    /// Minimum route count below which a request logs a warning.
    pub default_min_alternatives: usize,

    /// Directory route maps are written to.
    pub map_output_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            area_name:                "Bengkulu, Indonesia".to_owned(),
            fallback_center:          DEFAULT_CENTER,
            fallback_radius_m:        DEFAULT_RADIUS_M,
            bind_search_k:            DEFAULT_BIND_SEARCH_K,
            route_cache_policy:       StalenessPolicy::Never,
            default_max_alternatives: 5,
            default_min_alternatives: 3,
            map_output_dir:           PathBuf::from("maps"),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> EngineResult<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// The loader query described by this configuration.
    pub fn area_query(&self) -> AreaQuery {
        AreaQuery {
            area_name:         self.area_name.clone(),
            fallback_center:   self.fallback_center,
            fallback_radius_m: self.fallback_radius_m,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.fallback_center.is_valid() {
            return Err(EngineError::Config("fallback_center must be finite".into()));
        }
        if !(self.fallback_radius_m.is_finite() && self.fallback_radius_m > 0.0) {
            return Err(EngineError::Config(format!(
                "fallback_radius_m must be positive, got {}",
                self.fallback_radius_m
            )));
        }
        if self.bind_search_k == 0 {
            return Err(EngineError::Config("bind_search_k must be at least 1".into()));
        }
        Ok(())
    }
}
