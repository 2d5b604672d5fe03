//! Configuration for the watch cache.
//!
//! Loaded with priority:
//! 1. Default values (hardcoded)
//! 2. Optional config file
//! 3. Environment variables (highest priority)

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether LIST snapshots are captured into the continuation cache.
    /// When disabled, continue requests fall back to the live store.
    pub snapshots_enabled: bool,
    /// Revision the cache reports before the first watch event arrives.
    pub initial_revision: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            snapshots_enabled: true,
            initial_revision: 0,
        }
    }
}

impl CacheConfig {
    /// Merges defaults, the optional config file at `path` and
    /// `WATCHCACHE_*` environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("snapshots_enabled", true)?
            .set_default("initial_revision", 0_i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        builder = builder.add_source(Environment::with_prefix("WATCHCACHE").try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }
}
