//! # Runtime Configuration
//!
//! Environment-driven settings for the host process. Everything has a sane
//! default; a fresh checkout runs with no configuration at all.

use std::env;
use std::path::PathBuf;

use earntask_state::StoreConfig;

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Directory holding the snapshot document.
    pub data_dir: PathBuf,
    /// Enable the hardened validation mode of the store.
    pub strict: bool,
    /// Tracing filter directive (e.g. `info`, `earntask_state=debug`).
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            strict: false,
            log_filter: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Read configuration from the environment.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `EARNTASK_DATA_DIR` | `data` | Snapshot directory |
    /// | `EARNTASK_STRICT` | unset | `1`/`true` enables strict validation |
    /// | `EARNTASK_LOG` | `info` | Tracing filter |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: env::var_os("EARNTASK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            strict: env::var("EARNTASK_STRICT")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.strict),
            log_filter: env::var("EARNTASK_LOG").unwrap_or(defaults.log_filter),
        }
    }

    /// Derive the store configuration for this runtime.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            strict: self.strict,
            ..StoreConfig::default()
        }
    }
}
