// src/config.rs

//! Configuration structures for `gl-call-bench`.
//!
//! `CONFIG` holds the defaults, overridden by a partial JSON document in the
//! `GL_CALL_BENCH_CONFIG` environment variable when it is set. The structs
//! derive serde traits so the effective configuration can also be logged.
//!
//! The scene itself (quads per loop, quad geometry) is fixed and not part of
//! the configuration.

use crate::context::Capabilities;
use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding a JSON configuration override.
pub const CONFIG_ENV_VAR: &str = "GL_CALL_BENCH_CONFIG";

/// Process-wide configuration, loaded on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Trial settings.
    pub bench: BenchConfig,
    /// Pixel format requested for the GL drawable.
    pub capabilities: Capabilities,
}

impl Config {
    /// Parses a JSON document; missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse configuration JSON")
    }

    /// Reads `CONFIG_ENV_VAR`; see `from_override`.
    pub fn load() -> Self {
        Self::from_override(env::var(CONFIG_ENV_VAR).ok().as_deref())
    }

    /// Applies an optional JSON override to the defaults. A malformed
    /// override is reported and ignored.
    pub fn from_override(json: Option<&str>) -> Self {
        match json {
            None => Self::default(),
            Some(json) => match Self::from_json_str(json) {
                Ok(config) => {
                    info!("Configuration overridden from {}.", CONFIG_ENV_VAR);
                    config
                }
                Err(e) => {
                    warn!("Ignoring {}: {:#}. Using defaults.", CONFIG_ENV_VAR, e);
                    Self::default()
                }
            },
        }
    }
}

// --- Window Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Request another paint as soon as a paint completes.
    pub auto_repaint: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "gl-call-bench".to_string(),
            width: 512,
            height: 512,
            auto_repaint: false,
        }
    }
}

// --- Benchmark Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BenchConfig {
    /// Trials per redraw; each trial measures both calling conventions.
    pub trials: usize,
    /// Soft time budget of one trial, in seconds.
    pub trial_seconds: f64,
    /// Call `finish` before stopping the stopwatch, so the measurement covers
    /// completed work rather than submitted work. Off by default.
    pub finish_before_stop: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            trials: 3,
            trial_seconds: 1.0,
            finish_before_stop: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn defaults_match_benchmark_contract() {
        let config = Config::default();
        assert_eq!(config.window.width, 512);
        assert_eq!(config.window.height, 512);
        assert_eq!(config.bench.trials, 3);
        assert_eq!(config.bench.trial_seconds, 1.0);
        assert!(!config.bench.finish_before_stop);
    }

    #[test]
    fn missing_override_uses_defaults() {
        assert_eq!(Config::from_override(None), Config::default());
    }

    #[test]
    fn override_replaces_only_given_fields() {
        let config = Config::from_override(Some(
            r#"{ "window": { "auto_repaint": true }, "bench": { "trials": 5 } }"#,
        ));
        assert!(config.window.auto_repaint);
        assert_eq!(config.window.width, 512);
        assert_eq!(config.bench.trials, 5);
        assert_eq!(config.bench.trial_seconds, 1.0);
    }

    #[test]
    fn malformed_override_falls_back_to_defaults() {
        assert_eq!(Config::from_override(Some("{ bench: ")), Config::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = Config::from_json_str(r#"{ "bench": { "trial_seconds": 0.25 } }"#).unwrap();
        assert_eq!(config.bench.trial_seconds, 0.25);
        assert_eq!(config.bench.trials, 3);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.capabilities, Capabilities::default());
    }

    #[test]
    fn serialized_config_parses_back() {
        let json = serde_json::to_string(&*CONFIG).unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), *CONFIG);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Config::from_json_str("{ bench: ").is_err());
    }
}
