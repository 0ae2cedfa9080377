//! Config structs grouped by concern, loaded from environment variables.

use std::path::PathBuf;

use super::env_keys::{engine, gateway, observability as obv_keys, paths, pipeline};
use super::loader::{env_bool, env_optional, env_or, load_dotenv};

/// Default base directory for the builder definition and overlay sources.
const DEFAULT_ASSETS_DIR: &str = "assets";

/// Location of local pipeline assets.
#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub assets_dir: PathBuf,
}

impl AssetConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            assets_dir: PathBuf::from(env_or(paths::STACKFORGE_ASSETS_DIR, || {
                DEFAULT_ASSETS_DIR.to_string()
            })),
        }
    }
}

/// Container engine invocation settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine binary name or path.
    pub docker_bin: String,
    /// When set, reuse this tag across runs instead of a fresh per-run tag.
    pub fixed_image_tag: Option<String>,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            docker_bin: env_or(engine::STACKFORGE_DOCKER_BIN, || "docker".to_string()),
            fixed_image_tag: env_optional(engine::STACKFORGE_IMAGE_TAG),
        }
    }
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Delay before the single output-locate recheck.
    pub locate_delay_ms: u64,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            locate_delay_ms: env_optional(pipeline::STACKFORGE_LOCATE_DELAY_MS)
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
        }
    }
}

/// HTTP gateway settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            bind: env_or(gateway::STACKFORGE_BIND, || "127.0.0.1:8080".to_string()),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            quiet: env_bool(obv_keys::STACKFORGE_QUIET),
            log_level: env_or(obv_keys::STACKFORGE_LOG_LEVEL, || "info".to_string()),
            log_json: env_bool(obv_keys::STACKFORGE_LOG_JSON),
        }
    }
}
