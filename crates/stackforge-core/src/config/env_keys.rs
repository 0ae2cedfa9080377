//! Environment variable key constants.

/// Local asset locations.
pub mod paths {
    /// Base directory holding the builder definition and overlay sources.
    pub const STACKFORGE_ASSETS_DIR: &str = "STACKFORGE_ASSETS_DIR";
}

/// Container engine invocation.
pub mod engine {
    /// Engine binary name or path. Default: `docker`.
    pub const STACKFORGE_DOCKER_BIN: &str = "STACKFORGE_DOCKER_BIN";

    /// Pin a fixed image tag instead of a fresh per-run tag. Pinning skips
    /// post-run image removal; concurrent builds then race on the tag.
    pub const STACKFORGE_IMAGE_TAG: &str = "STACKFORGE_IMAGE_TAG";
}

/// Pipeline tuning.
pub mod pipeline {
    /// Delay in milliseconds before the single output-locate recheck.
    pub const STACKFORGE_LOCATE_DELAY_MS: &str = "STACKFORGE_LOCATE_DELAY_MS";
}

/// HTTP gateway.
pub mod gateway {
    /// Bind address for `stackforge serve`. Default: `127.0.0.1:8080`.
    pub const STACKFORGE_BIND: &str = "STACKFORGE_BIND";
}

/// Observability and logging.
pub mod observability {
    pub const STACKFORGE_QUIET: &str = "STACKFORGE_QUIET";

    pub const STACKFORGE_LOG_LEVEL: &str = "STACKFORGE_LOG_LEVEL";

    pub const STACKFORGE_LOG_JSON: &str = "STACKFORGE_LOG_JSON";
}
