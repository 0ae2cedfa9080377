//! Image tag strategy.
//!
//! A fixed tag shared by concurrent invocations is a build/tag race, so the
//! default derives a fresh tag per run and removes the image afterwards.
//! Deployments that serialize builds can pin a tag to keep layer-cache reuse.

use stackforge_core::config::EngineConfig;
use uuid::Uuid;

const TAG_PREFIX: &str = "stackforge-build";

/// The tag chosen for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunTag {
    pub tag: String,
    /// Remove the image after the run (per-run tags only).
    pub remove_after_run: bool,
}

/// How image tags are assigned across runs.
#[derive(Debug, Clone)]
pub enum TagStrategy {
    /// Fresh unique tag per invocation; image removed after the run.
    PerRun,
    /// Fixed tag reused across runs; image left in the local store.
    Fixed(String),
}

impl TagStrategy {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        match &cfg.fixed_image_tag {
            Some(tag) => TagStrategy::Fixed(tag.clone()),
            None => TagStrategy::PerRun,
        }
    }

    /// Pick the tag for the next run.
    pub fn next(&self) -> RunTag {
        match self {
            TagStrategy::PerRun => RunTag {
                tag: format!("{TAG_PREFIX}-{}", Uuid::new_v4()),
                remove_after_run: true,
            },
            TagStrategy::Fixed(tag) => RunTag {
                tag: tag.clone(),
                remove_after_run: false,
            },
        }
    }
}
