//! Pipeline error taxonomy.
//!
//! Every variant is terminal for the invocation: the caller receives either a
//! complete archive or exactly one of these. Engine variants carry the
//! captured process output so operators can see why a build or run died.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the project assembly pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing local assets (builder definition, overlay sources). Raised
    /// before any container process is spawned.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Request parameters failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Image build exited non-zero. Carries the engine's diagnostic output.
    #[error("image build failed: {0}")]
    Build(String),

    /// Container run exited non-zero. Carries the engine's diagnostic output.
    #[error("container run failed: {0}")]
    Run(String),

    /// Builder ran but produced no recognizable project directory.
    #[error("builder output not found for '{project}': {detail}")]
    OutputNotFound { project: String, detail: String },

    /// Local I/O failure while merging overlay assets into the project tree.
    #[error("overlay copy failed ({}: {} -> {}): {source}", .op, .src.display(), .dest.display())]
    Overlay {
        op: &'static str,
        src: PathBuf,
        dest: PathBuf,
        source: std::io::Error,
    },

    /// Failure while reading project files or writing the archive.
    #[error("packaging failed at {}: {detail}", .path.display())]
    Packaging { path: PathBuf, detail: String },

    /// Local filesystem failure outside a more specific stage (work area
    /// creation and similar).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
