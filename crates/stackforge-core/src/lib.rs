//! Stackforge core: configuration, request model, error taxonomy, observability.

pub mod config;
pub mod error;
pub mod observability;
pub mod request;

pub use error::{Error, Result};
pub use request::{ArchiveArtifact, BuildRequest};
