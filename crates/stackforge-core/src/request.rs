//! Build request model.
//!
//! A `BuildRequest` is validated at construction and immutable afterwards;
//! the pipeline never re-checks its fields.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Characters that make a project name unsafe as a directory and archive
/// prefix on any supported platform.
const FORBIDDEN_NAME_CHARS: &[char] =
    &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0', ' '];

/// Parameters for one pipeline invocation.
///
/// `build_args` are passed to the image build verbatim (no interpretation,
/// no defaulting); `runtime_flags` become the builder's combined-flags
/// environment variable in declared order.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    project_name: String,
    build_args: BTreeMap<String, String>,
    runtime_flags: Vec<String>,
}

impl BuildRequest {
    pub fn new(
        project_name: impl Into<String>,
        build_args: BTreeMap<String, String>,
        runtime_flags: Vec<String>,
    ) -> Result<Self> {
        let project_name = project_name.into();
        validate_project_name(&project_name)?;
        for (key, value) in &build_args {
            if key.trim().is_empty() {
                return Err(Error::InvalidRequest("build arg with empty name".into()));
            }
            if value.trim().is_empty() {
                return Err(Error::InvalidRequest(format!(
                    "build arg '{key}' must have a non-empty value"
                )));
            }
        }
        Ok(Self {
            project_name,
            build_args,
            runtime_flags,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn build_args(&self) -> &BTreeMap<String, String> {
        &self.build_args
    }

    pub fn runtime_flags(&self) -> &[String] {
        &self.runtime_flags
    }

    /// Flags joined into the single string handed to the builder, trimmed of
    /// leading/trailing whitespace.
    pub fn flags_string(&self) -> String {
        self.runtime_flags.join(" ").trim().to_string()
    }
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidRequest("project name must not be empty".into()));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(Error::InvalidRequest(format!(
            "project name contains forbidden character {c:?}"
        )));
    }
    if name.contains("..") || name.starts_with('.') || name.starts_with('-') {
        return Err(Error::InvalidRequest(format!(
            "project name '{name}' is not filesystem-safe"
        )));
    }
    Ok(())
}

/// The finished archive. Owned by the caller after the pipeline returns;
/// retrieval and eventual deletion are the caller's responsibility.
#[derive(Debug, Clone)]
pub struct ArchiveArtifact {
    pub path: PathBuf,
    pub project_name: String,
}
