//! Builder output location.
//!
//! The builder writes through a bind mount, and on some platforms the host
//! view of the mount lags briefly. One bounded wait-and-recheck covers that;
//! the failure message carries the mount listing and the builder's output so
//! operators can tell "produced nothing" from "produced it somewhere else".

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use stackforge_core::{Error, Result};
use tracing::debug;

/// Find the project directory the builder should have produced under the
/// mount root. `builder_output` is the captured engine output, included in
/// the failure diagnostic.
pub fn locate(
    mount_root: &Path,
    project_name: &str,
    recheck_delay: Duration,
    builder_output: &str,
) -> Result<PathBuf> {
    let candidate = mount_root.join(project_name);
    if candidate.is_dir() {
        return Ok(candidate);
    }

    debug!(
        path = %candidate.display(),
        delay_ms = recheck_delay.as_millis() as u64,
        "project directory not visible yet, rechecking once"
    );
    std::thread::sleep(recheck_delay);
    if candidate.is_dir() {
        return Ok(candidate);
    }

    let output = builder_output.trim();
    Err(Error::OutputNotFound {
        project: project_name.to_string(),
        detail: format!(
            "expected {}; mount root contains [{}]; builder output: {}",
            candidate.display(),
            list_dir(mount_root),
            if output.is_empty() { "<none>" } else { output },
        ),
    })
}

fn list_dir(root: &Path) -> String {
    match fs::read_dir(root) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names.join(", ")
        }
        Err(e) => format!("<unreadable: {e}>"),
    }
}
