//! Per-run scratch space.
//!
//! One `WorkArea` per pipeline invocation, never shared. The directory and
//! everything in it are removed when the value drops, on success and on
//! every failure path alike.

use std::path::Path;

use stackforge_core::Result;
use tempfile::TempDir;

pub struct WorkArea {
    dir: TempDir,
}

impl WorkArea {
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("stackforge-").tempdir()?;
        Ok(Self { dir })
    }

    /// Root of the work area; doubles as the builder's mount point.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
