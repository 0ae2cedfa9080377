//! Overlay application.
//!
//! Copies the fixed deployment assets into the generated project tree.
//! Merge mode walks the source tree and copies file-by-file — there is no
//! standard-library primitive that merges into an existing destination
//! without replacing it wholesale. Partially merged state is not rolled
//! back; the work area teardown is the only cleanup.

use std::fs;
use std::io;
use std::path::Path;

use stackforge_core::{Error, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::assets::{AssetPaths, OverlayEntry, OverlayMode};

/// Apply `spec` to `project_dir` in declared order. Later entries may
/// overwrite files placed by earlier ones.
pub fn apply(project_dir: &Path, assets: &AssetPaths, spec: &[OverlayEntry]) -> Result<()> {
    for entry in spec {
        let src = assets.overlay_source(entry);
        let dest = project_dir.join(entry.dest);
        apply_entry(&src, &dest, entry.mode).map_err(|source| Error::Overlay {
            op: mode_name(entry.mode),
            src: src.clone(),
            dest: dest.clone(),
            source,
        })?;
        debug!(src = %src.display(), dest = %dest.display(), "overlay applied");
    }
    Ok(())
}

fn mode_name(mode: OverlayMode) -> &'static str {
    match mode {
        OverlayMode::MergeTree => "merge-tree",
        OverlayMode::ReplaceTree => "replace-tree",
        OverlayMode::CopyFile => "copy-file",
    }
}

fn apply_entry(src: &Path, dest: &Path, mode: OverlayMode) -> io::Result<()> {
    match mode {
        OverlayMode::CopyFile => {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(src, dest)?;
            Ok(())
        }
        OverlayMode::ReplaceTree => {
            if dest.exists() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("destination already exists: {}", dest.display()),
                ));
            }
            copy_tree(src, dest)
        }
        // Fresh destination and merge walk the same way; the walk is
        // deterministic and overwrite-stable either way.
        OverlayMode::MergeTree => copy_tree(src, dest),
    }
}

/// Walk `src` and mirror it under `dest`, creating missing directories and
/// overwriting existing files of the same relative path.
fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
