//! Local asset resolution.
//!
//! The builder definition and the overlay sources are fixed paths under one
//! asset root. They are all validated up front so a misconfigured deployment
//! fails before paying for an image build.

use std::path::{Path, PathBuf};

use stackforge_core::{Error, Result};

/// Subdirectory of the asset root holding the builder image definition.
pub const BUILDER_DIR: &str = "builder";

/// Entrypoint file the builder definition must contain.
pub const BUILDER_ENTRYPOINT: &str = "Dockerfile";

/// How one overlay entry is applied to the generated project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    /// Copy the tree; if the destination exists, merge file-by-file with
    /// last-write-wins overwrites.
    MergeTree,
    /// Copy the tree; an already-existing destination is an error.
    ReplaceTree,
    /// Copy a single file, overwriting any existing destination file.
    CopyFile,
}

/// One overlay entry: source relative to the asset root, destination
/// relative to the project directory.
#[derive(Debug, Clone, Copy)]
pub struct OverlayEntry {
    pub source: &'static str,
    pub dest: &'static str,
    pub mode: OverlayMode,
}

/// The fixed overlay set, applied in declared order. Later entries may
/// overwrite files placed by earlier ones; that ordering is deliberate.
pub const OVERLAY_SPEC: &[OverlayEntry] = &[
    OverlayEntry {
        source: "nginx",
        dest: "nginx",
        mode: OverlayMode::ReplaceTree,
    },
    OverlayEntry {
        source: "php-fpm",
        dest: "php-fpm",
        mode: OverlayMode::ReplaceTree,
    },
    OverlayEntry {
        source: "dev.docker-compose.yml",
        dest: "dev.docker-compose.yml",
        mode: OverlayMode::CopyFile,
    },
    OverlayEntry {
        source: "template.docker-compose.yml",
        dest: "template.docker-compose.yml",
        mode: OverlayMode::CopyFile,
    },
    OverlayEntry {
        source: ".github",
        dest: ".github",
        mode: OverlayMode::MergeTree,
    },
];

/// Validated asset locations. Construction fails with a `Configuration`
/// error naming the first missing path.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    root: PathBuf,
    builder_dir: PathBuf,
}

impl AssetPaths {
    pub fn resolve(root: &Path) -> Result<Self> {
        let builder_dir = root.join(BUILDER_DIR);
        if !builder_dir.is_dir() {
            return Err(Error::Configuration(format!(
                "builder definition directory not found at {}",
                builder_dir.display()
            )));
        }
        let entrypoint = builder_dir.join(BUILDER_ENTRYPOINT);
        if !entrypoint.is_file() {
            return Err(Error::Configuration(format!(
                "{BUILDER_ENTRYPOINT} not found at {}",
                entrypoint.display()
            )));
        }
        for entry in OVERLAY_SPEC {
            let source = root.join(entry.source);
            if !source.exists() {
                return Err(Error::Configuration(format!(
                    "overlay source missing: {}",
                    source.display()
                )));
            }
        }
        Ok(Self {
            root: root.to_path_buf(),
            builder_dir,
        })
    }

    pub fn builder_dir(&self) -> &Path {
        &self.builder_dir
    }

    pub fn overlay_source(&self, entry: &OverlayEntry) -> PathBuf {
        self.root.join(entry.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::full_asset_root;
    use std::fs;

    #[test]
    fn resolves_complete_asset_root() {
        let dir = full_asset_root();
        let assets = AssetPaths::resolve(dir.path()).unwrap();
        assert_eq!(assets.builder_dir(), dir.path().join("builder"));
    }

    #[test]
    fn missing_builder_dir_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AssetPaths::resolve(dir.path()).unwrap_err();
        match err {
            stackforge_core::Error::Configuration(msg) => {
                assert!(msg.contains("builder definition directory"))
            }
            other => panic!("expected Configuration, got {other:?}"),
        }
    }

    #[test]
    fn missing_entrypoint_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("builder")).unwrap();
        let err = AssetPaths::resolve(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Dockerfile"));
    }

    #[test]
    fn missing_overlay_source_is_configuration_error() {
        let dir = full_asset_root();
        fs::remove_file(dir.path().join("dev.docker-compose.yml")).unwrap();
        let err = AssetPaths::resolve(dir.path()).unwrap_err();
        assert!(err.to_string().contains("dev.docker-compose.yml"));
    }
}
