//! Archive packaging.
//!
//! Walks the finished project tree in sorted order and writes every regular
//! file into a deflate zip. Entry names are relative to the work area root,
//! so each one is prefixed `<project_name>/` — never absolute, never
//! containing `..`. Empty directories get no entries. The archive lands in
//! the system temp directory because the work area is torn down before the
//! caller reads the result.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use stackforge_core::{Error, Result};
use tracing::info;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

fn packaging(path: &Path, detail: impl ToString) -> Error {
    Error::Packaging {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Package `project_dir` into `<temp>/<project_name>.zip`, overwriting any
/// pre-existing archive at that path.
pub fn pack(project_dir: &Path, work_root: &Path, project_name: &str) -> Result<PathBuf> {
    let temp_root = std::env::temp_dir();
    let archive_path = temp_root.join(format!("{project_name}.zip"));
    // Staged write: the archive only appears at the retrieval path once it
    // is complete. A failure mid-walk must not leave a truncated zip there.
    let staged = tempfile::Builder::new()
        .prefix(project_name)
        .suffix(".zip.partial")
        .tempfile_in(&temp_root)
        .map_err(|e| packaging(&archive_path, e))?;
    let mut writer = ZipWriter::new(staged);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0usize;
    let mut buf = Vec::new();
    for entry in WalkDir::new(project_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| packaging(project_dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(work_root)
            .map_err(|e| packaging(entry.path(), e))?;
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        writer
            .start_file(name, options)
            .map_err(|e| packaging(entry.path(), e))?;
        buf.clear();
        File::open(entry.path())
            .and_then(|mut f| f.read_to_end(&mut buf))
            .map_err(|e| packaging(entry.path(), e))?;
        writer
            .write_all(&buf)
            .map_err(|e| packaging(entry.path(), e))?;
        entries += 1;
    }

    let staged = writer.finish().map_err(|e| packaging(&archive_path, e))?;
    staged
        .persist(&archive_path)
        .map_err(|e| packaging(&archive_path, e))?;
    info!(archive = %archive_path.display(), entries, "archive written");
    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::write;

    fn entry_names(archive_path: &Path) -> Vec<String> {
        let file = File::open(archive_path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        archive.file_names().map(String::from).collect()
    }

    #[test]
    fn entries_are_rooted_at_project_name() {
        let work = tempfile::tempdir().unwrap();
        let project = work.path().join("pack-demo");
        write(&project.join("composer.json"), "{}");
        write(&project.join("app/Models/User.php"), "<?php");
        std::fs::create_dir_all(project.join("storage/logs")).unwrap();

        let archive = pack(&project, work.path(), "pack-demo").unwrap();
        let mut names = entry_names(&archive);
        names.sort();

        assert_eq!(
            names,
            vec![
                "pack-demo/app/Models/User.php".to_string(),
                "pack-demo/composer.json".to_string(),
            ]
        );
        for name in &names {
            assert!(name.starts_with("pack-demo/"));
            assert!(!name.contains(".."));
            assert!(!name.starts_with('/'));
        }
        std::fs::remove_file(archive).unwrap();
    }

    #[test]
    fn round_trips_file_bytes() {
        let work = tempfile::tempdir().unwrap();
        let project = work.path().join("pack-bytes");
        write(&project.join("readme.md"), "hello archive\n");

        let archive_path = pack(&project, work.path(), "pack-bytes").unwrap();
        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("pack-bytes/readme.md")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "hello archive\n");
        std::fs::remove_file(archive_path).unwrap();
    }

    #[test]
    fn overwrites_pre_existing_archive() {
        let work = tempfile::tempdir().unwrap();
        let project = work.path().join("pack-overwrite");
        write(&project.join("v2.txt"), "2");

        let stale = std::env::temp_dir().join("pack-overwrite.zip");
        std::fs::write(&stale, b"not a zip").unwrap();

        let archive_path = pack(&project, work.path(), "pack-overwrite").unwrap();
        assert_eq!(archive_path, stale);
        assert_eq!(entry_names(&archive_path), vec!["pack-overwrite/v2.txt"]);
        std::fs::remove_file(archive_path).unwrap();
    }

    #[test]
    fn failed_pack_preserves_existing_archive() {
        let work = tempfile::tempdir().unwrap();
        let project = work.path().join("pack-keep");

        let retrieval = std::env::temp_dir().join("pack-keep.zip");
        std::fs::write(&retrieval, b"previous archive").unwrap();

        // Project dir never created, so the walk fails before finish.
        let err = pack(&project, work.path(), "pack-keep").unwrap_err();
        assert!(matches!(err, Error::Packaging { .. }));
        assert_eq!(std::fs::read(&retrieval).unwrap(), b"previous archive");
        std::fs::remove_file(retrieval).unwrap();
    }

    #[test]
    fn missing_project_dir_is_packaging_error() {
        let work = tempfile::tempdir().unwrap();
        let project = work.path().join("never-created");
        let err = pack(&project, work.path(), "never-created").unwrap_err();
        match err {
            Error::Packaging { .. } => {}
            other => panic!("expected Packaging error, got {other:?}"),
        }
    }
}
