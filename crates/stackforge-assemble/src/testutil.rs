//! Shared test fixtures.

use std::fs;
use std::path::Path;

pub(crate) fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Asset root with a builder definition and the full fixed overlay set.
pub(crate) fn full_asset_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("builder/Dockerfile"), "FROM scratch\n");
    write(&root.join("nginx/default.conf"), "server {}\n");
    write(&root.join("php-fpm/www.conf"), "[www]\n");
    write(&root.join("dev.docker-compose.yml"), "services: {}\n");
    write(&root.join("template.docker-compose.yml"), "services: {}\n");
    write(&root.join(".github/workflows/ci.yml"), "on: push\n");
    dir
}
