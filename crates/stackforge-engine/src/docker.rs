//! Docker CLI invocation with captured output.
//!
//! Two operations: image build (definition directory as context, named
//! build-time variables) and container run (`--rm`, named env vars, one bind
//! mount). A non-zero exit from either is fatal and never retried.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Output};

use stackforge_core::config::EngineConfig;
use stackforge_core::{Error, Result};
use tracing::{debug, warn};

use crate::mount::translate_mount_path;

/// Fixed in-container path the builder writes its output to.
pub const CONTAINER_OUT_DIR: &str = "/app/out";

/// Captured stdout/stderr of one engine invocation.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub stdout: String,
    pub stderr: String,
}

impl EngineOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Best available diagnostic text: stderr, else stdout, else a generic note.
    pub fn diagnostic(&self) -> String {
        if !self.stderr.trim().is_empty() {
            self.stderr.trim().to_string()
        } else if !self.stdout.trim().is_empty() {
            self.stdout.trim().to_string()
        } else {
            "engine produced no output".to_string()
        }
    }
}

/// Container engine seam. Production shells out to the docker CLI; tests
/// inject stubs so the pipeline runs without a container runtime.
pub trait ContainerEngine: Send + Sync {
    /// Build an image from `context_dir`, tagging it `tag`. Each entry of
    /// `build_args` becomes a distinct `--build-arg`, passed through unmodified.
    fn build(
        &self,
        context_dir: &Path,
        tag: &str,
        build_args: &BTreeMap<String, String>,
    ) -> Result<EngineOutput>;

    /// Run the tagged image with `--rm` semantics, injecting `env` and
    /// bind-mounting `mount_host_path` to [`CONTAINER_OUT_DIR`].
    fn run(
        &self,
        tag: &str,
        env: &[(String, String)],
        mount_host_path: &Path,
    ) -> Result<EngineOutput>;

    /// Best-effort removal of a tagged image from the local store.
    fn remove_image(&self, _tag: &str) {}
}

/// Production engine: the `docker` binary on PATH (or an override).
#[derive(Debug, Clone)]
pub struct DockerCli {
    bin: String,
}

impl DockerCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self::new(cfg.docker_bin.clone())
    }

    fn invoke(&self, cmd: &mut Command, what: &str) -> std::result::Result<Output, String> {
        cmd.output().map_err(|e| {
            format!(
                "failed to invoke '{}' for {what}: {e}. Is the container engine installed and on PATH?",
                self.bin
            )
        })
    }
}

impl ContainerEngine for DockerCli {
    fn build(
        &self,
        context_dir: &Path,
        tag: &str,
        build_args: &BTreeMap<String, String>,
    ) -> Result<EngineOutput> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("build").arg("-t").arg(tag);
        for (key, value) in build_args {
            cmd.arg("--build-arg").arg(format!("{key}={value}"));
        }
        cmd.arg(".").current_dir(context_dir);
        debug!(tag, context = %context_dir.display(), "docker build");

        let output = self.invoke(&mut cmd, "image build").map_err(Error::Build)?;
        let captured = EngineOutput::from_output(&output);
        if !output.status.success() {
            return Err(Error::Build(captured.diagnostic()));
        }
        Ok(captured)
    }

    fn run(
        &self,
        tag: &str,
        env: &[(String, String)],
        mount_host_path: &Path,
    ) -> Result<EngineOutput> {
        let volume = format!(
            "{}:{}",
            translate_mount_path(&mount_host_path.to_string_lossy()),
            CONTAINER_OUT_DIR
        );
        let mut cmd = Command::new(&self.bin);
        cmd.args(["run", "--rm"]);
        for (key, value) in env {
            cmd.arg("-e").arg(format!("{key}={value}"));
        }
        cmd.arg("-v").arg(&volume).arg(tag);
        debug!(tag, %volume, "docker run");

        let output = self.invoke(&mut cmd, "container run").map_err(Error::Run)?;
        let captured = EngineOutput::from_output(&output);
        if !output.status.success() {
            return Err(Error::Run(captured.diagnostic()));
        }
        Ok(captured)
    }

    fn remove_image(&self, tag: &str) {
        match Command::new(&self.bin).args(["rmi", tag]).output() {
            Ok(output) if output.status.success() => {
                debug!(tag, "removed run-scoped image");
            }
            Ok(output) => {
                warn!(
                    tag,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "could not remove run-scoped image"
                );
            }
            Err(e) => warn!(tag, error = %e, "could not invoke image removal"),
        }
    }
}
