//! Container engine capability.
//!
//! The pipeline talks to the engine through the [`ContainerEngine`] trait so
//! merge/package logic stays testable without a container runtime present.
//! [`DockerCli`] is the production implementation.

pub mod docker;
pub mod mount;
pub mod tag;

pub use docker::{ContainerEngine, DockerCli, EngineOutput, CONTAINER_OUT_DIR};
pub use mount::translate_mount_path;
pub use tag::{RunTag, TagStrategy};
