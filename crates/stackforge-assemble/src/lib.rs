//! The project assembly pipeline.
//!
//! Resolve local assets, build and run the containerized builder, locate its
//! output, overlay the fixed deployment assets, and package the merged tree
//! into one zip. Stages run in that order; each fails fast and none retries
//! another.

pub mod archive;
pub mod assets;
pub mod locate;
pub mod overlay;
pub mod pipeline;
pub mod workarea;

#[cfg(test)]
pub(crate) mod testutil;

pub use assets::{AssetPaths, OverlayEntry, OverlayMode, OVERLAY_SPEC};
pub use pipeline::Assembler;
pub use workarea::WorkArea;
