//! Grain rendition backend trait.
//!
//! The [`GrainBackend`] trait defines the two renditions every brush
//! package needs: the grain image and the QuickLook thumbnail. Both are
//! pure transforms — same input file, same output bytes — so the package
//! assembler stays agnostic of pixel work and tests can swap in the
//! recording mock below.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust via the
//! `image` crate, statically linked.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for grain/thumbnail rendition backends.
///
/// Implementations write their output to the given path inside the build
/// task's scratch tree; they never read another task's scratch.
pub trait GrainBackend: Sync {
    /// Derive the grain image from the source texture and write it to
    /// `output` as PNG.
    fn derive_grain(&self, source: &Path, output: &Path) -> Result<(), BackendError>;

    /// Derive the QuickLook thumbnail (center crop + radial falloff) from
    /// an already-derived grain image.
    fn derive_thumbnail(
        &self,
        grain: &Path,
        output: &Path,
        size: (u32, u32),
    ) -> Result<(), BackendError>;
}
