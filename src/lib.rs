//! # Brushforge
//!
//! Turn a directory of texture images into installable Procreate brush
//! packages (`<id>.brush`) and bundle them into named brush-set
//! collections (`<name>.brushset`). Your filesystem is the data source:
//! any image whose filename starts with digits becomes a brush, ordered
//! and identified by that numeric prefix.
//!
//! # Architecture: Build Pipeline
//!
//! ```text
//! 1. Discover   textures/       →  BuildRequest list   (numeric ids, numeric order)
//! 2. Build      per request     →  <id>.brush          (bounded worker pool)
//! 3. Bundle     built packages  →  <name>.brushset     (fresh uids + manifest)
//! ```
//!
//! Stage 2 runs every request independently: each build stages its
//! package in an exclusive scratch directory, archives it, and installs
//! it with a retried atomic rename. One bad asset is reported and
//! skipped; it never aborts the batch. Stage 3 runs strictly after the
//! stage-2 join, over the succeeded packages only.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discover`] | Stage 1 — numeric-prefix scan of the source directory |
//! | [`settings`] | `Brush.archive` template rendering + external plist conversion |
//! | [`imaging`] | Grain and thumbnail renditions behind the [`imaging::GrainBackend`] trait |
//! | [`package`] | Stage 2 — per-asset staging, archiving, atomic install |
//! | [`coordinator`] | Stage 2 — bounded rayon pool, failure isolation, build report |
//! | [`collection`] | Stage 3 — uid minting, member extraction, plist manifest |
//! | [`archive`] | Zip pack/extract + the shared remove-then-rename install |
//! | [`retry`] | Bounded retry with fixed delay (install rename hazard) |
//! | [`config`] | Explicit [`config::BuildConfig`] passed into every stage |
//! | [`output`] | CLI output formatting — information-first entity display |
//!
//! # Design Decisions
//!
//! ## Package files are plain zip
//!
//! A `.brush` is a renamed zip archive; so is a `.brushset`. The pipeline
//! treats both as opaque containers via the `zip` crate and never invents
//! its own format. The only subtlety is installation: archives are
//! produced under a `.zip` staging name and renamed into place, so a
//! concurrent reader of the final path sees a complete archive or
//! nothing, never a partial write.
//!
//! ## The converter is a subprocess, behind a trait
//!
//! Binary plist conversion is delegated to Apple's `plutil`, the one
//! external tool in the pipeline. It sits behind
//! [`settings::SettingsConverter`] with the executable name resolved once
//! at startup, so build logic never branches on the host OS and tests run
//! without the tool installed.
//!
//! ## Fresh identity per collection build
//!
//! Member uids are minted anew on every `.brushset` build. Manifests are
//! therefore not stable across rebuilds — intentional, matching how
//! Procreate treats imported sets — and nothing may rely on uid stability
//! beyond a single build invocation.

pub mod archive;
pub mod collection;
pub mod config;
pub mod coordinator;
pub mod discover;
pub mod imaging;
pub mod output;
pub mod package;
pub mod retry;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_helpers;
