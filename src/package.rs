//! Package assembly — one source image to one installed `.brush` file.
//!
//! Assembly stages everything inside a scratch directory exclusive to the
//! build task, then archives and installs it:
//!
//! ```text
//! scratch/
//! ├── Brush.archive            # binary settings (template + id, converted)
//! ├── Grain.png                # derived grain rendition
//! ├── QuickLook/
//! │   └── Thumbnail.png        # 1060×324 preview with radial falloff
//! └── Signature/               # static subtree, copied verbatim
//! ```
//!
//! The scratch tree's *contents* are zipped to `<id>.brush.zip` next to
//! the final target and renamed into place as `<id>.brush` (see
//! [`archive::install`]). An existing package with the same id is
//! replaced. The staged and final trees are disjoint from every other
//! task's, so no locking is involved anywhere in this module.

use crate::archive::{self, ArchiveError, InstallError};
use crate::config::BuildConfig;
use crate::discover::BuildRequest;
use crate::imaging::{BackendError, GrainBackend};
use crate::settings::{self, SettingsConverter, SettingsError, SettingsTemplate};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

/// Settings artifact at the package root.
pub const SETTINGS_FILE: &str = "Brush.archive";
/// Grain rendition at the package root.
pub const GRAIN_FILE: &str = "Grain.png";
/// Thumbnail rendition, inside the QuickLook directory.
pub const THUMBNAIL_FILE: &str = "QuickLook/Thumbnail.png";
/// Static signature subtree at the package root.
pub const SIGNATURE_DIR: &str = "Signature";
/// Extension of an installed package.
pub const PACKAGE_EXT: &str = "brush";
/// Procreate's QuickLook preview dimensions.
pub const THUMBNAIL_SIZE: (u32, u32) = (1060, 324);

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings failed: {0}")]
    Settings(#[from] SettingsError),
    #[error("Rendition failed: {0}")]
    Transform(#[from] BackendError),
    #[error("Packaging failed: {0}")]
    Archive(#[from] ArchiveError),
    #[error("Install failed: {0}")]
    Install(#[from] InstallError),
}

/// A finished package on disk. Never mutated after install; a rebuild
/// with the same id replaces the file wholesale.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Package {
    pub id: String,
    pub file_path: PathBuf,
}

/// Final path of the package for `id` under `package_dir`.
pub fn package_path(package_dir: &Path, id: &str) -> PathBuf {
    package_dir.join(format!("{id}.{PACKAGE_EXT}"))
}

/// Staging name next to the target: the archive is produced as
/// `<target>.zip` and only the rename to `<target>` is atomic.
fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".zip");
    PathBuf::from(name)
}

/// Copy the static signature subtree into the scratch tree.
///
/// The trees are disjoint by construction, so nothing is overwritten.
fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_tree(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Build one package from a discovered request.
///
/// Any failure before the final rename aborts this asset immediately;
/// only the rename is retried. Errors never affect sibling builds — the
/// scratch directory is dropped with the `TempDir` guard either way.
pub fn assemble(
    request: &BuildRequest,
    template: &SettingsTemplate,
    converter: &dyn SettingsConverter,
    backend: &dyn GrainBackend,
    config: &BuildConfig,
) -> Result<Package, AssembleError> {
    fs::create_dir_all(&config.package_dir)?;

    let scratch = TempDir::new()?;
    let root = scratch.path();

    settings::materialize(template, &request.id, &root.join(SETTINGS_FILE), converter)?;

    let grain = root.join(GRAIN_FILE);
    backend.derive_grain(&request.source_path, &grain)?;

    fs::create_dir(root.join("QuickLook"))?;
    backend.derive_thumbnail(&grain, &root.join(THUMBNAIL_FILE), THUMBNAIL_SIZE)?;

    copy_tree(&config.signature_dir, &root.join(SIGNATURE_DIR))?;

    let target = package_path(&config.package_dir, &request.id);
    let staged = staging_path(&target);
    archive::pack_dir(root, &staged)?;
    archive::install(&staged, &target, config.retry)?;

    Ok(Package {
        id: request.id.clone(),
        file_path: target,
    })
}
