//! Archive packaging and the atomic install protocol.
//!
//! Both `.brush` packages and `.brushset` collections are plain zip
//! archives. Packaging always zips the *contents* of a staged scratch
//! tree (the archive root holds `Brush.archive`, not a wrapper
//! directory), and installation is a remove-then-rename:
//!
//! 1. the archive is produced under a staging name next to the target,
//! 2. any previous file at the target path is removed,
//! 3. the staged archive is renamed into place.
//!
//! Only the rename is atomic, and only the rename is retried — an
//! indexer or antivirus scanner can hold the fresh archive open for a
//! moment. Staging and archiving errors fail immediately without
//! consuming a retry.
//!
//! Concurrent rebuilds of the *same* target are not a supported
//! scenario; last writer wins.

use crate::retry::{RetryPolicy, retry};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not install {target} after {attempts} attempts: {source}")]
    RetryExhausted {
        target: PathBuf,
        attempts: u32,
        source: io::Error,
    },
}

/// Zip the contents of `src_dir` into `archive_path`.
///
/// Entry names are relative to `src_dir` with forward slashes, so the
/// extracted tree matches the staged tree exactly. Empty directories are
/// preserved as directory entries.
pub fn pack_dir(src_dir: &Path, archive_path: &Path) -> Result<(), ArchiveError> {
    let file = File::create(archive_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src_dir)
            .expect("walkdir yields paths under its root");
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut reader = File::open(entry.path())?;
            io::copy(&mut reader, &mut writer)?;
        }
    }

    writer.finish()?;
    Ok(())
}

/// Extract the full contents of `archive_path` into `dest`.
pub fn extract(archive_path: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(dest)?;
    Ok(())
}

/// Atomically install `staged` at `target`: remove any existing file at
/// `target`, then rename `staged` into place under the retry policy.
///
/// A reader of `target` sees either the previous complete archive or the
/// new complete one, never a partial write.
pub fn install(staged: &Path, target: &Path, policy: RetryPolicy) -> Result<(), InstallError> {
    if target.exists() {
        fs::remove_file(target)?;
    }
    retry(policy, || fs::rename(staged, target)).map_err(|source| InstallError::RetryExhausted {
        target: target.to_path_buf(),
        attempts: policy.attempts,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stage_tree(root: &Path) {
        fs::write(root.join("Brush.archive"), b"settings").unwrap();
        fs::write(root.join("Grain.png"), b"grain").unwrap();
        fs::create_dir(root.join("QuickLook")).unwrap();
        fs::write(root.join("QuickLook/Thumbnail.png"), b"thumb").unwrap();
        fs::create_dir(root.join("Signature")).unwrap();
        fs::write(root.join("Signature/sig.dat"), b"sig").unwrap();
    }

    #[test]
    fn pack_then_extract_round_trips_tree_contents() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join("staged");
        fs::create_dir(&staged).unwrap();
        stage_tree(&staged);

        let archive = tmp.path().join("out.brush.zip");
        pack_dir(&staged, &archive).unwrap();

        let unpacked = tmp.path().join("unpacked");
        extract(&archive, &unpacked).unwrap();

        // Archive root holds the contents, not a wrapper directory
        assert_eq!(fs::read(unpacked.join("Brush.archive")).unwrap(), b"settings");
        assert_eq!(fs::read(unpacked.join("Grain.png")).unwrap(), b"grain");
        assert_eq!(
            fs::read(unpacked.join("QuickLook/Thumbnail.png")).unwrap(),
            b"thumb"
        );
        assert_eq!(fs::read(unpacked.join("Signature/sig.dat")).unwrap(), b"sig");
    }

    #[test]
    fn pack_preserves_empty_directories() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join("staged");
        fs::create_dir_all(staged.join("QuickLook")).unwrap();

        let archive = tmp.path().join("out.zip");
        pack_dir(&staged, &archive).unwrap();

        let unpacked = tmp.path().join("unpacked");
        extract(&archive, &unpacked).unwrap();
        assert!(unpacked.join("QuickLook").is_dir());
    }

    #[test]
    fn extract_missing_archive_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = extract(&tmp.path().join("nope.zip"), tmp.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }

    #[test]
    fn install_moves_staged_file_into_place() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join("7.brush.zip");
        let target = tmp.path().join("7.brush");
        fs::write(&staged, b"archive").unwrap();

        install(&staged, &target, RetryPolicy::immediate(10)).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"archive");
        assert!(!staged.exists());
    }

    #[test]
    fn install_replaces_existing_target() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join("7.brush.zip");
        let target = tmp.path().join("7.brush");
        fs::write(&target, b"old").unwrap();
        fs::write(&staged, b"new").unwrap();

        install(&staged, &target, RetryPolicy::immediate(10)).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert!(!staged.exists());
    }

    #[test]
    fn install_exhausts_retries_when_rename_cannot_succeed() {
        let tmp = TempDir::new().unwrap();
        let staged = tmp.path().join("missing.zip");
        let target = tmp.path().join("7.brush");

        let err = install(&staged, &target, RetryPolicy::immediate(3)).unwrap_err();
        assert!(matches!(
            err,
            InstallError::RetryExhausted { attempts: 3, .. }
        ));
    }
}
