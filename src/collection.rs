//! Collection assembly — bundles built packages into a `.brushset`.
//!
//! A brush set is a zip archive whose root holds one directory per member
//! brush, named by a freshly minted UUID, plus a `brushset.plist`
//! manifest:
//!
//! ```text
//! MySet.brushset
//! ├── brushset.plist                            # brushes: [uid...], name
//! ├── 1B47313A-17EA-45B8-830C-C910FF1E1601/     # extracted package contents
//! │   ├── Brush.archive
//! │   ├── Grain.png
//! │   └── ...
//! └── 9D02E5C4-.../
//! ```
//!
//! UUIDs are minted fresh on every build — member identity is per
//! collection build, by design, so rebuilding the same packages yields a
//! manifest with entirely new uids. The manifest's `brushes` array and
//! the set of member directories are always exactly the same uids, in
//! input package order.
//!
//! Unlike package builds, there is no partial success: a missing or
//! unextractable member aborts the whole collection, since a set with
//! holes is meaningless.

use crate::archive::{self, ArchiveError, InstallError};
use crate::package::Package;
use crate::retry::RetryPolicy;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use uuid::Uuid;

/// Manifest filename at the collection root.
pub const MANIFEST_FILE: &str = "brushset.plist";
/// Extension of an installed collection.
pub const COLLECTION_EXT: &str = "brushset";

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Member package {id} has no archive at {path}")]
    MissingMember { id: String, path: PathBuf },
    #[error("Could not extract member package {id}: {source}")]
    Extract { id: String, source: ArchiveError },
    #[error("Manifest error: {0}")]
    Manifest(#[from] plist::Error),
    #[error("Packaging failed: {0}")]
    Archive(#[from] ArchiveError),
    #[error("Install failed: {0}")]
    Install(#[from] InstallError),
}

/// One member of a built collection: the source package id and the uid
/// its contents live under inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMember {
    pub package_id: String,
    pub uid: String,
}

/// A finished collection on disk.
#[derive(Debug)]
pub struct Collection {
    pub name: String,
    pub file_path: PathBuf,
    pub members: Vec<CollectionMember>,
}

/// Mint a member uid. Procreate manifests use uppercase UUIDs.
fn mint_uid() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

/// Write the manifest plist: `brushes` → array of uids (member order),
/// `name` → collection name. The plist codec emits the XML declaration
/// and Apple plist DOCTYPE header.
fn write_manifest(path: &Path, uids: &[String], name: &str) -> Result<(), plist::Error> {
    let mut dict = plist::Dictionary::new();
    dict.insert(
        "brushes".to_string(),
        plist::Value::Array(
            uids.iter()
                .map(|uid| plist::Value::String(uid.clone()))
                .collect(),
        ),
    );
    dict.insert("name".to_string(), plist::Value::String(name.to_string()));
    plist::Value::Dictionary(dict).to_file_xml(path)
}

/// Bundle `packages` into `<collection_dir>/<name>.brushset`.
///
/// Extracts every member into a uid-named subtree of a fresh scratch
/// directory, writes the manifest, then archives and installs with the
/// same remove-then-rename protocol as package installs.
pub fn assemble_collection(
    packages: &[Package],
    name: &str,
    collection_dir: &Path,
    retry: RetryPolicy,
) -> Result<Collection, CollectionError> {
    fs::create_dir_all(collection_dir)?;

    let scratch = TempDir::new()?;
    let root = scratch.path();

    let mut members = Vec::with_capacity(packages.len());
    for package in packages {
        if !package.file_path.is_file() {
            return Err(CollectionError::MissingMember {
                id: package.id.clone(),
                path: package.file_path.clone(),
            });
        }
        let uid = mint_uid();
        let member_dir = root.join(&uid);
        fs::create_dir(&member_dir)?;
        archive::extract(&package.file_path, &member_dir).map_err(|source| {
            CollectionError::Extract {
                id: package.id.clone(),
                source,
            }
        })?;
        members.push(CollectionMember {
            package_id: package.id.clone(),
            uid,
        });
    }

    let uids: Vec<String> = members.iter().map(|m| m.uid.clone()).collect();
    write_manifest(&root.join(MANIFEST_FILE), &uids, name)?;

    let target = collection_dir.join(format!("{name}.{COLLECTION_EXT}"));
    let staged = {
        let mut s = target.as_os_str().to_os_string();
        s.push(".zip");
        PathBuf::from(s)
    };
    archive::pack_dir(root, &staged)?;
    archive::install(&staged, &target, retry)?;

    Ok(Collection {
        name: name.to_string(),
        file_path: target,
        members,
    })
}
