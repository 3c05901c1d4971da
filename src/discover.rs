//! Asset discovery — stage 1 of the brush build pipeline.
//!
//! Scans a flat source directory for raster images whose filename starts
//! with a numeric identifier and turns each into a [`BuildRequest`]. The
//! digit run is the brush id:
//!
//! ```text
//! textures/
//! ├── 7.png          → id "7"
//! ├── 07-slate.jpg   → id "07"   (skipped: duplicates numeric id 7)
//! ├── 12.jpg         → id "12"
//! └── notes.txt      → skipped (no numeric prefix)
//! ```
//!
//! Ordering is by the *numeric value* of the id, not string order, so
//! `9.png` sorts before `10.png`. Files without a digit prefix are not an
//! error — the source directory routinely holds notes and rejects.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// One unit of work for the build coordinator: a source image and the
/// brush id parsed from its filename. Immutable once discovered.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuildRequest {
    /// Digit run from the filename, leading zeros preserved (`"07"`).
    pub id: String,
    /// Absolute or source-relative path to the raster image.
    pub source_path: PathBuf,
}

/// Parse the leading digit run of a filename stem.
///
/// Returns the digit run and its numeric value, or `None` if the stem
/// does not start with a digit:
/// - `"7"` → `("7", 7)`
/// - `"07x"` → `("07", 7)`
/// - `"abc"` → `None`
pub fn parse_id(stem: &str) -> Option<(&str, u64)> {
    let digits: usize = stem.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let run = &stem[..digits];
    // A digit run too long for u64 is not a plausible brush id
    run.parse::<u64>().ok().map(|n| (run, n))
}

/// Numeric sort key for an already-parsed id string.
///
/// Discovered ids always parse; the fallback only matters for ids that
/// arrive from outside the discoverer (e.g. hand-written test data).
pub fn numeric_key(id: &str) -> u64 {
    id.parse::<u64>().unwrap_or(u64::MAX)
}

/// Scan `dir` for brush source images.
///
/// Returns requests deduplicated by numeric id (first qualifying file in
/// lexical order wins) and sorted by numeric id. Reads the directory once;
/// no side effects.
pub fn discover(dir: &Path) -> Result<Vec<BuildRequest>, DiscoverError> {
    if !dir.is_dir() {
        return Err(DiscoverError::SourceNotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    // Lexical order makes dedup ties deterministic across platforms
    paths.sort();

    let mut requests: BTreeMap<u64, BuildRequest> = BTreeMap::new();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((run, value)) = parse_id(stem) else {
            continue;
        };
        requests.entry(value).or_insert_with(|| BuildRequest {
            id: run.to_string(),
            source_path: path.clone(),
        });
    }

    // BTreeMap iteration gives the numeric order for free
    Ok(requests.into_values().collect())
}
