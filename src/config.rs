//! Build configuration.
//!
//! Everything the pipeline needs — paths, worker count, retry policy —
//! lives in one explicit [`BuildConfig`] passed into the coordinator and
//! assemblers. No globals, no implicit working-directory lookups, which
//! is what makes the whole pipeline runnable against temp directories in
//! tests.
//!
//! ## Project layout
//!
//! Defaults are rooted at a project directory:
//!
//! ```text
//! project/
//! ├── textures/              # Source images (NN.png, NN-name.jpg, ...)
//! ├── template/
//! │   ├── Brush.archive      # XML settings template (PLACEHOLDER_NAME)
//! │   └── Signature/         # Static subtree copied into every package
//! ├── brushes/               # Built <id>.brush packages
//! └── brushsets/             # Built <name>.brushset collections
//! ```

use crate::retry::RetryPolicy;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default number of concurrent package builds. The work is I/O- and
/// subprocess-bound, so this is deliberately modest.
pub const DEFAULT_WORKERS: usize = 4;

/// Fatal preconditions: nothing can be built when these fail.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read settings template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Signature directory not found: {0}")]
    SignatureMissing(PathBuf),
    #[error("Could not build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Explicit configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory scanned for numbered source images.
    pub source_dir: PathBuf,
    /// Where finished `<id>.brush` packages are installed.
    pub package_dir: PathBuf,
    /// Where finished `<name>.brushset` collections are installed.
    pub collection_dir: PathBuf,
    /// XML settings template with the `PLACEHOLDER_NAME` token.
    pub template_path: PathBuf,
    /// Static subtree copied into every package as `Signature/`.
    pub signature_dir: PathBuf,
    /// Concurrent package builds. Clamped to at least 1.
    pub workers: usize,
    /// Install retry policy, shared by package and collection installs.
    pub retry: RetryPolicy,
}

impl BuildConfig {
    /// Defaults for the standard project layout rooted at `root`.
    pub fn for_project(root: &Path) -> Self {
        Self {
            source_dir: root.join("textures"),
            package_dir: root.join("brushes"),
            collection_dir: root.join("brushsets"),
            template_path: root.join("template/Brush.archive"),
            signature_dir: root.join("template/Signature"),
            workers: DEFAULT_WORKERS,
            retry: RetryPolicy::default(),
        }
    }

    /// Worker count with the zero-misconfiguration clamped away.
    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }

    /// Check the fatal preconditions that do not involve reading files.
    /// The template is validated separately by loading it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.signature_dir.is_dir() {
            return Err(ConfigError::SignatureMissing(self.signature_dir.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn project_defaults_use_standard_layout() {
        let config = BuildConfig::for_project(Path::new("/proj"));
        assert_eq!(config.source_dir, Path::new("/proj/textures"));
        assert_eq!(config.package_dir, Path::new("/proj/brushes"));
        assert_eq!(config.collection_dir, Path::new("/proj/brushsets"));
        assert_eq!(config.template_path, Path::new("/proj/template/Brush.archive"));
        assert_eq!(config.signature_dir, Path::new("/proj/template/Signature"));
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn effective_workers_clamps_zero_to_one() {
        let mut config = BuildConfig::for_project(Path::new("/proj"));
        config.workers = 0;
        assert_eq!(config.effective_workers(), 1);
    }

    #[test]
    fn validate_requires_signature_directory() {
        let tmp = TempDir::new().unwrap();
        let mut config = BuildConfig::for_project(tmp.path());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SignatureMissing(_))
        ));

        std::fs::create_dir_all(tmp.path().join("template/Signature")).unwrap();
        config = BuildConfig::for_project(tmp.path());
        assert!(config.validate().is_ok());
    }
}
