//! Brush settings materialization.
//!
//! Every package carries a `Brush.archive` — a binary plist holding the
//! brush parameters. All brushes share the same parameters except the
//! name, so the artifact is produced from a single XML template:
//!
//! 1. substitute the `PLACEHOLDER_NAME` token with the brush id,
//! 2. write the rendered XML into the build task's scratch tree,
//! 3. convert it to binary plist in place via the external converter.
//!
//! The conversion step sits behind the [`SettingsConverter`] trait so the
//! assembler is converter-agnostic. The production implementation shells
//! out to `plutil` (macOS ships it; Windows gets it from Apple Support
//! tooling as `plutil.exe`), resolved once at construction rather than
//! branching inside build logic.

use crate::config::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Token in the settings template replaced by the brush id.
pub const PLACEHOLDER: &str = "PLACEHOLDER_NAME";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Settings converter not found: {0}")]
    ConverterNotFound(PathBuf),
    #[error("Settings conversion of {path} failed with status {status}")]
    ConversionFailed { path: PathBuf, status: String },
}

/// External capability that converts a rendered XML settings document into
/// the binary artifact, in place.
pub trait SettingsConverter: Send + Sync {
    fn convert_to_binary(&self, target: &Path) -> Result<(), SettingsError>;
}

/// Subprocess-backed converter using Apple's `plutil`.
pub struct PlutilConverter {
    program: PathBuf,
}

impl PlutilConverter {
    /// Resolve the platform's executable name once, at startup.
    pub fn resolve() -> Self {
        let program = if cfg!(windows) { "plutil.exe" } else { "plutil" };
        Self {
            program: PathBuf::from(program),
        }
    }

    /// Use an explicit executable path (CLI override, tests).
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SettingsConverter for PlutilConverter {
    fn convert_to_binary(&self, target: &Path) -> Result<(), SettingsError> {
        let status = Command::new(&self.program)
            .args(["-convert", "binary1"])
            .arg(target)
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SettingsError::ConverterNotFound(self.program.clone())
                }
                _ => SettingsError::Io(e),
            })?;

        if !status.success() {
            return Err(SettingsError::ConversionFailed {
                path: target.to_path_buf(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// The shared settings template, loaded once per run.
///
/// Replacing the template file re-parameterizes every brush built from it
/// (shape, dynamics, etc.) without touching this code.
#[derive(Debug, Clone)]
pub struct SettingsTemplate {
    content: String,
}

impl SettingsTemplate {
    /// Load the template. An unreadable template is fatal to the whole
    /// run — no package can be built without it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Template {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { content })
    }

    /// Build a template from in-memory content (tests).
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Substitute the placeholder token with `id`.
    pub fn render(&self, id: &str) -> String {
        self.content.replace(PLACEHOLDER, id)
    }
}

/// Render the template for `id`, write it to `dest`, and convert it to
/// the binary artifact in place. Converter failures are per-asset errors,
/// not fatal to the batch.
pub fn materialize(
    template: &SettingsTemplate,
    id: &str,
    dest: &Path,
    converter: &dyn SettingsConverter,
) -> Result<(), SettingsError> {
    fs::write(dest, template.render(id))?;
    converter.convert_to_binary(dest)
}
