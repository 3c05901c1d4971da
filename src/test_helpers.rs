//! Shared test utilities for the brushforge test suite.
//!
//! Builds a disposable project tree (textures, template, signature) and a
//! [`BuildConfig`] pointing at it, so pipeline tests run entirely inside
//! a temp directory with a non-sleeping retry policy.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::BuildConfig;
use crate::retry::RetryPolicy;
use crate::settings::SettingsTemplate;

/// Template content with the placeholder in the spot `Brush.archive`
/// uses for the brush name.
pub const TEMPLATE_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
     <dict><key>name</key><string>PLACEHOLDER_NAME</string></dict>\n";

/// A throwaway project rooted in a temp directory.
pub struct Fixture {
    pub tmp: TempDir,
    pub config: BuildConfig,
    pub template: SettingsTemplate,
}

/// Create a project tree with the given source file names in `textures/`.
///
/// Source files are empty — the mock grain backend never reads them.
pub fn project_with_sources(names: &[&str]) -> Fixture {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    fs::create_dir(root.join("textures")).unwrap();
    for name in names {
        fs::write(root.join("textures").join(name), b"").unwrap();
    }

    fs::create_dir_all(root.join("template/Signature")).unwrap();
    fs::write(root.join("template/Brush.archive"), TEMPLATE_XML).unwrap();
    fs::write(root.join("template/Signature/sig.dat"), b"signature").unwrap();

    let mut config = BuildConfig::for_project(root);
    config.workers = 2;
    config.retry = RetryPolicy::immediate(10);

    let template = SettingsTemplate::load(&config.template_path).unwrap();

    Fixture {
        tmp,
        config,
        template,
    }
}

/// List the entry names of a zip archive, sorted.
pub fn zip_entry_names(archive: &Path) -> Vec<String> {
    let file = fs::File::open(archive).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let mut names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}
