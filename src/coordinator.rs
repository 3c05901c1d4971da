//! Build coordination — runs every package assembly under a bounded
//! worker pool.
//!
//! Each request is independent: its own scratch directory, its own target
//! file, no shared mutable state. The pool maps requests to per-task
//! `Result` values and merges them only after rayon's `collect` joins all
//! workers, so no accumulator is ever touched from two threads.
//!
//! One bad asset is a line item in the report, never a reason to cancel
//! its siblings. The succeeded set comes back in the discoverer's numeric
//! order, ready for collection assembly.

use crate::config::{BuildConfig, ConfigError};
use crate::discover::{self, BuildRequest};
use crate::imaging::GrainBackend;
use crate::package::{self, AssembleError, Package};
use crate::settings::{SettingsConverter, SettingsTemplate};
use rayon::prelude::*;

/// One asset that failed, with its cause. The batch carries on without it.
#[derive(Debug)]
pub struct BuildFailure {
    pub id: String,
    pub error: AssembleError,
}

/// Outcome of a batch build: every input request is accounted for in
/// exactly one of the two lists.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Installed packages, sorted by numeric id.
    pub succeeded: Vec<Package>,
    /// Failed assets with their causes, in completion order.
    pub failed: Vec<BuildFailure>,
}

impl BuildReport {
    pub fn succeeded_ids(&self) -> Vec<&str> {
        self.succeeded.iter().map(|p| p.id.as_str()).collect()
    }
}

/// Build every request under a pool of `config.effective_workers()`
/// threads.
///
/// Fatal errors (missing signature tree, pool construction) abort the
/// whole run before any worker starts; per-asset errors are collected
/// into the report. Returns after all submitted tasks finish.
pub fn build_all(
    requests: &[BuildRequest],
    template: &SettingsTemplate,
    converter: &dyn SettingsConverter,
    backend: &dyn GrainBackend,
    config: &BuildConfig,
) -> Result<BuildReport, ConfigError> {
    config.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.effective_workers())
        .build()?;

    // collect() is the join: results only exist per-task until every
    // worker has finished.
    let results: Vec<Result<Package, BuildFailure>> = pool.install(|| {
        requests
            .par_iter()
            .map(|request| {
                package::assemble(request, template, converter, backend, config).map_err(|error| {
                    BuildFailure {
                        id: request.id.clone(),
                        error,
                    }
                })
            })
            .collect()
    });

    let mut report = BuildReport::default();
    for result in results {
        match result {
            Ok(package) => report.succeeded.push(package),
            Err(failure) => report.failed.push(failure),
        }
    }
    report
        .succeeded
        .sort_by_key(|p| discover::numeric_key(&p.id));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::discover;
    use crate::imaging::backend::tests::MockBackend;
    use crate::settings::tests::MockConverter;
    use crate::test_helpers::project_with_sources;
    use std::collections::BTreeSet;

    #[test]
    fn builds_every_asset_in_numeric_order() {
        let fx = project_with_sources(&["1.png", "2.png", "9.png", "10.png"]);
        let requests = discover(&fx.config.source_dir).unwrap();
        let converter = MockConverter::new();
        let backend = MockBackend::new();

        let report =
            build_all(&requests, &fx.template, &converter, &backend, &fx.config).unwrap();

        assert_eq!(report.succeeded_ids(), vec!["1", "2", "9", "10"]);
        assert!(report.failed.is_empty());
        for package in &report.succeeded {
            assert!(package.file_path.exists());
        }
    }

    #[test]
    fn one_failing_asset_does_not_block_siblings() {
        let fx = project_with_sources(&["1.png", "2.png", "3.png"]);
        let requests = discover(&fx.config.source_dir).unwrap();
        let converter = MockConverter::new();
        let backend = MockBackend::failing_for(&["2.png"]);

        let report =
            build_all(&requests, &fx.template, &converter, &backend, &fx.config).unwrap();

        assert_eq!(report.succeeded_ids(), vec!["1", "3"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, "2");
        assert!(matches!(report.failed[0].error, AssembleError::Transform(_)));
        assert!(!fx.config.package_dir.join("2.brush").exists());
        assert!(fx.config.package_dir.join("1.brush").exists());
        assert!(fx.config.package_dir.join("3.brush").exists());
    }

    #[test]
    fn report_partitions_input_exactly() {
        let fx = project_with_sources(&["1.png", "2.png", "3.png", "4.png"]);
        let requests = discover(&fx.config.source_dir).unwrap();
        let converter = MockConverter::new();
        let backend = MockBackend::failing_for(&["1.png", "4.png"]);

        let report =
            build_all(&requests, &fx.template, &converter, &backend, &fx.config).unwrap();

        let input: BTreeSet<&str> = requests.iter().map(|r| r.id.as_str()).collect();
        let mut covered: BTreeSet<&str> = report.succeeded_ids().into_iter().collect();
        for failure in &report.failed {
            // No id reported twice
            assert!(covered.insert(failure.id.as_str()));
        }
        assert_eq!(covered, input);
    }

    #[test]
    fn missing_signature_tree_is_fatal() {
        let fx = project_with_sources(&["1.png"]);
        std::fs::remove_dir_all(&fx.config.signature_dir).unwrap();
        let requests = discover(&fx.config.source_dir).unwrap();
        let converter = MockConverter::new();
        let backend = MockBackend::new();

        let err = build_all(&requests, &fx.template, &converter, &backend, &fx.config)
            .unwrap_err();
        assert!(matches!(err, ConfigError::SignatureMissing(_)));
    }

    #[test]
    fn single_worker_pool_still_completes_batch() {
        let fx = project_with_sources(&["1.png", "2.png"]);
        let mut config = fx.config.clone();
        config.workers = 1;
        let requests = discover(&config.source_dir).unwrap();
        let converter = MockConverter::new();
        let backend = MockBackend::new();

        let report = build_all(&requests, &fx.template, &converter, &backend, &config).unwrap();
        assert_eq!(report.succeeded_ids(), vec!["1", "2"]);
    }

    #[test]
    fn empty_request_list_yields_empty_report() {
        let fx = project_with_sources(&[]);
        let converter = MockConverter::new();
        let backend = MockBackend::new();

        let report = build_all(&[], &fx.template, &converter, &backend, &fx.config).unwrap();
        assert!(report.succeeded.is_empty());
        assert!(report.failed.is_empty());
    }
}
