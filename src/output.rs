//! CLI output formatting for the pipeline stages.
//!
//! Output is information-centric, not file-centric: the primary line for
//! every entity is its identity (brush id, collection name), with
//! filesystem paths as indented `Source:`/`Installed:` context lines.
//! Formatters return line vectors so they are testable without capturing
//! stdout; `main` does the printing.

use crate::collection::Collection;
use crate::coordinator::BuildReport;
use crate::discover::BuildRequest;

/// Scan listing: one entity per discovered brush.
pub fn format_scan(requests: &[BuildRequest]) -> Vec<String> {
    let mut lines = vec![format!("Brushes ({})", requests.len())];
    for request in requests {
        lines.push(format!("{:>5}", request.id));
        lines.push(format!("    Source: {}", request.source_path.display()));
    }
    lines
}

/// Build summary: succeeded packages first, then failures with causes.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Built {} brushes, {} failed",
        report.succeeded.len(),
        report.failed.len()
    )];
    for package in &report.succeeded {
        lines.push(format!("{:>5}", package.id));
        lines.push(format!("    Installed: {}", package.file_path.display()));
    }
    for failure in &report.failed {
        lines.push(format!("{:>5} FAILED", failure.id));
        lines.push(format!("    Cause: {}", failure.error));
    }
    lines
}

/// Collection summary: name, member count, uid per member.
pub fn format_collection(collection: &Collection) -> Vec<String> {
    let mut lines = vec![format!(
        "Brush set \"{}\" ({} brushes)",
        collection.name,
        collection.members.len()
    )];
    lines.push(format!("    Installed: {}", collection.file_path.display()));
    for member in &collection.members {
        lines.push(format!("{:>5} → {}", member.package_id, member.uid));
    }
    lines
}
