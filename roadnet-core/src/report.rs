// Plain-text summaries of fetch and filter runs

use crate::fetch::FetchOutcome;
use crate::filter::FilterOutcome;
use crate::validate::Violation;
use std::path::Path;

pub fn generate_fetch_report(outcome: &FetchOutcome) -> String {
    let mut report = String::new();
    report.push_str("Summary:\n");
    report.push_str(&format!(
        "  Provider graph: {} nodes, {} edges\n",
        outcome.raw_nodes, outcome.raw_edges
    ));
    report.push_str(&format!("  Node count: {}\n", outcome.document.nodes.len()));
    report.push_str(&format!("  Edge count: {}\n", outcome.document.edges.len()));
    report.push_str(&format!("  Saved to: {}\n", outcome.output.display()));
    report
}

pub fn generate_filter_report(outcome: &FilterOutcome, output: &Path) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "Minimum x-coordinate: {}\n",
        outcome.threshold.min_x
    ));
    if !outcome.threshold.missing.is_empty() {
        report.push_str(&format!(
            "Skipped missing reference nodes: {}\n",
            outcome.threshold.missing.join(", ")
        ));
    }
    report.push_str(&format!(
        "Original: {} nodes, {} edges\n",
        outcome.original_nodes, outcome.original_edges
    ));
    report.push_str(&format!(
        "Filtered: {} nodes, {} edges\n",
        outcome.document.nodes.len(),
        outcome.document.edges.len()
    ));
    report.push_str(&format!("Filtered network saved to {}\n", output.display()));
    report
}

pub fn generate_violation_report(violations: &[Violation]) -> String {
    let mut report = String::new();
    report.push_str(&format!("{} violation(s):\n", violations.len()));
    for violation in violations {
        report.push_str(&format!("  - {}\n", violation));
    }
    report
}
