// Threshold filtering of network documents by reference nodes

use crate::error::{NetworkError, Result};
use crate::model::{Edge, NetworkDocument, Node};
use crate::store::{read_document, write_document};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Reference nodes along the western edge of the Athens demo network
pub const DEFAULT_REFERENCE_IDS: [&str; 10] = [
    "3339821648",
    "250691723",
    "250691724",
    "250698924",
    "250698925",
    "250698926",
    "250699982",
    "250699983",
    "250702474",
    "250700248",
];

/// What to do when a reference id is not in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingReferencePolicy {
    /// Abort without writing anything
    #[default]
    Error,
    /// Leave the id out of the threshold and carry on
    Skip,
}

#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub reference_ids: Vec<String>,
    pub missing: MissingReferencePolicy,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_IDS.iter().map(|id| id.to_string()).collect())
    }
}

impl FilterOptions {
    pub fn new(reference_ids: Vec<String>) -> Self {
        Self {
            reference_ids,
            missing: MissingReferencePolicy::Error,
        }
    }

    pub fn with_missing_policy(mut self, missing: MissingReferencePolicy) -> Self {
        self.missing = missing;
        self
    }
}

/// Minimum x over the reference nodes that were found
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub min_x: f64,
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub document: NetworkDocument,
    pub threshold: Threshold,
    pub original_nodes: usize,
    pub original_edges: usize,
}

impl FilterOutcome {
    pub fn removed_nodes(&self) -> usize {
        self.original_nodes - self.document.nodes.len()
    }

    pub fn removed_edges(&self) -> usize {
        self.original_edges - self.document.edges.len()
    }
}

pub fn reference_threshold(document: &NetworkDocument, options: &FilterOptions) -> Result<Threshold> {
    let index = document.node_index();
    let mut found = Vec::new();
    let mut missing = Vec::new();
    let mut min_x: Option<f64> = None;

    for id in &options.reference_ids {
        match index.get(id.as_str()) {
            Some(node) => {
                min_x = Some(min_x.map_or(node.x, |m| m.min(node.x)));
                found.push(id.clone());
            }
            None => missing.push(id.clone()),
        }
    }

    if !missing.is_empty() {
        match options.missing {
            MissingReferencePolicy::Error => {
                return Err(NetworkError::MissingReferences(missing));
            }
            MissingReferencePolicy::Skip => {
                for id in &missing {
                    warn!("Reference node {} not found, excluded from threshold", id);
                }
            }
        }
    }

    let min_x = min_x.ok_or(NetworkError::NoReferenceNodes)?;
    debug!("Threshold x = {} from {} reference nodes", min_x, found.len());

    Ok(Threshold {
        min_x,
        found,
        missing,
    })
}

/// Keep nodes with `x >= min_x` and the edges between them, preserving order
pub fn filter_document(document: &NetworkDocument, options: &FilterOptions) -> Result<FilterOutcome> {
    let threshold = reference_threshold(document, options)?;

    let nodes: Vec<Node> = document
        .nodes
        .iter()
        .filter(|n| n.x >= threshold.min_x)
        .cloned()
        .collect();

    let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges: Vec<Edge> = document
        .edges
        .iter()
        .filter(|e| kept.contains(e.from.as_str()) && kept.contains(e.to.as_str()))
        .cloned()
        .collect();

    Ok(FilterOutcome {
        document: NetworkDocument::new(nodes, edges),
        threshold,
        original_nodes: document.nodes.len(),
        original_edges: document.edges.len(),
    })
}

/// Filter the document at `input` and write the result to `output`.
///
/// `output` may equal `input`; nothing is written unless filtering succeeds.
pub fn execute_filter(input: &Path, output: &Path, options: &FilterOptions) -> Result<FilterOutcome> {
    let document = read_document(input)?;
    let outcome = filter_document(&document, options)?;
    write_document(output, &outcome.document)?;
    Ok(outcome)
}
