// Structural checks for network documents

use crate::error::{NetworkError, Result};
use crate::layout::Canvas;
use crate::model::NetworkDocument;
use std::collections::HashSet;
use std::fmt;

/// Slack allowed on canvas bounds for two-decimal rounding
pub const BOUNDS_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    DuplicateNode(String),
    DanglingEdge { from: String, to: String },
    NonPositiveWeight { from: String, to: String, weight: f64 },
    OutOfBounds { id: String, x: f64, y: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateNode(id) => write!(f, "duplicate node id {}", id),
            Violation::DanglingEdge { from, to } => {
                write!(f, "edge {} -> {} references a missing node", from, to)
            }
            Violation::NonPositiveWeight { from, to, weight } => {
                write!(f, "edge {} -> {} has non-positive weight {}", from, to, weight)
            }
            Violation::OutOfBounds { id, x, y } => {
                write!(f, "node {} at ({}, {}) lies outside the canvas", id, x, y)
            }
        }
    }
}

/// Collect every invariant violation in `document`.
///
/// Canvas bounds are only checked when a canvas is given, since filtered or
/// hand-edited documents need not share the fetch canvas.
pub fn find_violations(document: &NetworkDocument, canvas: Option<&Canvas>) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(document.nodes.len());

    for node in &document.nodes {
        if !seen.insert(node.id.as_str()) {
            violations.push(Violation::DuplicateNode(node.id.clone()));
        }
        if let Some(canvas) = canvas
            && !canvas.contains(node.x, node.y, BOUNDS_TOLERANCE)
        {
            violations.push(Violation::OutOfBounds {
                id: node.id.clone(),
                x: node.x,
                y: node.y,
            });
        }
    }

    for edge in &document.edges {
        if !seen.contains(edge.from.as_str()) || !seen.contains(edge.to.as_str()) {
            violations.push(Violation::DanglingEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
            });
        }
        if !(edge.weight > 0.0) {
            violations.push(Violation::NonPositiveWeight {
                from: edge.from.clone(),
                to: edge.to.clone(),
                weight: edge.weight,
            });
        }
    }

    violations
}

pub fn validate_document(document: &NetworkDocument, canvas: Option<&Canvas>) -> Result<()> {
    let violations = find_violations(document, canvas);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(NetworkError::Invalid(violations))
    }
}
