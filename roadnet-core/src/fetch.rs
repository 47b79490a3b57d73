// Fetch a road graph from a map provider and lay it out as a network document

use crate::error::{NetworkError, Result};
use crate::label::{LabelScheme, node_label};
use crate::layout::{Canvas, Projection};
use crate::model::{Edge, NetworkDocument, Node};
use crate::store::write_document;
use crate::weight::WeightSampler;
use indicatif::{ProgressBar, ProgressStyle};
use roadnet_provider::{BoundingBox, MapProvider, NetworkType, RawGraph};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How raw coordinates become canvas nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutOptions {
    pub canvas: Canvas,
    pub label_scheme: LabelScheme,
}

/// Options for configuring a fetch operation
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub bbox: BoundingBox,
    pub network_type: NetworkType,
    pub layout: LayoutOptions,
    pub output: PathBuf,
    /// Fixed seed for edge weights; `None` draws from entropy
    pub seed: Option<u64>,
    /// Write the document even when the provider found nothing
    pub allow_empty: bool,
    pub show_progress_bars: bool,
}

/// Summary of a completed fetch
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub document: NetworkDocument,
    pub output: PathBuf,
    pub raw_nodes: usize,
    pub raw_edges: usize,
}

/// Callback for reporting fetch progress
pub type FetchProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Lay out `raw` on the canvas and attach random edge weights.
///
/// Nodes keep provider order, which also fixes their labels. Edges whose
/// endpoints are not both present are dropped without drawing a weight.
pub fn build_document(
    raw: &RawGraph,
    layout: &LayoutOptions,
    weights: &mut WeightSampler,
) -> NetworkDocument {
    let projection = Projection::fit(raw.nodes.iter().map(|n| (n.lon, n.lat)), &layout.canvas);

    let mut known: HashSet<i64> = HashSet::with_capacity(raw.nodes.len());
    let mut nodes = Vec::with_capacity(raw.nodes.len());
    for raw_node in &raw.nodes {
        if !known.insert(raw_node.id) {
            continue;
        }
        let (x, y) = projection.project(raw_node.lon, raw_node.lat);
        nodes.push(Node {
            id: raw_node.id.to_string(),
            x,
            y,
            label: node_label(nodes.len(), layout.label_scheme),
        });
    }

    let edges = raw
        .edges
        .iter()
        .filter(|e| known.contains(&e.from) && known.contains(&e.to))
        .map(|e| Edge {
            from: e.from.to_string(),
            to: e.to.to_string(),
            weight: weights.sample(),
        })
        .collect();

    NetworkDocument::new(nodes, edges)
}

/// Execute a fetch with the given options and write the result to `options.output`
pub async fn execute_fetch<P: MapProvider>(
    provider: &P,
    options: FetchOptions,
    progress_callback: Option<FetchProgressCallback>,
) -> Result<FetchOutcome> {
    let FetchOptions {
        bbox,
        network_type,
        layout,
        output,
        seed,
        allow_empty,
        show_progress_bars,
    } = options;

    layout.canvas.validate()?;
    bbox.validate()?;

    let report = |msg: String| {
        if let Some(ref callback) = progress_callback {
            callback(msg);
        }
    };

    let spinner = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching {} network...", network_type));
        Some(pb)
    } else {
        None
    };

    report(format!("Fetching {} network for {}", network_type, bbox));
    let fetched = provider.fetch_graph(&bbox, network_type).await;
    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }
    let raw = fetched?;

    report(format!(
        "Network has {} nodes and {} edges",
        raw.node_count(),
        raw.edge_count()
    ));

    if raw.is_empty() {
        if !allow_empty {
            return Err(NetworkError::EmptyGraph);
        }
        warn!("Writing an empty network to {}", output.display());
    }

    let mut weights = WeightSampler::new(seed);
    let document = build_document(&raw, &layout, &mut weights);
    info!(
        "Built document with {} nodes and {} edges",
        document.nodes.len(),
        document.edges.len()
    );
    report(format!(
        "Created {} nodes and {} edges",
        document.nodes.len(),
        document.edges.len()
    ));

    write_document(&output, &document)?;
    report(format!("Network data saved to {}", output.display()));

    Ok(FetchOutcome {
        document,
        output,
        raw_nodes: raw.node_count(),
        raw_edges: raw.edge_count(),
    })
}
