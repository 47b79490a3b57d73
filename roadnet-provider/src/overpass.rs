use crate::bbox::BoundingBox;
use crate::error::{ProviderError, Result};
use crate::network_type::NetworkType;
use crate::raw::RawGraph;
use crate::MapProvider;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// How raw ways become the returned graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Collapse chains of interior way nodes into single edges
    pub simplify: bool,
    /// Keep every connected component instead of only the largest
    pub retain_all: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            simplify: true,
            retain_all: false,
        }
    }
}

/// Map provider backed by an Overpass API interpreter endpoint
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
    timeout_secs: u64,
    assemble: AssembleOptions,
}

impl OverpassClient {
    pub fn new() -> Result<Self> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|e| ProviderError::ParseError(format!("Invalid default endpoint: {}", e)))?;

        let client = Client::builder()
            .user_agent(concat!(
                "roadnet/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/trapdoorsec/roadnet)"
            ))
            .connect_timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            assemble: AssembleOptions::default(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.assemble.simplify = simplify;
        self
    }

    pub fn with_retain_all(mut self, retain_all: bool) -> Self {
        self.assemble.retain_all = retain_all;
        self
    }

    /// Overpass QL selecting the filtered ways inside `bbox` plus their nodes
    pub fn build_query(&self, bbox: &BoundingBox, network_type: NetworkType) -> String {
        format!(
            "[out:json][timeout:{}];way{}{};(._;>;);out;",
            self.timeout_secs,
            network_type.overpass_filter(),
            bbox.to_overpass()
        )
    }

    async fn fetch_elements(
        &self,
        bbox: &BoundingBox,
        network_type: NetworkType,
    ) -> Result<Vec<Element>> {
        let query = self.build_query(bbox, network_type);
        info!("Querying {} for {} network in {}", self.endpoint, network_type, bbox);
        debug!("Overpass query: {}", query);

        let start = Instant::now();
        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
            .form(&[("data", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Overpass responded {} in {:?}", status, start.elapsed());

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: OverpassResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(format!("Malformed Overpass response: {}", e)))?;

        if let Some(remark) = parsed.remark {
            if remark.contains("error") {
                return Err(ProviderError::Remote(remark));
            }
            warn!("Overpass remark: {}", remark);
        }

        Ok(parsed.elements)
    }
}

impl MapProvider for OverpassClient {
    async fn fetch_graph(&self, bbox: &BoundingBox, network_type: NetworkType) -> Result<RawGraph> {
        bbox.validate()?;
        let elements = self.fetch_elements(bbox, network_type).await?;
        let graph = assemble_graph(&elements, bbox, network_type, self.assemble);

        if graph.is_empty() {
            warn!("Overpass returned no {} ways inside {}", network_type, bbox);
        } else {
            info!(
                "Assembled graph with {} nodes and {} edges",
                graph.node_count(),
                graph.edge_count()
            );
        }

        Ok(graph)
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
    #[serde(default)]
    remark: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        #[allow(dead_code)]
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
    Both,
}

struct Way {
    refs: Vec<i64>,
    direction: Direction,
}

/// Turn Overpass elements into a directed node-link graph.
///
/// Overpass returns every node of a way that touches `bbox`, so ways are cut
/// at nodes outside it (or without a coordinate) and each piece stands alone.
/// Nodes keep the order in which the response lists them. With `simplify`,
/// only way ends, nodes shared between ways, and nodes repeated inside one
/// way survive; each chain of interior nodes collapses into a single edge.
/// Unless `retain_all` is set, only the largest weakly connected component
/// is returned.
pub(crate) fn assemble_graph(
    elements: &[Element],
    bbox: &BoundingBox,
    network_type: NetworkType,
    options: AssembleOptions,
) -> RawGraph {
    let mut positions: HashMap<i64, (f64, f64)> = HashMap::new();
    let mut node_order: Vec<i64> = Vec::new();
    let mut raw_ways: Vec<Way> = Vec::new();

    for element in elements {
        match element {
            Element::Node { id, lat, lon } => {
                if positions.insert(*id, (*lon, *lat)).is_none() {
                    node_order.push(*id);
                }
            }
            Element::Way { nodes, tags, .. } => {
                raw_ways.push(Way {
                    refs: nodes.clone(),
                    direction: way_direction(tags, network_type),
                });
            }
            Element::Other => {}
        }
    }

    let inside = |id: &i64| {
        positions
            .get(id)
            .is_some_and(|&(lon, lat)| bbox.contains(lat, lon))
    };

    let mut ways: Vec<Way> = Vec::with_capacity(raw_ways.len());
    for way in &raw_ways {
        for piece in way.refs.split(|r| !inside(r)) {
            if piece.len() >= 2 {
                ways.push(Way {
                    refs: piece.to_vec(),
                    direction: way.direction,
                });
            }
        }
    }

    let kept: HashSet<i64> = if options.simplify {
        endpoint_nodes(&ways)
    } else {
        ways.iter().flat_map(|w| w.refs.iter().copied()).collect()
    };

    let mut graph = RawGraph::new();
    for id in node_order.iter().filter(|id| kept.contains(*id)) {
        let (lon, lat) = positions[id];
        graph.add_node(*id, lon, lat);
    }

    for way in &ways {
        let mut segment_start = way.refs[0];
        for &node in &way.refs[1..] {
            if !kept.contains(&node) {
                continue;
            }
            match way.direction {
                Direction::Forward => graph.add_edge(segment_start, node),
                Direction::Reverse => graph.add_edge(node, segment_start),
                Direction::Both => {
                    graph.add_edge(segment_start, node);
                    graph.add_edge(node, segment_start);
                }
            }
            segment_start = node;
        }
    }

    if options.retain_all {
        graph
    } else {
        retain_largest_component(graph)
    }
}

/// Keep the largest weakly connected component; ties go to the one whose
/// first node comes earliest.
fn retain_largest_component(graph: RawGraph) -> RawGraph {
    let index: HashMap<i64, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id, i))
        .collect();

    // Union by lower index, so every root is the first node of its component
    let mut parent: Vec<usize> = (0..graph.nodes.len()).collect();
    for edge in &graph.edges {
        if let (Some(&a), Some(&b)) = (index.get(&edge.from), index.get(&edge.to)) {
            let (root_a, root_b) = (find_root(&mut parent, a), find_root(&mut parent, b));
            if root_a != root_b {
                parent[root_a.max(root_b)] = root_a.min(root_b);
            }
        }
    }

    let roots: Vec<usize> = (0..parent.len())
        .map(|i| find_root(&mut parent, i))
        .collect();
    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for &root in &roots {
        *sizes.entry(root).or_insert(0) += 1;
    }

    let Some((largest, size)) = sizes
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
    else {
        return graph;
    };

    let dropped = graph.nodes.len() - size;
    if dropped > 0 {
        debug!(
            "Dropped {} nodes outside the largest connected component",
            dropped
        );
    }

    let keep: HashSet<i64> = graph
        .nodes
        .iter()
        .zip(&roots)
        .filter(|(_, root)| **root == largest)
        .map(|(n, _)| n.id)
        .collect();

    RawGraph {
        nodes: graph
            .nodes
            .into_iter()
            .filter(|n| keep.contains(&n.id))
            .collect(),
        edges: graph
            .edges
            .into_iter()
            .filter(|e| keep.contains(&e.from))
            .collect(),
    }
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn endpoint_nodes(ways: &[Way]) -> HashSet<i64> {
    let mut way_counts: HashMap<i64, usize> = HashMap::new();
    let mut endpoints: HashSet<i64> = HashSet::new();

    for way in ways {
        let mut seen_in_way: HashSet<i64> = HashSet::new();
        for &node in &way.refs {
            if !seen_in_way.insert(node) {
                // Loops back on itself
                endpoints.insert(node);
            }
        }
        for node in seen_in_way {
            *way_counts.entry(node).or_insert(0) += 1;
        }
        if let (Some(first), Some(last)) = (way.refs.first(), way.refs.last()) {
            endpoints.insert(*first);
            endpoints.insert(*last);
        }
    }

    endpoints.extend(
        way_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(node, _)| node),
    );
    endpoints
}

fn way_direction(tags: &HashMap<String, String>, network_type: NetworkType) -> Direction {
    if !network_type.honours_oneway() {
        return Direction::Both;
    }

    match tags.get("oneway").map(|v| v.as_str()) {
        Some("yes" | "true" | "1") => return Direction::Forward,
        Some("-1" | "reverse") => return Direction::Reverse,
        Some("no" | "false" | "0") => return Direction::Both,
        _ => {}
    }

    let implicit = matches!(
        tags.get("highway").map(|v| v.as_str()),
        Some("motorway" | "motorway_link")
    ) || tags.get("junction").map(|v| v.as_str()) == Some("roundabout");

    if implicit {
        Direction::Forward
    } else {
        Direction::Both
    }
}
