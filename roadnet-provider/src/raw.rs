use serde::{Deserialize, Serialize};

/// A provider node in geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: i64,
    pub lon: f64,
    pub lat: f64,
}

/// A directed provider edge between two node ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
    pub from: i64,
    pub to: i64,
}

/// Graph as returned by a map provider, in provider iteration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

impl RawGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: i64, lon: f64, lat: f64) {
        self.nodes.push(RawNode { id, lon, lat });
    }

    pub fn add_edge(&mut self, from: i64, to: i64) {
        self.edges.push(RawEdge { from, to });
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
