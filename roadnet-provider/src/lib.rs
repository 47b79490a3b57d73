pub mod bbox;
pub mod error;
pub mod network_type;
pub mod overpass;
pub mod raw;

pub use bbox::BoundingBox;
pub use error::ProviderError;
pub use network_type::NetworkType;
pub use overpass::OverpassClient;
pub use raw::{RawEdge, RawGraph, RawNode};

use std::future::Future;

/// Source of raw road graphs for a geographic region
pub trait MapProvider {
    fn fetch_graph(
        &self,
        bbox: &BoundingBox,
        network_type: NetworkType,
    ) -> impl Future<Output = error::Result<RawGraph>> + Send;
}
