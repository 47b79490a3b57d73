use crate::validate::Violation;
use roadnet_provider::ProviderError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Map provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid network JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Reference nodes not found in network: {}", .0.join(", "))]
    MissingReferences(Vec<String>),

    #[error("None of the reference nodes exist in the network")]
    NoReferenceNodes,

    #[error("Provider returned an empty graph")]
    EmptyGraph,

    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("Network failed validation with {} violation(s)", .0.len())]
    Invalid(Vec<Violation>),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
