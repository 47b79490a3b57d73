// Reading and writing network documents

use crate::error::{NetworkError, Result};
use crate::model::NetworkDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_NETWORK_PATH: &str = "scripts/network_data.json";

pub fn read_document(path: &Path) -> Result<NetworkDocument> {
    let content = fs::read_to_string(path).map_err(|source| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document: NetworkDocument =
        serde_json::from_str(&content).map_err(|source| NetworkError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "Read {} nodes and {} edges from {}",
        document.nodes.len(),
        document.edges.len(),
        path.display()
    );
    Ok(document)
}

/// Two-space indented JSON, as written to disk
pub fn to_json(document: &NetworkDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}

/// Replace `path` with `document`.
///
/// The JSON goes to a sibling temporary file first and is renamed into
/// place, so a failed write leaves any previous document intact.
pub fn write_document(path: &Path, document: &NetworkDocument) -> Result<()> {
    let json = to_json(document).map_err(|source| NetworkError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let io_err = |source: std::io::Error| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, json).map_err(io_err)?;
    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(source));
    }

    info!(
        "Wrote {} nodes and {} edges to {}",
        document.nodes.len(),
        document.edges.len(),
        path.display()
    );
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "network".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}
