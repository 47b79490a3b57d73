use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider reported an error: {0}")]
    Remote(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Invalid network type: {0}")]
    InvalidNetworkType(String),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
