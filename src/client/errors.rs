use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("server responded with {status}: {message}")]
    Status {
        status: u16,
        message: String
    },
    #[error("malformed payload: {0}")]
    MalformedPayload(String)
}
