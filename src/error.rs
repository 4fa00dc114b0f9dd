use std::path::PathBuf;

use thiserror::Error;

/// Failures at the load boundary. Everything past decoding degrades to empty
/// values instead of failing.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(Box<reqwest::Error>),

    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object of tables, found {0}")]
    NotAnObject(&'static str),

    #[error("bundled export {0} is missing or not UTF-8")]
    MissingAsset(&'static str),
}

impl From<reqwest::Error> for LoadError {
    fn from(error: reqwest::Error) -> Self {
        LoadError::Http(Box::new(error))
    }
}
