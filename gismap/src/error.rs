//! Error types used by the crate.

use thiserror::Error;

/// Gismap error type.
#[derive(Debug, Error)]
pub enum GismapError {
    /// Network request could not be completed.
    #[error("request failed: {0}")]
    Http(String),
    /// Server answered with a non-success status code.
    #[error("HTTP error, status: {0}")]
    HttpStatus(u16),
    /// Error decoding a JSON document.
    #[error("failed to decode data: {0}")]
    Decoding(#[from] serde_json::Error),
    /// Selection storage is not available or rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),
    /// Error reading/writing data to the FS.
    #[error("failed to access file: {0}")]
    FsIo(#[from] std::io::Error),
    /// The map library refused to add or remove a layer.
    #[error("map error: {0}")]
    Map(String),
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Error interacting with WASM runtime.
    #[error("wasm error: {0:?}")]
    Wasm(Option<String>),
}

impl From<reqwest::Error> for GismapError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::HttpStatus(status.as_u16()),
            None => Self::Http(value.to_string()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for GismapError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        GismapError::Wasm(Some(format!("{value:?}")))
    }
}
