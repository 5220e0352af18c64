//! Error types for the particle field.
//!
//! Rendering itself never fails: once a renderer is mounted every frame runs
//! to completion. Errors only come from mounting preconditions, configuration
//! loading, and image export.

use thiserror::Error;

/// Errors that can occur while mounting a renderer or handling its inputs.
#[derive(Error, Debug)]
pub enum FieldError {
    /// The container could not provide a 2D drawing context.
    #[error("Container has no usable 2D drawing surface")]
    NoSurface,

    /// `mount` was called on a renderer that is already running.
    #[error("Renderer is already mounted; unmount it first")]
    AlreadyMounted,

    /// A configuration value is out of range.
    #[error("Invalid field configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize a JSON configuration.
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode a rendered frame.
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),

    /// A browser API call was rejected.
    #[cfg(feature = "web")]
    #[error("Browser API error: {0}")]
    Js(String),
}

#[cfg(feature = "web")]
impl From<wasm_bindgen::JsValue> for FieldError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        FieldError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FieldError>;
