// src/error.rs
use thiserror::Error;

/// Failures reported by a font catalog collaborator
///
/// The resolver treats all of these as transient: a failed enumeration yields
/// "no coverage" for that one call and is never remembered.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Font catalog unavailable: {message}")]
    Unavailable { message: String },

    #[error("Font catalog IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown language group: {0}")]
    UnknownLanguage(String),
}

/// Error hierarchy for the platform layer
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Font catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Platform initialization failed: {reason}")]
    Initialization { reason: String },

    #[error("Font list refresh failed: {message}")]
    FontListRefresh { message: String },

    #[error("Failed to create {backend} surface: {message}")]
    SurfaceCreation { backend: String, message: String },

    #[error("Invalid configuration: {field} = {value}")]
    Configuration { field: String, value: String },
}

pub type PlatformResult<T> = Result<T, PlatformError>;
