// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid codepoint: {0}")]
    InvalidCodepoint(String),

    #[error("Invalid surface size (expected WIDTHxHEIGHT): {0}")]
    InvalidSurfaceSize(String),

    #[error("Platform error: {0}")]
    Platform(#[from] fontfall_core::PlatformError),
}

pub type ProbeResult<T> = Result<T, ProbeError>;
