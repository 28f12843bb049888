//! Error types for Poise

use thiserror::Error;

/// Core Poise errors
#[derive(Error, Debug)]
pub enum PoiseError {
    // Analysis errors
    #[error("Frame decode failed: {0}")]
    Decode(String),

    // Signaling errors
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    // Transport errors
    #[error("Transport error: {0}")]
    TransportError(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for Poise operations
pub type PoiseResult<T> = Result<T, PoiseError>;
