//! Error types for the Veneer engine.

use thiserror::Error;

/// Main error type for Veneer operations.
#[derive(Error, Debug)]
pub enum VeneerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Veneer operations.
pub type Result<T> = std::result::Result<T, VeneerError>;
