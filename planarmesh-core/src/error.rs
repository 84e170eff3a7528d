//! Error types for planarmesh

use thiserror::Error;

/// Main error type for planarmesh operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Too few points, collinear points or zero-length vectors
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
    
    #[error("Empty input: {0}")]
    EmptyInput(String),
    
    #[error("Invalid callback: {0}")]
    InvalidCallback(String),
    
    #[error("Not implemented: {0}")]
    NotImplemented(String),
    
    #[error("Invalid data: {0}")]
    InvalidData(String),
    
    #[error("Unknown vertex: {0}")]
    UnknownVertex(String),
    
    #[error("Unknown face: {0}")]
    UnknownFace(String),
    
    #[error("Algorithm error: {0}")]
    Algorithm(String),
    
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type alias for planarmesh operations
pub type Result<T> = std::result::Result<T, Error>;
