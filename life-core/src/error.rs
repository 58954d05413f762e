//! # Error Types for Life
//!
//! Unified error handling across the Life crates.

use thiserror::Error;

/// Main error type for Life operations
#[derive(Error, Debug)]
pub enum LifeError {
    /// Invalid dimensions, generation count or config value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Coordinate outside the grid
    #[error("Index ({row}, {col}) out of bounds for {width}x{height} grid")]
    Index {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    /// Read and write buffers disagree on shape or boundary
    #[error("Shape mismatch: read is {read_width}x{read_height}, write is {write_width}x{write_height}")]
    ShapeMismatch {
        read_width: usize,
        read_height: usize,
        write_width: usize,
        write_height: usize,
    },

    /// Execution backend fault during a step
    #[error("Execution backend error: {0}")]
    Backend(String),

    /// GPU-specific error
    #[error("GPU error: {0}")]
    Gpu(String),

    /// Operation invoked in the wrong simulation phase
    #[error("Invalid state: {0}")]
    State(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for Life operations
pub type LifeResult<T> = Result<T, LifeError>;

impl LifeError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a GPU error
    pub fn gpu(msg: impl Into<String>) -> Self {
        Self::Gpu(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Whether this error came out of an execution backend
    ///
    /// GPU errors count: a device fault mid-step is a backend fault.
    pub fn is_backend_fault(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Gpu(_))
    }
}

impl From<serde_json::Error> for LifeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
