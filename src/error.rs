use thiserror::Error;

/// Main error type for partials-demo operations
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch {location}: {message}")]
    Fetch { location: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures locating an example routine in source text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no line matches routine marker `{0}`")]
    MarkerNotFound(String),

    #[error("invalid routine marker `{pattern}`: {message}")]
    InvalidMarker { pattern: String, message: String },
}

/// Segment/output misalignment detected while merging example output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("no captured output for call site {index} ({available} outputs captured)")]
    MissingOutput { index: usize, available: usize },

    #[error("{unused} captured outputs have no matching call site")]
    UnusedOutputs { unused: usize },
}

pub type Result<T> = std::result::Result<T, DemoError>;
