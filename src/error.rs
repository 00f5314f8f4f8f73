use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}, column {column}: cannot parse {value:?} as a number")]
    Parse {
        line: usize,
        column: usize,
        value: String,
    },

    #[error("line {line}: expected {expected} fields, got {got}")]
    Ragged {
        line: usize,
        expected: usize,
        got: usize,
    },

    /// `line` is the physical input line for parsed files and the 1-based
    /// row for in-memory matrices.
    #[error("line {line}, column {column}: value is not finite")]
    NonFinite { line: usize, column: usize },

    #[error("line {line}, column {column}: magnitude of {value:e} exceeds {limit:e}")]
    OutOfRange {
        line: usize,
        column: usize,
        value: f64,
        limit: f64,
    },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("cluster count {k} must be in 1..={observations}")]
    InvalidClusterCount { k: usize, observations: usize },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("cluster {cluster} has no observations at iteration {iteration}")]
    EmptyCluster { cluster: usize, iteration: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
