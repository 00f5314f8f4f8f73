//! `lloyd` is a small numeric toolkit: Lloyd's k-means over an in-memory
//! point set, and a streaming count / mean / mean-of-squares reducer.
//!
//! The clustering engine is deliberately plain:
//! - Observations are loaded once from tab-separated text and never mutated.
//! - Distance and centroid placement are pluggable ([`DistanceMetric`],
//!   [`CentroidInitializer`]); Euclidean distance and uniform-in-range
//!   initialization are the defaults.
//! - A run stops when a full pass reassigns nothing, or at
//!   [`KMeansOptions::max_iterations`] centroid updates.
//! - Empty clusters follow [`EmptyClusterPolicy`].
//!
//! Everything is single-threaded and synchronous.

pub mod dataset;
pub mod error;
pub mod init;
pub mod kmeans;
pub mod linalg;
pub mod matrix;
pub mod metric;
pub mod stats;

pub use dataset::{generate_synthetic, max_magnitude, Dataset, SyntheticConfig, SyntheticDataset};
pub use error::{Error, Result};
pub use init::{CentroidInitializer, Fixed, InitKind, RandomInRange, RandomSample};
pub use kmeans::{
    predict, Assignment, EmptyClusterPolicy, IterationEvent, IterationObserver, KMeans,
    KMeansOptions, KMeansResult,
};
pub use matrix::Matrix;
pub use metric::{DistanceMetric, Euclidean, Manhattan, MetricKind};
pub use stats::{reduce_records, MapperRecord, MeanStats};

/// Library version string exposed to the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
