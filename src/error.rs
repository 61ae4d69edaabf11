//! Error types for path resolution and extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Why a path template could not be walked to a node.
///
/// `at` is the zero-based index of the offending segment, counting only
/// non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    #[error("no group named '{name}' at segment {at}")]
    GroupNotFound { name: String, at: usize },

    #[error("no subgroup to expand wildcard at segment {at}")]
    NoSubgroup { at: usize },

    #[error("wildcard at segment {at} matches {count} children")]
    AmbiguousWildcard { count: usize, at: usize },

    #[error("'{path}' is not a dataset")]
    NotADataset { path: String },
}

impl ResolutionFailure {
    /// Whether trying another layout could help. Ambiguity is a property of
    /// the file, not of the layout, and is always surfaced.
    pub fn is_not_found(&self) -> bool {
        !matches!(self, ResolutionFailure::AmbiguousWildcard { .. })
    }
}

/// Errors surfaced by [`crate::read_fast5`] and [`crate::extract`].
#[derive(Debug, Error)]
pub enum Fast5Error {
    #[error("raw signal not found ({reason}); possible wrong file format, expecting:\n{expected}")]
    RawSignalNotFound { reason: String, expected: String },

    #[error("scale factors not found ({reason}); possible wrong file format, expecting:\n{expected}\nwhere the metadata group contains the offset, range, and digitisation")]
    ScaleFactorsNotFound { reason: String, expected: String },

    #[error("ambiguous path {path}: {source}")]
    AmbiguousPath {
        path: String,
        #[source]
        source: ResolutionFailure,
    },

    #[error("cannot find sample rate: expected Meta.sample_rate or UniqueGlobalKey/context_tags.sample_frequency")]
    SampleRateNotFound,

    #[error("invalid scale factors: offset={offset}, range={range}, digitisation={digitisation}")]
    InvalidScaleFactors {
        offset: f64,
        range: f64,
        digitisation: f64,
    },

    #[error("unsupported container {path:?}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON container: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

pub type Result<T, E = Fast5Error> = std::result::Result<T, E>;
