//! Error types for genre-trends operations.

use thiserror::Error;

/// Result type alias for genre-trends operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading data or configuring a chart.
///
/// Malformed cells inside a dataset are never errors: the pipeline coerces
/// or drops them. Only whole-source failures surface here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A data source could not produce records.
    #[error("Load failed: {source_name}: {reason}")]
    Load {
        /// Name of the source (usually a path).
        source_name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// A CSV record could not be read.
    #[error("CSV read error at line {line}: {reason}")]
    CsvRecord {
        /// Line number where the error occurred.
        line: usize,
        /// Reason for the failure.
        reason: String,
    },

    /// Region name not in the known metric-column set.
    #[error("Unknown region: {0} (expected NA_Sales, EU_Sales, JP_Sales, Other_Sales or Global_Sales)")]
    InvalidRegion(String),

    /// Platform family filter not recognized.
    #[error("Unknown platform family: {0} (expected All, Nintendo, PlayStation, Xbox, PC or Other)")]
    InvalidFamily(String),

    /// Invalid chart configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether this error came from loading a dataset.
    ///
    /// Load-class errors leave any previously rendered chart untouched.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Load { .. } | Self::CsvRecord { .. } | Self::Io(_) | Self::Json(_) | Self::Csv(_)
        )
    }
}
