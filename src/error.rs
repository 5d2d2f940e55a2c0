use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Every failure the library can surface. Data-integrity problems are never
/// retried; callers are expected to abort the current dataset and report.
#[derive(Debug, Error)]
pub enum VitaraError {
    /// A field in a spectrum file is not a floating-point literal.
    /// `line` is the 1-based physical line, `field` the 0-based field index.
    #[error("line {line}, field {field}: '{value}' is not a number")]
    Parse {
        line: usize,
        field: usize,
        value: String,
    },

    #[error("line {line}: trace has {found} pixels, expected {expected}")]
    RaggedTrace {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("positions file has {positions} columns but spectrum file has {spectrum} traces")]
    ShapeMismatch { positions: usize, spectrum: usize },

    #[error("cannot map value {value}; not in range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("domain error: {0}")]
    Domain(String),

    #[error("invalid vertical unit kind: {0}")]
    InvalidUnitKind(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl VitaraError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VitaraError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, VitaraError>;
