use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding or converting a BPLT file
#[derive(Debug, Error)]
pub enum BpltError {
    /// File identifier or version string does not carry the expected prefix
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// A required fixed-size header field is cut short
    #[error("Truncated stream: {field} needs {needed} bytes, {available} available")]
    TruncatedStream {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// Every channel block was empty or unreadable
    #[error("No valid channels could be read from the file")]
    EmptyChannelSet,

    /// Declared shape exceeds the configured cell limit
    #[error(
        "BPLT file too large for conversion. Estimated {rows} rows x {columns} columns \
         ({cells} cells, limit {limit}). Convert locally or increase BPLT_MAX_CELLS."
    )]
    SizeLimitExceeded {
        rows: u32,
        columns: u32,
        cells: u64,
        limit: i64,
    },

    /// Input file could not be read
    #[error("Failed to read BPLT file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export format error
    #[error("Export error: {0}")]
    Export(String),
}

impl BpltError {
    pub fn malformed_header<S: Into<String>>(msg: S) -> Self {
        Self::MalformedHeader(msg.into())
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for BpltError {
    fn from(err: csv::Error) -> Self {
        BpltError::Export(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for BpltError {
    fn from(err: serde_json::Error) -> Self {
        BpltError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BpltError>;
