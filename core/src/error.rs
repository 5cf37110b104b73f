use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, persisting, loading or querying an index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("record {record}: document id must be a non-negative integer, got {token:?}")]
    Parse { record: usize, token: String },

    #[error("record {record}: document id {id} exceeds the 16-bit limit of {max}", max = u16::MAX)]
    DocIdOutOfRange { record: usize, id: u64 },

    #[error("record {record}: document id {id} follows {previous}, ids must be non-decreasing")]
    OutOfOrder { record: usize, previous: u16, id: u16 },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("corrupt index: postings for term {term:?} span {len} bytes, not a multiple of 2")]
    OddPostingsChunk { term: String, len: usize },

    #[error("corrupt index: term bytes are not valid UTF-8: {0}")]
    InvalidTerm(#[from] std::str::Utf8Error),

    #[error("corrupt index: trailing data without a closing delimiter ({len} bytes)")]
    TrailingChunk { len: usize },

    #[error("corrupt index: term {0:?} appears more than once")]
    DuplicateTerm(String),

    #[error("corrupt index: unexpected end of data while reading {0}")]
    Truncated(&'static str),

    #[error("corrupt index: bad magic {0:?}")]
    BadMagic([u8; 4]),

    #[error("corrupt index: unsupported format version {0}")]
    UnsupportedVersion(u8),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("term {term:?} collides with the field delimiter and cannot be stored in this format")]
    SentinelCollision { term: String },

    #[error("term {0:?} is too long for this format")]
    TermTooLong(String),

    #[error("query must contain at least one word")]
    EmptyQuery,
}

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::Io { path: path.into(), source }
    }

    /// True for errors caused by a malformed persisted index.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            IndexError::OddPostingsChunk { .. }
                | IndexError::InvalidTerm(_)
                | IndexError::TrailingChunk { .. }
                | IndexError::DuplicateTerm(_)
                | IndexError::Truncated(_)
                | IndexError::BadMagic(_)
                | IndexError::UnsupportedVersion(_)
                | IndexError::Json(_)
                | IndexError::Bincode(_)
        )
    }
}
