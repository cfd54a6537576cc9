//! Error types for the converter.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The converter's engine state could not be set up
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// The source file could not be opened or parsed
    #[error("{0}")]
    Import(String),

    /// The scene converter failed while populating the document
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// An external buffer writer raised instead of abstaining
    #[error("Buffer writer failed for buffer {index}: {source}")]
    Writer {
        index: u32,
        #[source]
        source: std::io::Error,
    },

    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Missing binary FBX magic bytes
    #[error("Invalid FBX file: expected binary FBX magic bytes")]
    InvalidMagic,

    /// Recognized but unsupported source format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// File is truncated or corrupted
    #[error("Unexpected end of file at position {0}")]
    UnexpectedEof(u64),

    /// Invalid data structure in file
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// Buffer descriptors and blobs are not index-aligned
    #[error("Buffer count mismatch: {descriptors} descriptors, {blobs} blobs")]
    BufferCountMismatch { descriptors: usize, blobs: usize },

    /// A buffer reached serialization without a reference
    #[error("Buffer {0} has no resolved URI")]
    UnresolvedBuffer(usize),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create a conversion error, for use by scene converters.
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
