//! Utility types and functions shared by the pipeline.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`encode_data_uri`] / [`decode_data_uri`] - Inline buffer references
//! - [`format_file_version`] - Source version strings

mod data_uri;
mod error;
mod version;

pub use data_uri::*;
pub use error::*;
pub use version::*;
