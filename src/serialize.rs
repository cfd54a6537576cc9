//! Rendering a resolved document to JSON.

use serde_json::Value;

use crate::document::Document;
use crate::util::{Error, Result};

/// Render `document` as a JSON value.
///
/// Every buffer must already carry a `uri`; the first one without fails
/// with [`Error::UnresolvedBuffer`].
pub fn serialize(document: &Document) -> Result<Value> {
    if let Some(index) = document.buffers.iter().position(|b| b.uri.is_none()) {
        return Err(Error::UnresolvedBuffer(index));
    }
    Ok(serde_json::to_value(document)?)
}
