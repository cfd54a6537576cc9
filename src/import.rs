//! Importer seam: source file to in-memory scene handle.

use std::path::Path;

use crate::manager::Manager;
use crate::options::ConvertOptions;
use crate::util::Result;

/// Opens and parses a source file.
///
/// The returned scene is owned by the caller and released when dropped,
/// on success and failure alike. Any resources the importer needs only
/// while reading (open files, mappings) must be released before `import`
/// returns.
pub trait Importer {
    type Scene;

    /// Fails with [`Error::Import`](crate::Error::Import) when the source
    /// cannot be opened or its structure cannot be read.
    fn import(&mut self, manager: &Manager, path: &Path, options: &ConvertOptions) -> Result<Self::Scene>;
}
