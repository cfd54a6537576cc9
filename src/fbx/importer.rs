//! Importer for binary FBX files.

use std::path::Path;

use tracing::{debug, info_span};

use super::reader::FbxStream;
use super::scene::FbxScene;
use crate::import::Importer;
use crate::manager::Manager;
use crate::options::ConvertOptions;
use crate::util::{format_file_version, Error, Result};

/// Reads binary FBX files into [`FbxScene`]s.
///
/// The file and its mapping live only for the duration of `import`; the
/// returned scene owns everything it needs.
#[derive(Clone, Copy, Debug, Default)]
pub struct FbxImporter;

impl FbxImporter {
    pub fn new() -> Self {
        Self
    }
}

impl Importer for FbxImporter {
    type Scene = FbxScene;

    fn import(&mut self, manager: &Manager, path: &Path, options: &ConvertOptions) -> Result<FbxScene> {
        let _span = info_span!("import", path = %path.display()).entered();

        let stream = FbxStream::open(path)
            .map_err(|e| Error::Import(format!("Failed to initialize FBX importer: {}", e)))?;
        debug!(version = stream.version(), size = stream.size(), "opened FBX file");

        options.log_verbose(format!("FBX file version: {}", format_file_version(stream.version())));

        let nodes = stream
            .read_nodes()
            .map_err(|e| Error::Import(format!("Failed to import scene: {}", e)))?;
        debug!(records = nodes.len(), "parsed top-level records");

        Ok(FbxScene::new(stream.version(), nodes).with_media_dir(manager.media_dir().map(Path::to_path_buf)))
    }
}
