//! Conversion driver: import, convert, build, resolve, serialize.

use std::fmt;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info_span};

use crate::convert::{HierarchyConverter, SceneConverter};
use crate::document::{BuildOptions, BuildResult, Document, DocumentBuilder};
use crate::fbx::FbxImporter;
use crate::import::Importer;
use crate::manager::Manager;
use crate::options::ConvertOptions;
use crate::resolve::{resolve_images, BufferResolver};
use crate::serialize::serialize;
use crate::util::Result;

/// Pipeline stage of a [`Converter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Importing,
    Converting,
    Building,
    ResolvingBuffers,
    Serializing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Importing => "importing",
            Stage::Converting => "converting",
            Stage::Building => "building",
            Stage::ResolvingBuffers => "resolving buffers",
            Stage::Serializing => "serializing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Owns the engine state, importer and scene converter for a series of
/// sequential conversions.
///
/// The scene produced by the importer is released as soon as the document
/// is built, and on every error path before that.
pub struct Converter<I, C> {
    manager: Manager,
    importer: I,
    scene_converter: C,
    options: ConvertOptions,
    stage: Stage,
    failed_in: Option<Stage>,
}

impl<I, C> Converter<I, C>
where
    I: Importer,
    C: SceneConverter<I::Scene>,
{
    /// Fails with [`Error::Initialization`](crate::Error::Initialization)
    /// if the engine state cannot be set up.
    pub fn new(options: ConvertOptions, importer: I, scene_converter: C) -> Result<Self> {
        let manager = Manager::new(&options)?;
        Ok(Self {
            manager,
            importer,
            scene_converter,
            options,
            stage: Stage::Idle,
            failed_in: None,
        })
    }

    /// Stage reached by the last conversion.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Stage the last conversion failed in, if it failed.
    pub fn failed_in(&self) -> Option<Stage> {
        self.failed_in
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert `path` to a glTF JSON value.
    pub fn convert(&mut self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let _span = info_span!("convert", path = %path.display()).entered();

        let result = self.produce(path).and_then(|document| {
            self.enter(Stage::Serializing);
            serialize(&document)
        });
        self.finish(result)
    }

    /// Convert `path` and return the resolved document without rendering it.
    pub fn convert_document(&mut self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let _span = info_span!("convert_document", path = %path.display()).entered();

        let result = self.produce(path);
        self.finish(result)
    }

    fn produce(&mut self, path: &Path) -> Result<Document> {
        self.stage = Stage::Idle;
        self.failed_in = None;

        self.enter(Stage::Importing);
        let BuildResult { mut document, buffers } = {
            let scene = self.importer.import(&self.manager, path, &self.options)?;

            self.enter(Stage::Converting);
            let mut builder = DocumentBuilder::new();
            self.scene_converter.convert(&scene, &self.options, &mut builder)?;

            self.enter(Stage::Building);
            builder.build(&BuildOptions::provenance())?
        };

        self.enter(Stage::ResolvingBuffers);
        let resolver = BufferResolver::from_options(&self.options);
        match self.manager.pool() {
            Some(pool) => resolver.resolve_on(pool, &mut document, &buffers)?,
            None => resolver.resolve(&mut document, &buffers)?,
        }
        resolve_images(&mut document, &self.options);

        Ok(document)
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "stage");
        self.stage = stage;
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.enter(Stage::Done),
            Err(e) => {
                debug!(stage = %self.stage, error = %e, "conversion failed");
                self.failed_in = Some(self.stage);
                self.stage = Stage::Failed;
            }
        }
        result
    }
}

impl<I: fmt::Debug, C: fmt::Debug> fmt::Debug for Converter<I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("manager", &self.manager)
            .field("importer", &self.importer)
            .field("scene_converter", &self.scene_converter)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

/// Convert a binary FBX file to a glTF JSON value.
pub fn convert(path: impl AsRef<Path>, options: &ConvertOptions) -> Result<Value> {
    let mut converter = Converter::new(options.clone(), FbxImporter::new(), HierarchyConverter::new())?;
    converter.convert(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{decode_data_uri, Error};
    use std::io;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scene holding raw buffer payloads; counts its releases.
    struct BlobScene {
        blobs: Vec<Vec<u8>>,
        released: Arc<AtomicUsize>,
    }

    impl Drop for BlobScene {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct BlobImporter {
        blobs: Vec<Vec<u8>>,
        released: Arc<AtomicUsize>,
        fail: bool,
        imported: Vec<PathBuf>,
    }

    impl BlobImporter {
        fn new(blobs: Vec<Vec<u8>>) -> Self {
            Self {
                blobs,
                released: Arc::new(AtomicUsize::new(0)),
                fail: false,
                imported: Vec::new(),
            }
        }
    }

    impl Importer for BlobImporter {
        type Scene = BlobScene;

        fn import(&mut self, _manager: &Manager, path: &Path, _options: &ConvertOptions) -> Result<BlobScene> {
            if self.fail {
                return Err(Error::Import("Failed to initialize FBX importer: no such file".into()));
            }
            self.imported.push(path.to_path_buf());
            Ok(BlobScene {
                blobs: self.blobs.clone(),
                released: self.released.clone(),
            })
        }
    }

    fn one_buffer_per_blob(scene: &BlobScene, _: &ConvertOptions, builder: &mut DocumentBuilder) -> Result<()> {
        for blob in &scene.blobs {
            let buffer = builder.create_buffer(None);
            builder.push_buffer_view(buffer, blob, None)?;
        }
        Ok(())
    }

    #[test]
    fn test_success_releases_scene() {
        let importer = BlobImporter::new(vec![vec![1, 2, 3, 4]]);
        let released = importer.released.clone();
        let mut converter = Converter::new(ConvertOptions::default(), importer, one_buffer_per_blob).unwrap();

        let json = converter.convert("scene.fbx").unwrap();
        assert_eq!(converter.stage(), Stage::Done);
        assert_eq!(converter.failed_in(), None);
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(json["buffers"][0]["uri"], "data:application/octet-stream;base64,AQIDBA==");
        assert_eq!(json["asset"]["generator"], "FBX-glTF-conv");
    }

    #[test]
    fn test_import_failure() {
        let mut importer = BlobImporter::new(Vec::new());
        importer.fail = true;
        let released = importer.released.clone();
        let mut converter = Converter::new(ConvertOptions::default(), importer, one_buffer_per_blob).unwrap();

        let err = converter.convert("missing.fbx").unwrap_err();
        assert!(matches!(err, Error::Import(_)));
        assert_eq!(converter.stage(), Stage::Failed);
        assert_eq!(converter.failed_in(), Some(Stage::Importing));
        assert_eq!(released.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_conversion_error_propagates_unchanged() {
        let importer = BlobImporter::new(vec![vec![0; 8]]);
        let released = importer.released.clone();
        let failing = |_: &BlobScene, _: &ConvertOptions, _: &mut DocumentBuilder| -> Result<()> {
            Err(Error::conversion("unsupported skin"))
        };
        let mut converter = Converter::new(ConvertOptions::default(), importer, failing).unwrap();

        let err = converter.convert("scene.fbx").unwrap_err();
        assert_eq!(err.to_string(), "Conversion failed: unsupported skin");
        assert_eq!(converter.failed_in(), Some(Stage::Converting));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_writer_failure_fails_conversion() {
        let importer = BlobImporter::new(vec![vec![1], vec![2]]);
        let released = importer.released.clone();
        let options = ConvertOptions::new().with_writer(
            |_: &[u8], index: u32, _: bool| -> io::Result<Option<String>> {
                if index == 1 {
                    Err(io::Error::other("read-only volume"))
                } else {
                    Ok(Some("scene-0.bin".into()))
                }
            },
        );
        let mut converter = Converter::new(options, importer, one_buffer_per_blob).unwrap();

        let err = converter.convert("scene.fbx").unwrap_err();
        assert!(matches!(err, Error::Writer { index: 1, .. }));
        assert_eq!(converter.failed_in(), Some(Stage::ResolvingBuffers));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_parallel_resolution() {
        let blobs: Vec<Vec<u8>> = (0..16u8).map(|i| vec![i; 5]).collect();
        let importer = BlobImporter::new(blobs.clone());
        let options = ConvertOptions::new().with_parallel_buffers(true).with_threads(4);
        let mut converter = Converter::new(options, importer, one_buffer_per_blob).unwrap();

        let document = converter.convert_document("scene.fbx").unwrap();
        assert_eq!(converter.stage(), Stage::Done);
        for (buffer, blob) in document.buffers.iter().zip(&blobs) {
            let (_, data) = decode_data_uri(buffer.uri.as_deref().unwrap()).unwrap();
            assert_eq!(&data, blob);
        }
    }

    #[test]
    fn test_converter_is_reusable() {
        let importer = BlobImporter::new(vec![vec![9]]);
        let released = importer.released.clone();
        let mut converter = Converter::new(ConvertOptions::default(), importer, one_buffer_per_blob).unwrap();

        converter.convert("a.fbx").unwrap();
        converter.convert("b.fbx").unwrap();
        assert_eq!(released.load(Ordering::SeqCst), 2);
        assert_eq!(converter.importer.imported, [PathBuf::from("a.fbx"), PathBuf::from("b.fbx")]);
    }
}
