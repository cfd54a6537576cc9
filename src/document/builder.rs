//! Accumulates a glTF document and its binary buffers.

use gltf_json as json;
use gltf_json::validation::Checked::Valid;
use tracing::debug;

use super::{BufferBlob, Document};
use crate::options::{COPYRIGHT, GENERATOR};
use crate::util::{Error, Result};

/// Provenance stamped into `asset` on build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub generator: Option<String>,
    pub copyright: Option<String>,
}

impl BuildOptions {
    /// The fixed provenance of this tool.
    pub fn provenance() -> Self {
        Self {
            generator: Some(GENERATOR.to_string()),
            copyright: Some(COPYRIGHT.to_string()),
        }
    }
}

/// A finalized document and its index-aligned buffer payloads.
#[derive(Clone, Debug)]
pub struct BuildResult {
    /// Every buffer has its `byteLength` set and no `uri` yet.
    pub document: Document,
    pub buffers: Vec<BufferBlob>,
}

/// Builder populated by a [`SceneConverter`](crate::SceneConverter).
///
/// Buffers must be created through [`create_buffer`](Self::create_buffer)
/// so that each descriptor has a matching payload.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
    buffers: Vec<BufferBlob>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct access to nodes, meshes, materials and the rest.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Declare a new, empty buffer.
    pub fn create_buffer(&mut self, name: Option<&str>) -> json::Index<json::Buffer> {
        let index = json::Index::new(self.document.buffers.len() as u32);
        self.document.buffers.push(json::Buffer {
            byte_length: 0usize.into(),
            extensions: Default::default(),
            extras: Default::default(),
            name: name.map(str::to_string),
            uri: None,
        });
        self.buffers.push(Vec::new());
        index
    }

    /// Current payload of a buffer.
    pub fn buffer_data(&self, buffer: json::Index<json::Buffer>) -> Option<&[u8]> {
        self.buffers.get(buffer.value()).map(Vec::as_slice)
    }

    /// Append bytes to a buffer at a 4-byte aligned offset and declare a
    /// view over them.
    pub fn push_buffer_view(
        &mut self,
        buffer: json::Index<json::Buffer>,
        data: &[u8],
        target: Option<json::buffer::Target>,
    ) -> Result<json::Index<json::buffer::View>> {
        let blob = self
            .buffers
            .get_mut(buffer.value())
            .ok_or_else(|| Error::invalid(format!("buffer {} was never created", buffer.value())))?;

        while blob.len() % 4 != 0 {
            blob.push(0);
        }
        let offset = blob.len();
        blob.extend_from_slice(data);

        let index = json::Index::new(self.document.buffer_views.len() as u32);
        self.document.buffer_views.push(json::buffer::View {
            buffer,
            byte_length: data.len().into(),
            byte_offset: Some(offset.into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: target.map(Valid),
        });
        Ok(index)
    }

    /// [`push_buffer_view`](Self::push_buffer_view) for typed slices.
    pub fn push_pod_view<T: bytemuck::Pod>(
        &mut self,
        buffer: json::Index<json::Buffer>,
        data: &[T],
        target: Option<json::buffer::Target>,
    ) -> Result<json::Index<json::buffer::View>> {
        self.push_buffer_view(buffer, bytemuck::cast_slice(data), target)
    }

    pub fn add_node(&mut self, node: json::Node) -> json::Index<json::Node> {
        let index = json::Index::new(self.document.nodes.len() as u32);
        self.document.nodes.push(node);
        index
    }

    pub fn add_scene(&mut self, name: Option<&str>, nodes: Vec<json::Index<json::Node>>) -> json::Index<json::Scene> {
        let index = json::Index::new(self.document.scenes.len() as u32);
        self.document.scenes.push(json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: name.map(str::to_string),
            nodes,
        });
        index
    }

    pub fn add_image(&mut self, image: json::Image) -> json::Index<json::Image> {
        let index = json::Index::new(self.document.images.len() as u32);
        self.document.images.push(image);
        index
    }

    /// Finalize into a document plus one payload per buffer descriptor.
    pub fn build(self, options: &BuildOptions) -> Result<BuildResult> {
        let Self { mut document, buffers } = self;

        if document.buffers.len() != buffers.len() {
            return Err(Error::BufferCountMismatch {
                descriptors: document.buffers.len(),
                blobs: buffers.len(),
            });
        }

        for (descriptor, blob) in document.buffers.iter_mut().zip(&buffers) {
            descriptor.byte_length = blob.len().into();
            descriptor.uri = None;
        }

        document.asset.version = "2.0".to_string();
        document.asset.generator = options.generator.clone();
        document.asset.copyright = options.copyright.clone();

        if document.scene.is_none() && !document.scenes.is_empty() {
            document.scene = Some(json::Index::new(0));
        }

        debug!(
            nodes = document.nodes.len(),
            buffers = buffers.len(),
            bytes = buffers.iter().map(Vec::len).sum::<usize>(),
            "built document"
        );
        Ok(BuildResult { document, buffers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_node(name: &str) -> json::Node {
        json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: None,
            name: Some(name.to_string()),
            rotation: None,
            scale: None,
            skin: None,
            translation: None,
            weights: None,
        }
    }

    #[test]
    fn test_build_empty() {
        let result = DocumentBuilder::new().build(&BuildOptions::provenance()).unwrap();
        assert!(result.document.buffers.is_empty());
        assert!(result.buffers.is_empty());
        assert_eq!(result.document.asset.version, "2.0");
        assert_eq!(result.document.asset.generator.as_deref(), Some(GENERATOR));
        assert_eq!(result.document.asset.copyright.as_deref(), Some(COPYRIGHT));
        assert!(result.document.scene.is_none());
    }

    #[test]
    fn test_views_are_aligned() {
        let mut builder = DocumentBuilder::new();
        let buffer = builder.create_buffer(Some("geometry"));

        builder.push_buffer_view(buffer, &[1, 2, 3], None).unwrap();
        let second = builder
            .push_pod_view(buffer, &[1.0f32, 2.0], Some(json::buffer::Target::ArrayBuffer))
            .unwrap();

        assert_eq!(builder.buffer_data(buffer).unwrap().len(), 12);
        let view = &builder.document().buffer_views[second.value()];
        assert_eq!(view.byte_offset.map(|o| o.0), Some(4));
        assert_eq!(view.byte_length.0, 8);

        let result = builder.build(&BuildOptions::default()).unwrap();
        assert_eq!(result.document.buffers[0].byte_length.0, 12);
        assert!(result.document.buffers[0].uri.is_none());
        assert_eq!(&result.buffers[0][..3], &[1, 2, 3]);
    }

    #[test]
    fn test_unknown_buffer() {
        let mut builder = DocumentBuilder::new();
        let missing = json::Index::new(3);
        assert!(builder.push_buffer_view(missing, &[0], None).is_err());
    }

    #[test]
    fn test_descriptor_without_blob() {
        let mut builder = DocumentBuilder::new();
        builder.create_buffer(None);
        let stray = builder.document().buffers[0].clone();
        builder.document_mut().buffers.push(stray);

        let err = builder.build(&BuildOptions::default()).unwrap_err();
        assert!(matches!(err, Error::BufferCountMismatch { descriptors: 2, blobs: 1 }));
    }

    #[test]
    fn test_default_scene() {
        let mut builder = DocumentBuilder::new();
        let root = builder.add_node(named_node("root"));
        builder.add_scene(Some("Scene"), vec![root]);

        let result = builder.build(&BuildOptions::default()).unwrap();
        assert_eq!(result.document.scene.map(|s| s.value()), Some(0));
        assert_eq!(result.document.scenes[0].nodes.len(), 1);
    }
}
