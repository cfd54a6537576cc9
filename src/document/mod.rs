//! The target glTF document and the builder converters populate.

mod builder;

pub use builder::*;
pub use gltf_json as json;

/// The interchange document prior to serialization.
pub type Document = json::Root;

/// Raw payload of one buffer descriptor.
pub type BufferBlob = Vec<u8>;
