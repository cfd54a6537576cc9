//! # FBX-glTF-conv
//!
//! Packages binary FBX scenes as glTF 2.0 JSON documents.
//!
//! A conversion runs a fixed pipeline: an [`Importer`] opens the source and
//! produces a scene, a [`SceneConverter`] populates a [`DocumentBuilder`],
//! the builder yields the document plus one raw payload per buffer, and
//! every buffer is then resolved to a reference. A configured
//! [`BufferWriter`] may store payloads externally; anything it declines is
//! embedded as a base64 `data:` URI.
//!
//! ## Modules
//!
//! - [`util`] - Errors, data URIs, version formatting
//! - [`fbx`] - Native binary FBX reader and importer
//! - [`document`] - glTF document builder
//! - [`convert`] - Scene converters
//! - [`resolve`] - Buffer and image resolution
//! - [`converter`] - The conversion driver
//!
//! ## Example
//!
//! ```ignore
//! use fbx_gltf_conv::{convert, ConvertOptions, FileWriter};
//! use std::path::Path;
//!
//! let out = Path::new("out/scene.gltf");
//! let options = ConvertOptions::new().with_writer(FileWriter::for_output(out));
//! let json = convert("scene.fbx", &options)?;
//! std::fs::write(out, serde_json::to_string_pretty(&json)?)?;
//! ```

pub mod util;
pub mod options;
pub mod writer;
pub mod fbx;
pub mod import;
pub mod manager;
pub mod document;
pub mod convert;
pub mod resolve;
pub mod serialize;
pub mod converter;

// Re-export commonly used types
pub use util::{Error, Result};
pub use options::{ConvertOptions, LogLevel, Logger, TracingLogger, COPYRIGHT, GENERATOR};
pub use writer::{BufferWriter, DefaultWriter, FileWriter};
pub use import::Importer;
pub use manager::Manager;
pub use document::{BuildOptions, BuildResult, Document, DocumentBuilder};
pub use convert::{HierarchyConverter, SceneConverter};
pub use resolve::BufferResolver;
pub use converter::{convert, Converter, Stage};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::options::{ConvertOptions, LogLevel, Logger};
    pub use crate::writer::{BufferWriter, FileWriter};
    pub use crate::import::Importer;
    pub use crate::document::{json, Document, DocumentBuilder};
    pub use crate::convert::SceneConverter;
    pub use crate::fbx::{FbxImporter, FbxScene};
    pub use crate::converter::{convert, Converter, Stage};
}
