//! In-memory FBX scene handle.

use std::path::{Path, PathBuf};

use super::format::NAME_CLASS_SEPARATOR;
use super::node::FbxNode;
use crate::util::format_file_version;

/// A parsed FBX scene, exclusively owned by one conversion.
#[derive(Clone, Debug)]
pub struct FbxScene {
    version: u32,
    nodes: Vec<FbxNode>,
    media_dir: Option<PathBuf>,
}

/// An entry of the `Objects` section.
#[derive(Clone, Copy, Debug)]
pub struct FbxObject<'a> {
    pub id: i64,
    pub name: &'a str,
    /// Class from the `name\0\x01Class` string, e.g. `Model`.
    pub class: &'a str,
    /// Subclass, e.g. `Mesh` or `LimbNode`.
    pub kind: &'a str,
    pub node: &'a FbxNode,
}

/// Link kinds of the `Connections` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// Object to object
    ObjectObject,
    /// Object to a property of an object
    ObjectProperty,
    /// Property to object
    PropertyObject,
    /// Property to property
    PropertyProperty,
}

impl ConnectionKind {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "OO" => Some(Self::ObjectObject),
            "OP" => Some(Self::ObjectProperty),
            "PO" => Some(Self::PropertyObject),
            "PP" => Some(Self::PropertyProperty),
            _ => None,
        }
    }
}

/// A `C` record: `child` is attached to `parent` (id 0 is the scene root).
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    pub kind: ConnectionKind,
    pub child: i64,
    pub parent: i64,
    pub property: Option<String>,
}

impl FbxScene {
    pub fn new(version: u32, nodes: Vec<FbxNode>) -> Self {
        Self {
            version,
            nodes,
            media_dir: None,
        }
    }

    pub fn with_media_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.media_dir = dir;
        self
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Version as `major.minor`.
    pub fn version_string(&self) -> String {
        format_file_version(self.version)
    }

    /// Top-level records.
    #[inline]
    pub fn nodes(&self) -> &[FbxNode] {
        &self.nodes
    }

    /// Directory holding extracted embedded media, if one was configured.
    pub fn media_dir(&self) -> Option<&Path> {
        self.media_dir.as_deref()
    }

    /// Top-level record by name, e.g. `Objects`.
    pub fn section(&self, name: &str) -> Option<&FbxNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Entries of the `Objects` section that carry an id, in file order.
    pub fn objects(&self) -> Vec<FbxObject<'_>> {
        let Some(objects) = self.section("Objects") else {
            return Vec::new();
        };
        objects
            .children
            .iter()
            .filter_map(|node| {
                let id = node.i64_property(0)?;
                let (name, class) = split_name_class(node.str_property(1).unwrap_or_default());
                Some(FbxObject {
                    id,
                    name,
                    class: if class.is_empty() { node.name.as_str() } else { class },
                    kind: node.str_property(2).unwrap_or_default(),
                    node,
                })
            })
            .collect()
    }

    /// Entries of the `Connections` section, in file order.
    pub fn connections(&self) -> Vec<Connection> {
        let Some(connections) = self.section("Connections") else {
            return Vec::new();
        };
        connections
            .children_named("C")
            .filter_map(|node| {
                Some(Connection {
                    kind: ConnectionKind::parse(node.str_property(0)?)?,
                    child: node.i64_property(1)?,
                    parent: node.i64_property(2)?,
                    property: node.str_property(3).map(str::to_string),
                })
            })
            .collect()
    }

    /// Name of the scene document, if present and non-empty.
    pub fn document_name(&self) -> Option<&str> {
        let document = self.section("Documents")?.child("Document")?;
        let (name, _) = split_name_class(document.str_property(1)?);
        Some(name).filter(|n| !n.is_empty())
    }
}

/// Split `name\0\x01Class` into its parts.
pub fn split_name_class(value: &str) -> (&str, &str) {
    value.split_once(NAME_CLASS_SEPARATOR).unwrap_or((value, ""))
}
