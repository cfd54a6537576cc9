//! Parsed FBX node records.

/// A single property value of a node record.
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    I16(i16),
    Bool(bool),
    I32(i32),
    F32(f32),
    F64(f64),
    I64(i64),
    F32Array(Vec<f32>),
    F64Array(Vec<f64>),
    I64Array(Vec<i64>),
    I32Array(Vec<i32>),
    BoolArray(Vec<bool>),
    /// `S` record; may contain embedded NULs (`name\0\x01Class`).
    String(String),
    Raw(Vec<u8>),
}

impl Property {
    /// Single-character type code as stored in the file.
    pub fn type_code(&self) -> char {
        match self {
            Property::I16(_) => 'Y',
            Property::Bool(_) => 'C',
            Property::I32(_) => 'I',
            Property::F32(_) => 'F',
            Property::F64(_) => 'D',
            Property::I64(_) => 'L',
            Property::F32Array(_) => 'f',
            Property::F64Array(_) => 'd',
            Property::I64Array(_) => 'l',
            Property::I32Array(_) => 'i',
            Property::BoolArray(_) => 'b',
            Property::String(_) => 'S',
            Property::Raw(_) => 'R',
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Property::I16(v) => Some(v as i64),
            Property::I32(v) => Some(v as i64),
            Property::I64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Property::F32(v) => Some(v as f64),
            Property::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Number of elements for arrays, 1 for scalars.
    pub fn len(&self) -> usize {
        match self {
            Property::F32Array(v) => v.len(),
            Property::F64Array(v) => v.len(),
            Property::I64Array(v) => v.len(),
            Property::I32Array(v) => v.len(),
            Property::BoolArray(v) => v.len(),
            Property::Raw(v) => v.len(),
            Property::String(s) => s.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short human-readable rendering for tree dumps.
    pub fn summary(&self) -> String {
        match self {
            Property::I16(v) => v.to_string(),
            Property::Bool(v) => v.to_string(),
            Property::I32(v) => v.to_string(),
            Property::F32(v) => v.to_string(),
            Property::F64(v) => v.to_string(),
            Property::I64(v) => v.to_string(),
            Property::String(s) => format!("{:?}", s.replace(super::NAME_CLASS_SEPARATOR, "::")),
            other => format!("{}[{}]", other.type_code(), other.len()),
        }
    }
}

/// A node record: name, properties and nested records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FbxNode {
    pub name: String,
    pub properties: Vec<Property>,
    pub children: Vec<FbxNode>,
}

impl FbxNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// First nested record with the given name.
    pub fn child(&self, name: &str) -> Option<&FbxNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All nested records with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FbxNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn property(&self, index: usize) -> Option<&Property> {
        self.properties.get(index)
    }

    pub fn str_property(&self, index: usize) -> Option<&str> {
        self.property(index).and_then(Property::as_str)
    }

    pub fn i64_property(&self, index: usize) -> Option<i64> {
        self.property(index).and_then(Property::as_i64)
    }

    /// Total number of records in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(FbxNode::count).sum::<usize>()
    }
}
