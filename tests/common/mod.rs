//! Binary FBX fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// A node record with encoded properties.
#[derive(Clone, Debug, Default)]
pub struct Record {
    name: String,
    props: Vec<Vec<u8>>,
    children: Vec<Record>,
}

impl Record {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn i64(mut self, value: i64) -> Self {
        let mut p = vec![b'L'];
        p.extend_from_slice(&value.to_le_bytes());
        self.props.push(p);
        self
    }

    pub fn string(mut self, value: &str) -> Self {
        let mut p = vec![b'S'];
        p.extend_from_slice(&(value.len() as u32).to_le_bytes());
        p.extend_from_slice(value.as_bytes());
        self.props.push(p);
        self
    }

    pub fn raw(mut self, data: &[u8]) -> Self {
        let mut p = vec![b'R'];
        p.extend_from_slice(&(data.len() as u32).to_le_bytes());
        p.extend_from_slice(data);
        self.props.push(p);
        self
    }

    /// `d` array, zlib-compressed when `compress` is set.
    pub fn f64_array(mut self, values: &[f64], compress: bool) -> Self {
        let raw: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let (encoding, payload) = if compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&raw).unwrap();
            (1u32, encoder.finish().unwrap())
        } else {
            (0u32, raw)
        };
        let mut p = vec![b'd'];
        p.extend_from_slice(&(values.len() as u32).to_le_bytes());
        p.extend_from_slice(&encoding.to_le_bytes());
        p.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        p.extend_from_slice(&payload);
        self.props.push(p);
        self
    }

    pub fn child(mut self, child: Record) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Record>) -> Self {
        self.children.extend(children);
        self
    }

    fn encode(&self, out: &mut Vec<u8>, version: u32) {
        let width = offset_width(version);
        let start = out.len();
        out.resize(start + null_record_len(version), 0);
        out[start + 3 * width] = self.name.len() as u8;
        out.extend_from_slice(self.name.as_bytes());

        let props_start = out.len();
        for p in &self.props {
            out.extend_from_slice(p);
        }
        let props_len = (out.len() - props_start) as u64;

        if !self.children.is_empty() {
            for child in &self.children {
                child.encode(out, version);
            }
            out.resize(out.len() + null_record_len(version), 0);
        }

        let end = out.len() as u64;
        put_offset(out, start, end, width);
        put_offset(out, start + width, self.props.len() as u64, width);
        put_offset(out, start + 2 * width, props_len, width);
    }
}

fn offset_width(version: u32) -> usize {
    if version >= 7500 {
        8
    } else {
        4
    }
}

fn null_record_len(version: u32) -> usize {
    3 * offset_width(version) + 1
}

fn put_offset(out: &mut [u8], at: usize, value: u64, width: usize) {
    out[at..at + width].copy_from_slice(&value.to_le_bytes()[..width]);
}

/// Encode a complete binary FBX file.
pub fn fbx_bytes(version: u32, records: &[Record]) -> Vec<u8> {
    let mut out = b"Kaydara FBX Binary  \0".to_vec();
    out.extend_from_slice(&[0x1A, 0x00]);
    out.extend_from_slice(&version.to_le_bytes());
    for record in records {
        record.encode(&mut out, version);
    }
    out.resize(out.len() + null_record_len(version), 0);
    out
}

pub fn write_fbx(dir: &Path, name: &str, version: u32, records: &[Record]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, fbx_bytes(version, records)).unwrap();
    path
}

pub fn document(name: &str) -> Record {
    Record::new("Documents").child(Record::new("Document").i64(1).string(name).string("Scene"))
}

pub fn model(id: i64, name: &str) -> Record {
    Record::new("Model")
        .i64(id)
        .string(&format!("{}\0\u{1}Model", name))
        .string("Null")
}

/// `Video` object embedding `content` as raw bytes.
pub fn video(id: i64, name: &str, content: &[u8]) -> Record {
    Record::new("Video")
        .i64(id)
        .string(&format!("{}\0\u{1}Video", name))
        .string("Clip")
        .child(Record::new("Content").raw(content))
}

pub fn objects(children: impl IntoIterator<Item = Record>) -> Record {
    Record::new("Objects").children(children)
}

/// `OO` links, `(child, parent)`.
pub fn connections(links: &[(i64, i64)]) -> Record {
    Record::new("Connections").children(
        links
            .iter()
            .map(|&(child, parent)| Record::new("C").string("OO").i64(child).i64(parent)),
    )
}
