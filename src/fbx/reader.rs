//! Binary FBX reader.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;
#[cfg(feature = "mmap")]
use memmap2::Mmap;

use super::format::*;
use super::node::{FbxNode, Property};
use crate::util::{Error, Result};

/// Input bytes of a binary FBX file.
/// Memory-mapped when the `mmap` feature is enabled, owned otherwise.
pub struct FbxStream {
    inner: StreamInner,
    version: u32,
}

enum StreamInner {
    #[cfg(feature = "mmap")]
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl FbxStream {
    /// Open a file and validate its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let size = file.metadata()?.len();
        let inner = Self::load(&mut file, size)?;
        let version = Self::parse_header(inner.bytes())?;

        Ok(Self { inner, version })
    }

    /// Wrap bytes already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let version = Self::parse_header(&data)?;
        Ok(Self {
            inner: StreamInner::Owned(data),
            version,
        })
    }

    #[cfg(feature = "mmap")]
    fn load(file: &mut File, size: u64) -> Result<StreamInner> {
        if size == 0 {
            return Ok(StreamInner::Owned(Vec::new()));
        }
        // Safety: the file is opened read-only and only read through this mapping
        let mmap = unsafe { Mmap::map(&*file) }?;
        Ok(StreamInner::Mmap(mmap))
    }

    #[cfg(not(feature = "mmap"))]
    fn load(file: &mut File, size: u64) -> Result<StreamInner> {
        let mut data = Vec::with_capacity(size as usize);
        file.read_to_end(&mut data)?;
        Ok(StreamInner::Owned(data))
    }

    /// Validate the header and return the version code.
    fn parse_header(data: &[u8]) -> Result<u32> {
        if data.starts_with(ASCII_MARKER) {
            return Err(Error::UnsupportedFormat("ASCII FBX files are not supported".into()));
        }
        if data.len() < HEADER_SIZE {
            return Err(Error::UnexpectedEof(data.len() as u64));
        }
        if &data[..BINARY_MAGIC.len()] != BINARY_MAGIC {
            return Err(Error::InvalidMagic);
        }
        Ok(LittleEndian::read_u32(&data[VERSION_OFFSET..HEADER_SIZE]))
    }

    /// Raw version code, e.g. `7400`.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        self.inner.bytes()
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.data().len() as u64
    }

    /// Parse every top-level node record.
    pub fn read_nodes(&self) -> Result<Vec<FbxNode>> {
        let mut reader = RecordReader {
            data: self.data(),
            pos: HEADER_SIZE,
            wide: has_wide_records(self.version),
        };
        let header_size = record_header_size(self.version);

        let mut nodes = Vec::new();
        // Some exporters omit the terminating null record before the footer
        while reader.remaining() >= header_size {
            match reader.read_node(0)? {
                Some(node) => nodes.push(node),
                None => break,
            }
        }
        Ok(nodes)
    }
}

impl StreamInner {
    fn bytes(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            StreamInner::Mmap(mmap) => &mmap[..],
            StreamInner::Owned(data) => &data[..],
        }
    }
}

struct RecordReader<'a> {
    data: &'a [u8],
    pos: usize,
    wide: bool,
}

impl<'a> RecordReader<'a> {
    #[inline]
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::UnexpectedEof(self.pos as u64 + len as u64))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    fn read_offset(&mut self) -> Result<u64> {
        if self.wide {
            Ok(LittleEndian::read_u64(self.take(8)?))
        } else {
            Ok(self.read_u32()? as u64)
        }
    }

    /// Read one record nested `depth` levels below the top; `None` for a
    /// null record.
    fn read_node(&mut self, depth: usize) -> Result<Option<FbxNode>> {
        if depth >= MAX_RECORD_DEPTH {
            return Err(Error::invalid(format!(
                "record nesting too deep at {} (limit {})",
                self.pos, MAX_RECORD_DEPTH
            )));
        }
        let start = self.pos as u64;
        let end_offset = self.read_offset()?;
        let num_properties = self.read_offset()?;
        let property_list_len = self.read_offset()?;
        let name_len = self.read_u8()? as usize;

        if end_offset == 0 {
            if num_properties != 0 || property_list_len != 0 || name_len != 0 {
                return Err(Error::invalid(format!("malformed null record at {}", start)));
            }
            return Ok(None);
        }
        if end_offset > self.data.len() as u64 {
            return Err(Error::UnexpectedEof(end_offset));
        }
        if end_offset <= start {
            return Err(Error::invalid(format!(
                "record at {} ends before it starts ({})",
                start, end_offset
            )));
        }

        let name = String::from_utf8(self.take(name_len)?.to_vec())?;

        let properties_start = self.pos as u64;
        let mut properties = Vec::with_capacity(num_properties.min(64) as usize);
        for _ in 0..num_properties {
            properties.push(self.read_property()?);
        }
        let properties_len = self.pos as u64 - properties_start;
        if properties_len != property_list_len {
            return Err(Error::invalid(format!(
                "property list of '{}' is {} bytes, header says {}",
                name, properties_len, property_list_len
            )));
        }

        let mut children = Vec::new();
        while (self.pos as u64) < end_offset {
            match self.read_node(depth + 1)? {
                Some(child) => children.push(child),
                None => break,
            }
        }
        if self.pos as u64 != end_offset {
            return Err(Error::invalid(format!(
                "record '{}' ends at {}, header says {}",
                name, self.pos, end_offset
            )));
        }

        Ok(Some(FbxNode {
            name,
            properties,
            children,
        }))
    }

    fn read_property(&mut self) -> Result<Property> {
        let at = self.pos;
        let code = self.read_u8()?;
        let property = match code {
            b'Y' => Property::I16(LittleEndian::read_i16(self.take(2)?)),
            b'C' => Property::Bool(self.read_u8()? != 0),
            b'I' => Property::I32(LittleEndian::read_i32(self.take(4)?)),
            b'F' => Property::F32(LittleEndian::read_f32(self.take(4)?)),
            b'D' => Property::F64(LittleEndian::read_f64(self.take(8)?)),
            b'L' => Property::I64(LittleEndian::read_i64(self.take(8)?)),
            b'f' => {
                let bytes = self.read_array(4)?;
                let mut values = vec![0f32; bytes.len() / 4];
                LittleEndian::read_f32_into(&bytes, &mut values);
                Property::F32Array(values)
            }
            b'd' => {
                let bytes = self.read_array(8)?;
                let mut values = vec![0f64; bytes.len() / 8];
                LittleEndian::read_f64_into(&bytes, &mut values);
                Property::F64Array(values)
            }
            b'l' => {
                let bytes = self.read_array(8)?;
                let mut values = vec![0i64; bytes.len() / 8];
                LittleEndian::read_i64_into(&bytes, &mut values);
                Property::I64Array(values)
            }
            b'i' => {
                let bytes = self.read_array(4)?;
                let mut values = vec![0i32; bytes.len() / 4];
                LittleEndian::read_i32_into(&bytes, &mut values);
                Property::I32Array(values)
            }
            b'b' => {
                let bytes = self.read_array(1)?;
                Property::BoolArray(bytes.iter().map(|&b| b != 0).collect())
            }
            b'S' => {
                let len = self.read_u32()? as usize;
                Property::String(String::from_utf8_lossy(self.take(len)?).into_owned())
            }
            b'R' => {
                let len = self.read_u32()? as usize;
                Property::Raw(self.take(len)?.to_vec())
            }
            other => {
                return Err(Error::invalid(format!(
                    "unknown property type {:?} at {}",
                    other as char, at
                )))
            }
        };
        Ok(property)
    }

    /// Read an array property's payload, inflating it if needed.
    fn read_array(&mut self, elem_size: usize) -> Result<Cow<'a, [u8]>> {
        let count = self.read_u32()? as usize;
        let enc = self.read_u32()?;
        let stored_len = self.read_u32()? as usize;
        let expected = count
            .checked_mul(elem_size)
            .ok_or_else(|| Error::invalid(format!("array of {} elements is too large", count)))?;
        let payload = self.take(stored_len)?;

        let bytes = match enc {
            encoding::RAW => Cow::Borrowed(payload),
            encoding::ZLIB => {
                let mut out = Vec::new();
                ZlibDecoder::new(payload)
                    .take(expected as u64 + 1)
                    .read_to_end(&mut out)
                    .map_err(|e| Error::invalid(format!("corrupt compressed array: {}", e)))?;
                Cow::Owned(out)
            }
            other => return Err(Error::invalid(format!("unknown array encoding {}", other))),
        };

        if bytes.len() != expected {
            return Err(Error::invalid(format!(
                "array holds {} bytes, expected {}",
                bytes.len(),
                expected
            )));
        }
        Ok(bytes)
    }
}
