//! External buffer writers.
//!
//! A [`BufferWriter`] may persist a buffer outside the document and return
//! the reference to store in its `uri`, or abstain by returning `Ok(None)`.
//! Abstention sends the buffer to inline `data:` encoding; an `Err` fails
//! the whole conversion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

/// Persists buffer payloads outside the output document.
pub trait BufferWriter: Send + Sync {
    /// Write buffer `index`. `multiple` is true when the document holds
    /// more than one buffer.
    fn write_buffer(&self, data: &[u8], index: u32, multiple: bool) -> io::Result<Option<String>>;
}

impl<F> BufferWriter for F
where
    F: Fn(&[u8], u32, bool) -> io::Result<Option<String>> + Send + Sync,
{
    fn write_buffer(&self, data: &[u8], index: u32, multiple: bool) -> io::Result<Option<String>> {
        self(data, index, multiple)
    }
}

/// Writer used when none is configured: always abstains.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultWriter;

impl BufferWriter for DefaultWriter {
    fn write_buffer(&self, _data: &[u8], _index: u32, _multiple: bool) -> io::Result<Option<String>> {
        Ok(None)
    }
}

/// Writes buffers as `.bin` sidecar files next to the output document.
///
/// A lone buffer is written as `<stem>.bin`; with several buffers each one
/// gets `<stem>-<index>.bin`. The returned URI is the bare file name.
#[derive(Debug)]
pub struct FileWriter {
    dir: PathBuf,
    stem: String,
    min_size: usize,
    written: Mutex<Vec<PathBuf>>,
}

impl FileWriter {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
            min_size: 0,
            written: Mutex::new(Vec::new()),
        }
    }

    /// Writer for an output document path: same directory, same stem.
    pub fn for_output(output: &Path) -> Self {
        let dir = output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "buffer".to_string());
        Self::new(dir, stem)
    }

    /// Abstain for buffers shorter than `min_size` bytes.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// File name used for buffer `index`.
    pub fn file_name(&self, index: u32, multiple: bool) -> String {
        if multiple {
            format!("{}-{}.bin", self.stem, index)
        } else {
            format!("{}.bin", self.stem)
        }
    }

    /// Paths written so far, in completion order.
    pub fn written(&self) -> Vec<PathBuf> {
        self.written.lock().clone()
    }
}

impl BufferWriter for FileWriter {
    fn write_buffer(&self, data: &[u8], index: u32, multiple: bool) -> io::Result<Option<String>> {
        if data.len() < self.min_size {
            debug!(index, len = data.len(), "buffer below external size threshold");
            return Ok(None);
        }

        let name = self.file_name(index, multiple);
        let path = self.dir.join(&name);
        fs::write(&path, data)?;
        debug!(index, path = %path.display(), "wrote external buffer");

        self.written.lock().push(path);
        Ok(Some(name))
    }
}
