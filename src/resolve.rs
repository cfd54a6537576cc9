//! Buffer and image reference resolution.
//!
//! Every buffer descriptor leaves this stage with a `uri`: whatever the
//! configured [`BufferWriter`] returned, or an inline `data:` URI when the
//! writer abstained, was skipped, or is absent. The reference for buffer
//! `i` depends only on its payload, `i`, the buffer count and the options,
//! so buffers may be resolved in any order or concurrently.

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info_span, trace};

use crate::document::{BufferBlob, Document};
use crate::options::ConvertOptions;
use crate::util::{encode_data_uri, Error, Result};
use crate::writer::BufferWriter;

/// Resolves buffer payloads to final references.
pub struct BufferResolver<'a> {
    writer: &'a dyn BufferWriter,
    inline_only: bool,
}

impl<'a> BufferResolver<'a> {
    pub fn new(writer: &'a dyn BufferWriter, inline_only: bool) -> Self {
        Self { writer, inline_only }
    }

    /// Resolver for a conversion's options.
    pub fn from_options(options: &'a ConvertOptions) -> Self {
        Self::new(options.effective_writer(), options.use_inline_encoding_for_buffers)
    }

    /// Reference for one buffer out of `count`.
    ///
    /// The writer is consulted at most once. A writer error is returned as
    /// [`Error::Writer`] and never falls back to inline encoding.
    pub fn resolve_one(&self, data: &[u8], index: u32, count: usize) -> Result<String> {
        if !self.inline_only {
            let written = self
                .writer
                .write_buffer(data, index, count != 1)
                .map_err(|source| Error::Writer { index, source })?;
            if let Some(uri) = written {
                trace!(index, %uri, "buffer written externally");
                return Ok(uri);
            }
        }
        trace!(index, len = data.len(), "buffer encoded inline");
        Ok(encode_data_uri(data))
    }

    /// Resolve every buffer in index order on the calling thread.
    pub fn resolve(&self, document: &mut Document, blobs: &[BufferBlob]) -> Result<()> {
        let _span = info_span!("resolve_buffers", count = blobs.len()).entered();
        check_alignment(document, blobs)?;

        let count = blobs.len();
        for (index, (descriptor, blob)) in document.buffers.iter_mut().zip(blobs).enumerate() {
            descriptor.uri = Some(self.resolve_one(blob, index as u32, count)?);
        }
        debug!(count, "resolved buffers");
        Ok(())
    }

    /// Resolve every buffer on `pool`.
    ///
    /// All buffers run to completion; references are assigned by index and
    /// the error of the lowest failing index is returned. On error no
    /// descriptor is modified.
    pub fn resolve_on(&self, pool: &ThreadPool, document: &mut Document, blobs: &[BufferBlob]) -> Result<()> {
        let _span = info_span!("resolve_buffers", count = blobs.len(), parallel = true).entered();
        check_alignment(document, blobs)?;

        let count = blobs.len();
        let results: Vec<Result<String>> = pool.install(|| {
            blobs
                .par_iter()
                .enumerate()
                .map(|(index, blob)| self.resolve_one(blob, index as u32, count))
                .collect()
        });

        let uris = results.into_iter().collect::<Result<Vec<_>>>()?;
        for (descriptor, uri) in document.buffers.iter_mut().zip(uris) {
            descriptor.uri = Some(uri);
        }
        debug!(count, "resolved buffers");
        Ok(())
    }
}

fn check_alignment(document: &Document, blobs: &[BufferBlob]) -> Result<()> {
    if document.buffers.len() != blobs.len() {
        return Err(Error::BufferCountMismatch {
            descriptors: document.buffers.len(),
            blobs: blobs.len(),
        });
    }
    Ok(())
}

/// Image pass. Leaves every image descriptor unchanged; external image
/// writing would slot in here, mirroring buffer resolution.
pub fn resolve_images(document: &mut Document, _options: &ConvertOptions) {
    let _span = info_span!("resolve_images", count = document.images.len()).entered();
    for (index, image) in document.images.iter_mut().enumerate() {
        trace!(index, uri = image.uri.as_deref().unwrap_or(""), "image kept");
    }
}
