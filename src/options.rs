//! Conversion options and the pluggable diagnostics sink.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::writer::{BufferWriter, DefaultWriter};

/// Tool name stamped into every document's `asset.generator`.
pub const GENERATOR: &str = "FBX-glTF-conv";

/// Copyright stamped into every document's `asset.copyright`.
pub const COPYRIGHT: &str = "Copyright (c) 2018-2020 Chukong Technologies Inc.";

/// Severity of a diagnostic message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Emitted only when [`ConvertOptions::verbose`] is set.
    Verbose,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Verbose => "verbose",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// Diagnostics sink. Side-effecting only; never influences control flow.
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

impl<F> Logger for F
where
    F: Fn(LogLevel, &str) + Send + Sync,
{
    fn log(&self, level: LogLevel, message: &str) {
        self(level, message)
    }
}

/// Default logger: forwards every message to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Verbose => tracing::debug!(target: "fbx_gltf_conv", "{}", message),
            LogLevel::Info => tracing::info!(target: "fbx_gltf_conv", "{}", message),
            LogLevel::Warning => tracing::warn!(target: "fbx_gltf_conv", "{}", message),
            LogLevel::Error => tracing::error!(target: "fbx_gltf_conv", "{}", message),
        }
    }
}

/// Options for a single conversion.
#[derive(Clone)]
pub struct ConvertOptions {
    /// Directory holding the source's extracted embedded media (`.fbm`).
    pub fbm_dir: Option<PathBuf>,
    pub logger: Arc<dyn Logger>,
    /// Emit [`LogLevel::Verbose`] diagnostics.
    pub verbose: bool,
    /// Encode every buffer as a `data:` URI and never call the writer.
    pub use_inline_encoding_for_buffers: bool,
    /// External buffer writer; [`DefaultWriter`] is used when absent.
    pub writer: Option<Arc<dyn BufferWriter>>,
    /// Resolve buffers on a dedicated worker pool.
    pub parallel_buffers: bool,
    /// Worker pool size, `None` for the rayon default.
    pub threads: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            fbm_dir: None,
            logger: Arc::new(TracingLogger),
            verbose: false,
            use_inline_encoding_for_buffers: false,
            writer: None,
            parallel_buffers: false,
            threads: None,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fbm_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fbm_dir = Some(dir.into());
        self
    }

    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_inline_buffers(mut self, inline: bool) -> Self {
        self.use_inline_encoding_for_buffers = inline;
        self
    }

    pub fn with_writer(mut self, writer: impl BufferWriter + 'static) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    /// Share an existing writer, e.g. to inspect it after conversion.
    pub fn with_shared_writer(mut self, writer: Arc<dyn BufferWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn with_parallel_buffers(mut self, parallel: bool) -> Self {
        self.parallel_buffers = parallel;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// The configured writer, or the abstaining default.
    pub fn effective_writer(&self) -> &dyn BufferWriter {
        match &self.writer {
            Some(writer) => writer.as_ref(),
            None => &DefaultWriter,
        }
    }

    /// Emit a verbose diagnostic if verbose output is enabled.
    pub fn log_verbose(&self, message: impl AsRef<str>) {
        if self.verbose {
            self.logger.log(LogLevel::Verbose, message.as_ref());
        }
    }

    pub fn log_warning(&self, message: impl AsRef<str>) {
        self.logger.log(LogLevel::Warning, message.as_ref());
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("fbm_dir", &self.fbm_dir)
            .field("verbose", &self.verbose)
            .field("use_inline_encoding_for_buffers", &self.use_inline_encoding_for_buffers)
            .field("writer", &self.writer.as_ref().map(|_| "<custom>"))
            .field("parallel_buffers", &self.parallel_buffers)
            .field("threads", &self.threads)
            .finish_non_exhaustive()
    }
}
