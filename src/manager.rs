//! Per-converter engine state.

use std::path::{Path, PathBuf};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::options::ConvertOptions;
use crate::util::{Error, Result};

/// Engine state owned by exactly one [`Converter`](crate::Converter).
///
/// Holds the embedded-media directory hint and, when buffers are resolved
/// in parallel, the worker pool. Never shared between concurrent
/// conversions.
pub struct Manager {
    media_dir: Option<PathBuf>,
    pool: Option<ThreadPool>,
}

impl Manager {
    pub fn new(options: &ConvertOptions) -> Result<Self> {
        let media_dir = match &options.fbm_dir {
            Some(dir) if dir.is_dir() => Some(dir.clone()),
            Some(dir) => {
                debug!(dir = %dir.display(), "ignoring .fbm dir");
                options.log_warning("Failed to set .fbm dir");
                None
            }
            None => None,
        };

        let pool = if options.parallel_buffers {
            let pool = ThreadPoolBuilder::new()
                .num_threads(options.threads.unwrap_or(0))
                .thread_name(|i| format!("buffer-resolve-{}", i))
                .build()
                .map_err(|e| Error::Initialization(format!("failed to start buffer workers: {}", e)))?;
            debug!(threads = pool.current_num_threads(), "started buffer workers");
            Some(pool)
        } else {
            None
        };

        Ok(Self { media_dir, pool })
    }

    /// Embedded-media directory, if the configured one was usable.
    pub fn media_dir(&self) -> Option<&Path> {
        self.media_dir.as_deref()
    }

    /// Worker pool for parallel buffer resolution.
    pub fn pool(&self) -> Option<&ThreadPool> {
        self.pool.as_ref()
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("media_dir", &self.media_dir)
            .field("threads", &self.pool.as_ref().map(ThreadPool::current_num_threads))
            .finish()
    }
}
