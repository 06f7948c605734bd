//! Icon cache for marker images.
//!
//! Many markers usually share a handful of icons. The cache decodes each icon
//! file once and hands out reference-counted copies, so all placemarks using
//! the same file share one image in memory.
//!
//! # Cache Key
//!
//! Icons are keyed by their resolved path. Paths are not canonicalized:
//! `a/../icon.png` and `icon.png` are distinct entries.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use tracing::debug;

use crate::error::SourceError;
use crate::placemark::Icon;

/// Default number of decoded icons to keep.
pub const DEFAULT_ICON_CACHE_CAPACITY: usize = 256;

/// LRU cache of decoded icons.
pub struct IconCache {
    cache: LruCache<PathBuf, Icon>,
    loads: usize,
}

impl Default for IconCache {
    fn default() -> Self {
        Self::new()
    }
}

impl IconCache {
    /// Create a cache with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ICON_CACHE_CAPACITY)
    }

    /// Create a cache holding up to `capacity` icons (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            loads: 0,
        }
    }

    /// Get the icon at `path`, decoding it on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Icon`] if the file cannot be opened or decoded.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Icon, SourceError> {
        if let Some(icon) = self.cache.get(path) {
            return Ok(Arc::clone(icon));
        }

        let image = image::open(path).map_err(|e| SourceError::Icon {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let icon: Icon = Arc::new(image.into_rgba8());
        self.loads += 1;

        debug!(
            "Loaded icon {} ({}x{})",
            path.display(),
            icon.width(),
            icon.height()
        );

        self.cache.put(path.to_path_buf(), Arc::clone(&icon));
        Ok(icon)
    }

    /// Insert an already decoded icon.
    pub fn insert(&mut self, path: impl Into<PathBuf>, icon: Icon) {
        self.cache.put(path.into(), icon);
    }

    /// Number of icons decoded from disk so far.
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}
