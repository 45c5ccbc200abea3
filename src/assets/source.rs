//! Byte-level asset sources
//!
//! Asset paths are web-style (`/models/optimized-room.glb`). Every source
//! normalizes them with [`normalize_path`] before touching its storage, so
//! `/a/b.png`, `a/b.png` and `a//b.png` address the same asset.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{AssetError, AssetResult};

/// A boxed, `Send` future returning an [`AssetResult`].
///
/// Fetching an asset may suspend; the caller decides which executor drives
/// the future.
pub type AssetFuture<T> = Pin<Box<dyn Future<Output = AssetResult<T>> + Send>>;

/// Trait for asset storage backends.
pub trait AssetSource: Send + Sync + 'static {
    /// Read the entire contents of the asset at the given path.
    fn read(&self, path: &str) -> AssetFuture<Vec<u8>>;

    /// Check whether an asset exists at the given path.
    fn exists(&self, path: &str) -> AssetFuture<bool>;
}

/// Normalize an asset path.
///
/// - Replaces backslashes with forward slashes
/// - Collapses redundant separators and drops `.` segments
/// - Strips leading and trailing slashes
///
/// Empty paths and `..` segments are rejected.
pub fn normalize_path(path: &str) -> AssetResult<String> {
    let replaced = path.replace('\\', "/");
    let mut segments = Vec::new();

    for segment in replaced.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            return Err(AssetError::InvalidPath(path.to_string()));
        }
        segments.push(segment);
    }

    if segments.is_empty() {
        return Err(AssetError::InvalidPath(path.to_string()));
    }

    Ok(segments.join("/"))
}

/// Reads assets from a directory on disk (the site's public root).
///
/// I/O is blocking `std::fs` inside the returned futures.
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    /// Create a source rooted at the given directory.
    ///
    /// The directory is only checked when an asset is read.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> AssetResult<PathBuf> {
        Ok(self.root.join(normalize_path(path)?))
    }
}

impl AssetSource for FileSystemSource {
    fn read(&self, path: &str) -> AssetFuture<Vec<u8>> {
        let display = path.to_string();
        let resolved = self.resolve(path);
        Box::pin(async move {
            let full_path = resolved?;
            std::fs::read(&full_path).map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    AssetError::NotFound(display)
                } else {
                    AssetError::Io {
                        path: display,
                        source,
                    }
                }
            })
        })
    }

    fn exists(&self, path: &str) -> AssetFuture<bool> {
        let resolved = self.resolve(path);
        Box::pin(async move { Ok(resolved?.is_file()) })
    }
}

/// In-memory asset source for tests and embedded assets.
///
/// Cloning shares the underlying storage. Every successful or failed read is
/// counted per normalized path, so callers can check how often the loading
/// layer actually went to the source.
#[derive(Clone, Default)]
pub struct MemorySource {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    reads: Arc<Mutex<HashMap<String, usize>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an asset, overwriting any existing one at the same path.
    pub fn insert(&self, path: &str, data: Vec<u8>) -> AssetResult<()> {
        let key = normalize_path(path)?;
        self.files.lock().insert(key, data);
        Ok(())
    }

    /// Remove an asset, returning its data if it existed.
    pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
        let key = normalize_path(path).ok()?;
        self.files.lock().remove(&key)
    }

    /// Number of `read` calls issued for the given path.
    pub fn read_count(&self, path: &str) -> usize {
        normalize_path(path)
            .ok()
            .and_then(|key| self.reads.lock().get(&key).copied())
            .unwrap_or(0)
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> AssetFuture<Vec<u8>> {
        let files = self.files.clone();
        let reads = self.reads.clone();
        let path = path.to_owned();
        Box::pin(async move {
            let key = normalize_path(&path)?;
            *reads.lock().entry(key.clone()).or_insert(0) += 1;
            let data = files.lock().get(&key).cloned();
            data.ok_or(AssetError::NotFound(path))
        })
    }

    fn exists(&self, path: &str) -> AssetFuture<bool> {
        let files = self.files.clone();
        let path = path.to_owned();
        Box::pin(async move {
            let key = normalize_path(&path)?;
            let present = files.lock().contains_key(&key);
            Ok(present)
        })
    }
}
