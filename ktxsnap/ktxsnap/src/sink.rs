//! Output sinks for converted images.
//!
//! A sink receives encoded PNG bytes under a name assigned by the batch
//! layer. Names are unique within a batch, so sinks never need to arbitrate
//! between concurrent writers of the same name.
//!
//! # Implementations
//!
//! - [`DirectorySink`]: Writes each image to a file in a directory
//! - [`MemorySink`]: Keeps images in memory
//! - [`NoSink`]: Discards everything (dry runs)

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crate::error::{Error, Result};

/// A destination for converted images.
pub trait ImageSink: Send + Sync {
    /// Store an encoded image under `name`.
    fn put(&self, name: &str, png: Vec<u8>) -> Result<()>;

    /// Check whether an image with this name has been stored.
    fn contains(&self, name: &str) -> bool;
}

/// A sink that stores nothing.
#[derive(Debug, Clone, Default)]
pub struct NoSink;

impl NoSink {
    /// Create a new no-op sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ImageSink for NoSink {
    fn put(&self, _name: &str, _png: Vec<u8>) -> Result<()> {
        Ok(())
    }

    fn contains(&self, _name: &str) -> bool {
        false
    }
}

/// An in-memory sink.
///
/// Clones share the same storage, so a clone handed to a converter can be
/// inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    images: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemorySink {
    /// Create an empty memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of a stored image.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.images
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Number of stored images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Check if the sink is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImageSink for MemorySink {
    fn put(&self, name: &str, png: Vec<u8>) -> Result<()> {
        self.images
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(name.to_string(), png);
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.images
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains_key(name)
    }
}

/// A sink that writes each image to `<root>/<name>`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `root`, creating the directory if needed.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| Error::io("create directory", &root, &e))?;
        Ok(Self { root })
    }

    /// The output directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path an image with this name is written to.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl ImageSink for DirectorySink {
    fn put(&self, name: &str, png: Vec<u8>) -> Result<()> {
        let path = self.path_for(name);
        fs::write(&path, png).map_err(|e| Error::io("write", &path, &e))
    }

    fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sink() {
        let sink = NoSink::new();
        sink.put("a.png", vec![1, 2, 3]).unwrap();
        assert!(!sink.contains("a.png"));
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        let shared = sink.clone();
        shared.put("a.png", vec![1, 2, 3]).unwrap();

        assert_eq!(sink.len(), 1);
        assert!(sink.contains("a.png"));
        assert!(!sink.contains("b.png"));
        assert_eq!(sink.get("a.png"), Some(vec![1, 2, 3]));

        // Overwrite.
        sink.put("a.png", vec![4]).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.get("a.png"), Some(vec![4]));
    }

    #[test]
    fn test_directory_sink() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::create(dir.path().join("snapshots")).unwrap();
        assert!(sink.root().is_dir());

        sink.put("a.png", vec![9, 9]).unwrap();
        assert!(sink.contains("a.png"));
        assert_eq!(fs::read(sink.path_for("a.png")).unwrap(), vec![9, 9]);
    }

    #[test]
    fn test_directory_sink_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::create(dir.path()).unwrap();
        let result = sink.put("missing/a.png", vec![1]);
        assert!(matches!(result, Err(Error::Io { operation: "write", .. })));
    }
}
