use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::RwLock;

use super::{FileSystem, FsKind};
use crate::{Error, Result};

/// Process-local in-memory store, served under `memory://`
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` at `path` directly
    pub fn insert(&self, path: &str, data: impl Into<Vec<u8>>) -> Result<()> {
        self.files
            .write()
            .map_err(|_| poisoned())?
            .insert(normalize(path), data.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

fn poisoned() -> Error {
    Error::Other(anyhow::anyhow!("memory filesystem lock poisoned"))
}

impl FileSystem for MemoryFileSystem {
    fn protocol(&self) -> &str {
        "memory"
    }

    fn kind(&self) -> FsKind<'_> {
        FsKind::Remote {
            protocol: self.protocol(),
        }
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let files = self.files.read().map_err(|_| poisoned())?;
        let data = files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| Error::NotFound(self.unstrip_protocol(path)))?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn exists(&self, path: &str) -> Result<bool> {
        let files = self.files.read().map_err(|_| poisoned())?;
        Ok(files.contains_key(&normalize(path)))
    }

    fn put(&self, local_path: &Path, path: &str) -> Result<()> {
        let data = std::fs::read(local_path)
            .map_err(|e| Error::from_io(e, &local_path.display().to_string()))?;
        self.insert(path, data)
    }

    fn remove(&self, path: &str) -> Result<()> {
        self.files
            .write()
            .map_err(|_| poisoned())?
            .remove(&normalize(path))
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(self.unstrip_protocol(path)))
    }

    fn unstrip_protocol(&self, path: &str) -> String {
        format!("memory://{}", normalize(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_open_remove() {
        let fs = MemoryFileSystem::new();
        fs.insert("/a/b.txt", "hi").unwrap();

        assert!(fs.exists("a/b.txt").unwrap());
        let mut buf = String::new();
        fs.open("a/b.txt").unwrap().read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "hi");

        fs.remove("a/b.txt").unwrap();
        assert!(fs.is_empty());
        assert!(matches!(fs.remove("a/b.txt"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_unstrip_protocol() {
        let fs = MemoryFileSystem::new();
        assert_eq!(fs.unstrip_protocol("/x/y"), "memory://x/y");
        assert_eq!(fs.kind(), FsKind::Remote { protocol: "memory" });
    }
}
