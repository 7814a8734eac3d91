use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use super::{FileSystem, FsKind, FsResolver};
use crate::{Error, Result};

/// Local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn protocol(&self) -> &str {
        "file"
    }

    fn kind(&self) -> FsKind<'_> {
        FsKind::Local
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let file = File::open(path).map_err(|e| Error::from_io(e, path))?;
        Ok(Box::new(file))
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(Path::new(path).exists())
    }

    fn put(&self, local_path: &Path, path: &str) -> Result<()> {
        if !local_path.exists() {
            return Err(Error::NotFound(local_path.display().to_string()));
        }

        let target = Path::new(path);
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local_path, target).map_err(|e| Error::from_io(e, path))?;
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<()> {
        fs::remove_file(path).map_err(|e| Error::from_io(e, path))
    }

    fn unstrip_protocol(&self, path: &str) -> String {
        path.to_string()
    }
}

/// Resolver that only understands local paths (`file://` or bare)
#[derive(Debug, Clone, Default)]
pub struct LocalResolver;

impl FsResolver for LocalResolver {
    fn resolve(&self, uri: &str) -> Result<(Arc<dyn FileSystem>, String)> {
        let path = if let Some(stripped) = uri.strip_prefix("file://") {
            stripped
        } else if uri.contains("://") {
            return Err(Error::UnsupportedSource(format!(
                "Only local paths can be resolved here: {}",
                uri
            )));
        } else {
            uri
        };

        Ok((Arc::new(LocalFileSystem), path.to_string()))
    }
}
