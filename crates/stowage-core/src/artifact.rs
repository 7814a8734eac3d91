//! Read side: self-sufficient pointers to one persisted file

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::fs::{FileSystem, FsKind, FsResolver, LocalFileSystem};
use crate::record::ArtifactRecord;
use crate::relocate::{Relocation, base_name, join_uri};
use crate::stream::ArtifactStream;
use crate::{Error, Result};

/// Size and content hash recorded when a file is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub size: u64,
    pub hash: String,
}

impl ArtifactInfo {
    /// Size and blake3 hash of a local file
    pub fn compute(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).map_err(|e| Error::from_io(e, &path.display().to_string()))?;
        let mut hasher = blake3::Hasher::new();
        let size = io::copy(&mut file, &mut hasher)?;

        Ok(Self {
            size,
            hash: hasher.finalize().to_hex().to_string(),
        })
    }
}

pub trait Artifact: Send + Sync + fmt::Debug {
    /// Type tag used in records
    fn kind(&self) -> &'static str;

    fn uri(&self) -> &str;

    fn info(&self) -> Option<&ArtifactInfo>;

    /// Materialize the artifact at `target_path`.
    ///
    /// If `target_path` is an existing directory the artifact's base name is
    /// appended to it.
    fn download(&self, target_path: &Path) -> Result<LocalArtifact>;

    /// Stream the artifact's bytes without materializing them
    fn open(&self) -> Result<ArtifactStream>;

    /// Relocate under `path` on `fs`, keeping this artifact's kind
    fn relative(&self, fs: &Arc<dyn FileSystem>, path: &str) -> Box<dyn Artifact>;

    fn exists(&self) -> Result<bool>;

    fn remove(&self) -> Result<()>;

    fn record(&self) -> ArtifactRecord {
        ArtifactRecord::new(self.kind(), self.uri(), self.info().cloned())
    }
}

/// Scoped helpers available on every artifact
pub trait ArtifactExt: Artifact {
    /// Run `f` against an open stream; the stream is closed on every exit path.
    fn with_stream<R>(&self, f: impl FnOnce(&mut ArtifactStream) -> Result<R>) -> Result<R> {
        let mut stream = self.open()?;
        let result = f(&mut stream);
        stream.close();
        result
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        self.with_stream(|stream| {
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf)?;
            Ok(buf)
        })
    }
}

impl<T: Artifact + ?Sized> ArtifactExt for T {}

/// Local file a download of `source` into `target_path` lands in.
///
/// An existing directory gets the base name of `source` appended. Missing
/// parent directories are created.
pub fn download_target(source: &str, target_path: &Path) -> Result<PathBuf> {
    let target = if target_path.is_dir() {
        target_path.join(base_name(source))
    } else {
        target_path.to_path_buf()
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(target)
}

/// Copy `reader` to a local file, returning the path actually written
pub(crate) fn copy_to_local(
    mut reader: impl Read,
    source: &str,
    target_path: &Path,
) -> Result<PathBuf> {
    let target = download_target(source, target_path)?;
    let mut file = File::create(&target)?;
    io::copy(&mut reader, &mut file)?;
    Ok(target)
}

/// File on local disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    uri: String,
    info: Option<ArtifactInfo>,
}

impl LocalArtifact {
    pub const KIND: &'static str = "local";

    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            info: None,
        }
    }

    pub fn with_info(mut self, info: Option<ArtifactInfo>) -> Self {
        self.info = info;
        self
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.uri)
    }

    /// Base relocation shared by every local-backed artifact kind
    pub fn relocate(&self, fs: &Arc<dyn FileSystem>, path: &str) -> Relocation<dyn Artifact> {
        let uri = join_uri(path, &self.uri);
        tracing::debug!(from = %self.uri, to = %uri, protocol = fs.protocol(), "relocating artifact");

        match fs.kind() {
            FsKind::Local => Relocation::Generic(uri),
            _ => Relocation::AlreadySpecialized(Box::new(
                FsArtifact::new(fs.clone(), uri).with_info(self.info.clone()),
            )),
        }
    }
}

impl Artifact for LocalArtifact {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn info(&self) -> Option<&ArtifactInfo> {
        self.info.as_ref()
    }

    fn download(&self, target_path: &Path) -> Result<LocalArtifact> {
        let reader = LocalFileSystem.open(&self.uri)?;
        let target = copy_to_local(reader, &self.uri, target_path)?;
        tracing::info!(uri = %self.uri, target = %target.display(), "downloaded artifact");

        Ok(LocalArtifact::new(target.to_string_lossy()).with_info(self.info.clone()))
    }

    fn open(&self) -> Result<ArtifactStream> {
        Ok(ArtifactStream::from_boxed(
            self.uri.as_str(),
            LocalFileSystem.open(&self.uri)?,
        ))
    }

    fn relative(&self, fs: &Arc<dyn FileSystem>, path: &str) -> Box<dyn Artifact> {
        match self.relocate(fs, path) {
            Relocation::Generic(uri) => {
                Box::new(LocalArtifact::new(uri).with_info(self.info.clone()))
            }
            Relocation::AlreadySpecialized(artifact) => artifact,
        }
    }

    fn exists(&self) -> Result<bool> {
        LocalFileSystem.exists(&self.uri)
    }

    fn remove(&self) -> Result<()> {
        LocalFileSystem.remove(&self.uri)
    }
}

/// File on an arbitrary (non-local) filesystem
#[derive(Debug, Clone)]
pub struct FsArtifact {
    uri: String,
    path: String,
    fs: Arc<dyn FileSystem>,
    info: Option<ArtifactInfo>,
}

impl FsArtifact {
    pub const KIND: &'static str = "fsspec";

    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            uri: fs.unstrip_protocol(&path),
            path,
            fs,
            info: None,
        }
    }

    pub fn from_uri(resolver: &dyn FsResolver, uri: &str) -> Result<Self> {
        let (fs, path) = resolver.resolve(uri)?;
        Ok(Self::new(fs, path))
    }

    pub fn with_info(mut self, info: Option<ArtifactInfo>) -> Self {
        self.info = info;
        self
    }
}

impl Artifact for FsArtifact {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn info(&self) -> Option<&ArtifactInfo> {
        self.info.as_ref()
    }

    fn download(&self, target_path: &Path) -> Result<LocalArtifact> {
        let reader = self.fs.open(&self.path)?;
        let target = copy_to_local(reader, &self.path, target_path)?;
        tracing::info!(uri = %self.uri, target = %target.display(), "downloaded artifact");

        Ok(LocalArtifact::new(target.to_string_lossy()).with_info(self.info.clone()))
    }

    fn open(&self) -> Result<ArtifactStream> {
        Ok(ArtifactStream::from_boxed(
            self.uri.as_str(),
            self.fs.open(&self.path)?,
        ))
    }

    // The uri is fully qualified, so relocation leaves it in place.
    fn relative(&self, _fs: &Arc<dyn FileSystem>, _path: &str) -> Box<dyn Artifact> {
        Box::new(self.clone())
    }

    fn exists(&self) -> Result<bool> {
        self.fs.exists(&self.path)
    }

    fn remove(&self) -> Result<()> {
        self.fs.remove(&self.path)
    }
}
