//! Write side: where and how files are persisted

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::artifact::{Artifact, ArtifactInfo, FsArtifact, LocalArtifact};
use crate::fs::{FileSystem, FsKind, FsResolver, LocalFileSystem};
use crate::record::StorageRecord;
use crate::relocate::{Relocation, join_uri};
use crate::stream::ArtifactStream;
use crate::{Error, Result};

/// An open stream together with the artifact describing its location
#[derive(Debug)]
pub struct Opened {
    pub stream: ArtifactStream,
    pub artifact: Box<dyn Artifact>,
}

pub trait Storage: Send + Sync + fmt::Debug {
    /// Type tag used in records
    fn kind(&self) -> &'static str;

    fn uri(&self) -> &str;

    /// Persist `local_path` at `target_path` under this storage's root
    fn upload(&self, local_path: &Path, target_path: &str) -> Result<Box<dyn Artifact>>;

    /// Open an already persisted location for reading
    fn open(&self, path: &str) -> Result<Opened>;

    /// New storage rooted under `path` on `fs`, keeping this storage's kind
    fn relative(&self, fs: &Arc<dyn FileSystem>, path: &str) -> Box<dyn Storage>;

    fn record(&self) -> StorageRecord {
        StorageRecord::new(self.kind(), self.uri())
    }
}

/// Scoped helpers available on every storage
pub trait StorageExt: Storage {
    /// Run `f` against the opened location; the stream is closed on every exit path.
    fn with_open<R>(
        &self,
        path: &str,
        f: impl FnOnce(&mut ArtifactStream, &dyn Artifact) -> Result<R>,
    ) -> Result<R> {
        let Opened {
            mut stream,
            artifact,
        } = self.open(path)?;
        let result = f(&mut stream, artifact.as_ref());
        stream.close();
        result
    }
}

impl<T: Storage + ?Sized> StorageExt for T {}

fn ensure_source(local_path: &Path) -> Result<()> {
    if local_path.exists() {
        Ok(())
    } else {
        Err(Error::NotFound(local_path.display().to_string()))
    }
}

// Copying a file onto itself truncates it.
fn is_same_file(source: &Path, target: &Path) -> bool {
    match (source.canonicalize(), target.canonicalize()) {
        (Ok(source), Ok(target)) => source == target,
        _ => false,
    }
}

/// Directory on local disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalStorage {
    uri: String,
}

impl LocalStorage {
    pub const KIND: &'static str = "local";

    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Physical location of `path` under this storage
    pub fn location(&self, path: &str) -> String {
        join_uri(&self.uri, path)
    }

    /// Copy `local_path` into the storage, returning the plain local artifact
    pub fn upload_local(&self, local_path: &Path, target_path: &str) -> Result<LocalArtifact> {
        ensure_source(local_path)?;
        let info = ArtifactInfo::compute(local_path)?;
        let target = self.location(target_path);
        if is_same_file(local_path, Path::new(&target)) {
            tracing::debug!(target = %target, "source already in place, skipping copy");
        } else {
            LocalFileSystem.put(local_path, &target)?;
        }

        tracing::info!(
            source = %local_path.display(),
            target = %target,
            size = info.size,
            "uploaded artifact"
        );
        Ok(LocalArtifact::new(target).with_info(Some(info)))
    }

    pub fn open_local(&self, path: &str) -> Result<(ArtifactStream, LocalArtifact)> {
        let location = self.location(path);
        let reader = LocalFileSystem.open(&location)?;
        Ok((
            ArtifactStream::from_boxed(location.as_str(), reader),
            LocalArtifact::new(location),
        ))
    }

    /// Base relocation shared by every local-backed storage kind
    pub fn relocate(&self, fs: &Arc<dyn FileSystem>, path: &str) -> Relocation<dyn Storage> {
        let uri = join_uri(path, &self.uri);
        tracing::debug!(from = %self.uri, to = %uri, protocol = fs.protocol(), "relocating storage");

        match fs.kind() {
            FsKind::Local => Relocation::Generic(uri),
            _ => Relocation::AlreadySpecialized(Box::new(FsStorage::new(fs.clone(), uri))),
        }
    }
}

impl Storage for LocalStorage {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn upload(&self, local_path: &Path, target_path: &str) -> Result<Box<dyn Artifact>> {
        Ok(Box::new(self.upload_local(local_path, target_path)?))
    }

    fn open(&self, path: &str) -> Result<Opened> {
        let (stream, artifact) = self.open_local(path)?;
        Ok(Opened {
            stream,
            artifact: Box::new(artifact),
        })
    }

    fn relative(&self, fs: &Arc<dyn FileSystem>, path: &str) -> Box<dyn Storage> {
        match self.relocate(fs, path) {
            Relocation::Generic(uri) => Box::new(LocalStorage::new(uri)),
            Relocation::AlreadySpecialized(storage) => storage,
        }
    }
}

/// Directory on an arbitrary (non-local) filesystem
#[derive(Debug, Clone)]
pub struct FsStorage {
    uri: String,
    base_path: String,
    fs: Arc<dyn FileSystem>,
}

impl FsStorage {
    pub const KIND: &'static str = "fsspec";

    pub fn new(fs: Arc<dyn FileSystem>, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        Self {
            uri: fs.unstrip_protocol(&base_path),
            base_path,
            fs,
        }
    }

    pub fn from_uri(resolver: &dyn FsResolver, uri: &str) -> Result<Self> {
        let (fs, path) = resolver.resolve(uri)?;
        Ok(Self::new(fs, path))
    }
}

impl Storage for FsStorage {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn upload(&self, local_path: &Path, target_path: &str) -> Result<Box<dyn Artifact>> {
        ensure_source(local_path)?;
        let info = ArtifactInfo::compute(local_path)?;
        let path = join_uri(&self.base_path, target_path);
        self.fs.put(local_path, &path)?;

        let artifact = FsArtifact::new(self.fs.clone(), path).with_info(Some(info));
        tracing::info!(source = %local_path.display(), target = %artifact.uri(), "uploaded artifact");
        Ok(Box::new(artifact))
    }

    fn open(&self, path: &str) -> Result<Opened> {
        let path = join_uri(&self.base_path, path);
        let reader = self.fs.open(&path)?;
        let artifact = FsArtifact::new(self.fs.clone(), path);

        Ok(Opened {
            stream: ArtifactStream::from_boxed(artifact.uri(), reader),
            artifact: Box::new(artifact),
        })
    }

    // The uri is fully qualified, so relocation leaves it in place.
    fn relative(&self, _fs: &Arc<dyn FileSystem>, _path: &str) -> Box<dyn Storage> {
        Box::new(self.clone())
    }
}
