use std::path::Path;
use std::sync::Arc;

use stowage_core::{
    Artifact, ArtifactInfo, ArtifactStream, Backends, Error, FileSystem, FsKind, LocalArtifact,
    Relocation, Result, download_target,
};

/// Pointer to a dvc-tracked file
#[derive(Debug, Clone)]
pub struct DvcArtifact {
    local: LocalArtifact,
    backends: Backends,
}

impl DvcArtifact {
    pub const KIND: &'static str = "dvc";

    pub fn new(uri: impl Into<String>, backends: &Backends) -> Self {
        Self {
            local: LocalArtifact::new(uri),
            backends: backends.clone(),
        }
    }

    pub fn with_info(mut self, info: Option<ArtifactInfo>) -> Self {
        self.local = self.local.with_info(info);
        self
    }

    fn unsupported(&self, protocol: &str) -> Error {
        tracing::warn!(uri = %self.uri(), protocol, "dvc-tracked repository kind not supported");
        Error::UnsupportedSource(format!(
            "dvc-tracked files in {} repositories are not supported: {}",
            protocol,
            self.uri()
        ))
    }
}

impl Artifact for DvcArtifact {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn uri(&self) -> &str {
        self.local.uri()
    }

    fn info(&self) -> Option<&ArtifactInfo> {
        self.local.info()
    }

    fn download(&self, target_path: &Path) -> Result<LocalArtifact> {
        let target = download_target(self.uri(), target_path)?;
        self.backends.reference.get_url(self.uri(), &target)?;
        tracing::info!(uri = %self.uri(), target = %target.display(), "downloaded dvc artifact");

        Ok(LocalArtifact::new(target.to_string_lossy()).with_info(self.info().cloned()))
    }

    fn open(&self) -> Result<ArtifactStream> {
        let (fs, path) = self.backends.resolver.resolve(self.uri())?;

        let reader = match fs.kind() {
            FsKind::GitHub(location) => {
                let repo = location.clone_url();
                let rev = location.decoded_root();
                tracing::debug!(path = %path, repo = %repo, rev = %rev, "opening through reference resolver");
                self.backends.reference.open(&path, &repo, &rev)?
            }
            FsKind::Repository { protocol } => return Err(self.unsupported(protocol)),
            FsKind::Local | FsKind::Remote { .. } => fs.open(&path)?,
        };

        Ok(ArtifactStream::from_boxed(self.uri(), reader))
    }

    fn relative(&self, fs: &Arc<dyn FileSystem>, path: &str) -> Box<dyn Artifact> {
        match self.local.relocate(fs, path) {
            Relocation::Generic(uri) => {
                Box::new(DvcArtifact::new(uri, &self.backends).with_info(self.info().cloned()))
            }
            Relocation::AlreadySpecialized(artifact) => artifact,
        }
    }

    /// Existence of local and remote files.
    ///
    /// Files hosted in a repository, GitHub included, have no existence check
    /// through the reference resolver and fail with `UnsupportedSource`.
    fn exists(&self) -> Result<bool> {
        let (fs, path) = self.backends.resolver.resolve(self.uri())?;

        match fs.kind() {
            FsKind::Local | FsKind::Remote { .. } => fs.exists(&path),
            FsKind::GitHub(_) => Err(self.unsupported(fs.protocol())),
            FsKind::Repository { protocol } => Err(self.unsupported(protocol)),
        }
    }

    fn remove(&self) -> Result<()> {
        let (fs, path) = self.backends.resolver.resolve(self.uri())?;
        fs.remove(&path)
    }
}
