use std::path::Path;
use std::sync::Arc;

use stowage_core::{
    Artifact, Backends, FileSystem, LocalArtifact, LocalStorage, Opened, Relocation, Result,
    Storage,
};

use crate::artifact::DvcArtifact;

/// Local storage whose artifacts are resolved through dvc
#[derive(Debug, Clone)]
pub struct DvcStorage {
    local: LocalStorage,
    backends: Backends,
}

impl DvcStorage {
    pub const KIND: &'static str = "dvc";

    pub fn new(uri: impl Into<String>, backends: &Backends) -> Self {
        Self {
            local: LocalStorage::new(uri),
            backends: backends.clone(),
        }
    }

    fn wrap(&self, artifact: LocalArtifact) -> DvcArtifact {
        DvcArtifact::new(artifact.uri(), &self.backends).with_info(artifact.info().cloned())
    }
}

impl Storage for DvcStorage {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn uri(&self) -> &str {
        self.local.uri()
    }

    fn upload(&self, local_path: &Path, target_path: &str) -> Result<Box<dyn Artifact>> {
        let artifact = self.local.upload_local(local_path, target_path)?;
        Ok(Box::new(self.wrap(artifact)))
    }

    fn open(&self, path: &str) -> Result<Opened> {
        let (stream, artifact) = self.local.open_local(path)?;
        Ok(Opened {
            stream,
            artifact: Box::new(self.wrap(artifact)),
        })
    }

    fn relative(&self, fs: &Arc<dyn FileSystem>, path: &str) -> Box<dyn Storage> {
        match self.local.relocate(fs, path) {
            Relocation::Generic(uri) => Box::new(DvcStorage::new(uri, &self.backends)),
            Relocation::AlreadySpecialized(storage) => storage,
        }
    }
}
