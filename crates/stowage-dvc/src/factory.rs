use stowage_core::{
    Artifact, ArtifactRecord, BackendFactory, Backends, Result, Storage, StorageRecord,
};

use crate::artifact::DvcArtifact;
use crate::storage::DvcStorage;

/// Registers the `dvc` record type
pub struct DvcFactory;

impl BackendFactory for DvcFactory {
    fn kind(&self) -> &'static str {
        DvcStorage::KIND
    }

    fn storage(&self, record: &StorageRecord, backends: &Backends) -> Result<Box<dyn Storage>> {
        Ok(Box::new(DvcStorage::new(record.uri.as_str(), backends)))
    }

    fn artifact(&self, record: &ArtifactRecord, backends: &Backends) -> Result<Box<dyn Artifact>> {
        Ok(Box::new(
            DvcArtifact::new(record.uri.as_str(), backends).with_info(record.info()),
        ))
    }
}
