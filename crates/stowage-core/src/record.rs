//! Declarative records and the registry that turns them into live values

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::artifact::{Artifact, ArtifactInfo, FsArtifact, LocalArtifact};
use crate::fs::{FsResolver, LocalResolver};
use crate::reference::{NoReferenceResolver, ReferenceResolver};
use crate::storage::{FsStorage, LocalStorage, Storage};
use crate::{Error, Result};

/// Serializable description of a storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub uri: String,
}

impl StorageRecord {
    pub fn new(kind: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            uri: uri.into(),
        }
    }
}

impl Default for StorageRecord {
    fn default() -> Self {
        Self::new(LocalStorage::KIND, "")
    }
}

/// Serializable description of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl ArtifactRecord {
    pub fn new(kind: impl Into<String>, uri: impl Into<String>, info: Option<ArtifactInfo>) -> Self {
        let (size, hash) = match info {
            Some(info) => (Some(info.size), Some(info.hash)),
            None => (None, None),
        };

        Self {
            kind: kind.into(),
            uri: uri.into(),
            size,
            hash,
        }
    }

    pub fn info(&self) -> Option<ArtifactInfo> {
        match (self.size, &self.hash) {
            (Some(size), Some(hash)) => Some(ArtifactInfo {
                size,
                hash: hash.clone(),
            }),
            _ => None,
        }
    }
}

/// Collaborators injected into every value built from a record
#[derive(Debug, Clone)]
pub struct Backends {
    pub resolver: Arc<dyn FsResolver>,
    pub reference: Arc<dyn ReferenceResolver>,
}

impl Backends {
    pub fn new(resolver: Arc<dyn FsResolver>, reference: Arc<dyn ReferenceResolver>) -> Self {
        Self {
            resolver,
            reference,
        }
    }

    /// Local paths only, no reference resolution
    pub fn local() -> Self {
        Self::new(Arc::new(LocalResolver), Arc::new(NoReferenceResolver))
    }
}

/// Builds storages and artifacts of one kind
pub trait BackendFactory: Send + Sync {
    fn kind(&self) -> &'static str;

    fn storage(&self, record: &StorageRecord, backends: &Backends) -> Result<Box<dyn Storage>>;

    fn artifact(&self, record: &ArtifactRecord, backends: &Backends) -> Result<Box<dyn Artifact>>;
}

struct LocalFactory;

impl BackendFactory for LocalFactory {
    fn kind(&self) -> &'static str {
        LocalStorage::KIND
    }

    fn storage(&self, record: &StorageRecord, _backends: &Backends) -> Result<Box<dyn Storage>> {
        Ok(Box::new(LocalStorage::new(record.uri.as_str())))
    }

    fn artifact(&self, record: &ArtifactRecord, _backends: &Backends) -> Result<Box<dyn Artifact>> {
        Ok(Box::new(
            LocalArtifact::new(record.uri.as_str()).with_info(record.info()),
        ))
    }
}

struct FsFactory;

impl BackendFactory for FsFactory {
    fn kind(&self) -> &'static str {
        FsStorage::KIND
    }

    fn storage(&self, record: &StorageRecord, backends: &Backends) -> Result<Box<dyn Storage>> {
        Ok(Box::new(FsStorage::from_uri(
            backends.resolver.as_ref(),
            &record.uri,
        )?))
    }

    fn artifact(&self, record: &ArtifactRecord, backends: &Backends) -> Result<Box<dyn Artifact>> {
        let artifact = FsArtifact::from_uri(backends.resolver.as_ref(), &record.uri)?;
        Ok(Box::new(artifact.with_info(record.info())))
    }
}

/// Registry of backend factories, keyed by record type
pub struct Registry {
    backends: Backends,
    factories: Vec<Box<dyn BackendFactory>>,
}

impl Registry {
    /// Registry with the `local` and `fsspec` backends
    pub fn new(backends: Backends) -> Self {
        Self {
            backends,
            factories: vec![Box::new(LocalFactory), Box::new(FsFactory)],
        }
    }

    /// Add a factory; it takes precedence over earlier ones of the same kind
    pub fn register(&mut self, factory: Box<dyn BackendFactory>) {
        self.factories.retain(|f| f.kind() != factory.kind());
        self.factories.push(factory);
    }

    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.kind()).collect()
    }

    fn factory(&self, kind: &str) -> Result<&dyn BackendFactory> {
        self.factories
            .iter()
            .find(|f| f.kind() == kind)
            .map(|f| f.as_ref())
            .ok_or_else(|| Error::UnknownKind(kind.to_string()))
    }

    pub fn storage(&self, record: &StorageRecord) -> Result<Box<dyn Storage>> {
        self.factory(&record.kind)?.storage(record, &self.backends)
    }

    pub fn artifact(&self, record: &ArtifactRecord) -> Result<Box<dyn Artifact>> {
        self.factory(&record.kind)?.artifact(record, &self.backends)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactExt;

    #[test]
    fn test_artifact_record_json() {
        let record = ArtifactRecord::new(
            "local",
            "models/a.bin",
            Some(ArtifactInfo {
                size: 3,
                hash: "abc".to_string(),
            }),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "local");
        assert_eq!(json["size"], 3);

        let bare: ArtifactRecord =
            serde_json::from_str(r#"{"type": "dvc", "uri": "data/x.csv"}"#).unwrap();
        assert_eq!(bare.kind, "dvc");
        assert!(bare.info().is_none());
        assert!(!serde_json::to_string(&bare).unwrap().contains("size"));
    }

    #[test]
    fn test_registry_rebuilds_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("x.txt");
        std::fs::write(&source, b"xyz").unwrap();

        let registry = Registry::new(Backends::local());
        let storage = registry
            .storage(&StorageRecord::new("local", dir.path().join("store").to_string_lossy()))
            .unwrap();
        let record = storage.upload(&source, "x.txt").unwrap().record();
        drop(storage);

        let artifact = registry.artifact(&record).unwrap();
        assert_eq!(artifact.record(), record);
        assert_eq!(artifact.read_bytes().unwrap(), b"xyz");
    }

    #[test]
    fn test_registry_unknown_kind() {
        let registry = Registry::new(Backends::local());
        let err = registry
            .storage(&StorageRecord::new("s3", "bucket"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownKind(kind) if kind == "s3"));
    }

    #[test]
    fn test_register_replaces_same_kind() {
        let mut registry = Registry::new(Backends::local());
        registry.register(Box::new(LocalFactory));
        assert_eq!(registry.kinds(), vec!["fsspec", "local"]);
    }
}
