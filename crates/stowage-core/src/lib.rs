//! Core storage abstraction for stowage
//!
//! This crate contains:
//! - The `Storage` / `Artifact` pair and their relocation contract
//! - Filesystem, resolver and reference-resolution collaborator traits
//! - Local, in-memory and fsspec-style backends
//! - Serializable records and the backend registry

pub mod artifact;
pub mod error;
pub mod fs;
pub mod record;
pub mod reference;
pub mod relocate;
pub mod storage;
pub mod stream;

pub use artifact::{
    Artifact, ArtifactExt, ArtifactInfo, FsArtifact, LocalArtifact, download_target,
};
pub use error::{Error, Result};
pub use fs::{
    FileSystem, FsKind, FsResolver, GitHubLocation, LocalFileSystem, LocalResolver,
    MemoryFileSystem,
};
pub use record::{ArtifactRecord, BackendFactory, Backends, Registry, StorageRecord};
pub use reference::{NoReferenceResolver, ReferenceResolver};
pub use relocate::{Relocation, join_uri};
pub use storage::{FsStorage, LocalStorage, Opened, Storage, StorageExt};
pub use stream::ArtifactStream;
