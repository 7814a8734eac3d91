//! DVC-tracked storage
//!
//! `DvcStorage` persists files like a local storage but hands out
//! `DvcArtifact`s, whose reads go through a reference-resolution service
//! (`DvcCli` by default) when the file lives in a hosted repository.
//! Files must be tracked with dvc by the user; nothing here runs `dvc add`
//! or `dvc push`.

pub mod artifact;
pub mod cli;
pub mod factory;
pub mod storage;

pub use artifact::DvcArtifact;
pub use cli::DvcCli;
pub use factory::DvcFactory;
pub use storage::DvcStorage;
