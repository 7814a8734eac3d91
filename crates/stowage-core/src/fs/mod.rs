//! Filesystem collaborators
//!
//! A `FileSystem` is a thin handle able to read (and sometimes write) paths
//! under one protocol. An `FsResolver` maps a uri to the filesystem that
//! serves it and the path inside that filesystem.

mod local;
mod memory;

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::{Error, Result};

pub use local::{LocalFileSystem, LocalResolver};
pub use memory::MemoryFileSystem;

/// What kind of source a filesystem reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsKind<'a> {
    /// Local disk
    Local,
    /// Any non-repository remote store
    Remote { protocol: &'a str },
    /// Repository hosted on GitHub
    GitHub(&'a GitHubLocation),
    /// Some other version-controlled repository
    Repository { protocol: &'a str },
}

/// Organization, repository and root (revision) of a GitHub-hosted tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubLocation {
    pub organization: String,
    pub repository: String,
    pub root: String,
}

impl GitHubLocation {
    pub fn new(
        organization: impl Into<String>,
        repository: impl Into<String>,
        root: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            repository: repository.into(),
            root: root.into(),
        }
    }

    /// Public clone location of the repository
    pub fn clone_url(&self) -> String {
        format!(
            "https://github.com/{}/{}",
            self.organization, self.repository
        )
    }

    /// The root with `+` and percent escapes decoded
    pub fn decoded_root(&self) -> String {
        unquote_plus(&self.root)
    }
}

/// Decode a form-encoded component (`+` is a space, `%XX` an escaped byte).
pub fn unquote_plus(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

pub trait FileSystem: Send + Sync + fmt::Debug {
    /// Protocol prefix of uris served by this filesystem
    fn protocol(&self) -> &str;

    fn kind(&self) -> FsKind<'_>;

    /// Open `path` for reading
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>>;

    fn exists(&self, path: &str) -> Result<bool>;

    /// Copy a local file to `path`, creating parent directories as needed
    fn put(&self, local_path: &Path, path: &str) -> Result<()> {
        let _ = (local_path, path);
        Err(Error::read_only(self.protocol()))
    }

    fn remove(&self, path: &str) -> Result<()> {
        let _ = path;
        Err(Error::read_only(self.protocol()))
    }

    /// Full uri for `path` on this filesystem
    fn unstrip_protocol(&self, path: &str) -> String;
}

/// Maps a uri to the filesystem serving it and the path inside that filesystem
pub trait FsResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, uri: &str) -> Result<(Arc<dyn FileSystem>, String)>;
}
