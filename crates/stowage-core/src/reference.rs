//! Reference-resolution service
//!
//! Maps a symbolic location inside a tracked repository to concrete bytes.
//! Injected into the backends that need it; `NoReferenceResolver` stands in
//! when the capability is not configured.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};

pub trait ReferenceResolver: Send + Sync + fmt::Debug {
    /// Open `path` inside the repository at `repo`, checked out at `rev`
    fn open(&self, path: &str, repo: &str, rev: &str) -> Result<Box<dyn Read + Send>>;

    /// Materialize the tracked reference `uri` at `out`
    fn get_url(&self, uri: &str, out: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct NoReferenceResolver;

impl ReferenceResolver for NoReferenceResolver {
    fn open(&self, path: &str, repo: &str, _rev: &str) -> Result<Box<dyn Read + Send>> {
        Err(Error::UnsupportedSource(format!(
            "no reference resolver configured to open {} in {}",
            path, repo
        )))
    }

    fn get_url(&self, uri: &str, _out: &Path) -> Result<()> {
        Err(Error::UnsupportedSource(format!(
            "no reference resolver configured to fetch {}",
            uri
        )))
    }
}
