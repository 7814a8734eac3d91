#![allow(dead_code)]

use std::io::{self, Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use stowage_core::relocate::base_name;
use stowage_core::{Backends, Error, ReferenceResolver, Result};
use stowage_sources::{GitHubOptions, UriResolver};

/// Reader that reports when it is dropped
pub struct ReleaseFlag {
    inner: Cursor<Vec<u8>>,
    released: Arc<AtomicBool>,
}

impl Read for ReleaseFlag {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for ReleaseFlag {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Reference resolver that records every call
#[derive(Debug, Default)]
pub struct RecordingReference {
    pub opened: Mutex<Vec<(String, String, String)>>,
    pub fetched: Mutex<Vec<String>>,
    pub released: Arc<AtomicBool>,
    pub fail: bool,
}

impl RecordingReference {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn was_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl ReferenceResolver for RecordingReference {
    fn open(&self, path: &str, repo: &str, rev: &str) -> Result<Box<dyn Read + Send>> {
        if self.fail {
            return Err(Error::Reference(format!("revision {} not found", rev)));
        }

        self.opened
            .lock()
            .unwrap()
            .push((path.to_string(), repo.to_string(), rev.to_string()));
        Ok(Box::new(ReleaseFlag {
            inner: Cursor::new(b"tracked bytes".to_vec()),
            released: self.released.clone(),
        }))
    }

    fn get_url(&self, uri: &str, out: &Path) -> Result<()> {
        if self.fail {
            return Err(Error::Reference(format!("cannot fetch {}", uri)));
        }

        self.fetched.lock().unwrap().push(uri.to_string());
        // like `dvc get-url`, an existing directory receives the file inside it
        let out = if out.is_dir() {
            out.join(base_name(uri))
        } else {
            out.to_path_buf()
        };
        std::fs::write(out, b"fetched bytes")?;
        Ok(())
    }
}

pub fn uri_resolver() -> Arc<UriResolver> {
    Arc::new(UriResolver::new(GitHubOptions::default()).unwrap())
}

pub fn backends(reference: Arc<RecordingReference>) -> Backends {
    Backends::new(uri_resolver(), reference)
}
