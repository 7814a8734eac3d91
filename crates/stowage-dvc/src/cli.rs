//! Reference resolution backed by the `dvc` executable

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::process::Command;

use stowage_core::relocate::base_name;
use stowage_core::{Error, ReferenceResolver, Result};
use tempfile::TempDir;

#[derive(Debug, Clone)]
pub struct DvcCli {
    executable: String,
}

impl Default for DvcCli {
    fn default() -> Self {
        Self::new("dvc")
    }
}

impl DvcCli {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    fn command(&self) -> Result<Command> {
        let path = which::which(&self.executable).map_err(|e| {
            Error::Reference(format!(
                "dvc executable '{}' not found: {}",
                self.executable, e
            ))
        })?;
        Ok(Command::new(path))
    }

    fn run(&self, mut cmd: Command, subcommand: &str) -> Result<()> {
        let output = cmd.output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Reference(format!(
                "dvc {} failed: {}",
                subcommand,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl ReferenceResolver for DvcCli {
    fn open(&self, path: &str, repo: &str, rev: &str) -> Result<Box<dyn Read + Send>> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join(base_name(path));

        let mut cmd = self.command()?;
        cmd.arg("get").arg(repo).arg(path).arg("-o").arg(&out);
        if !rev.is_empty() {
            cmd.arg("--rev").arg(rev);
        }

        tracing::debug!(repo, path, rev, "dvc get");
        self.run(cmd, "get")?;

        let file = File::open(&out).map_err(|e| Error::from_io(e, path))?;
        Ok(Box::new(FetchedFile { file, _dir: dir }))
    }

    fn get_url(&self, uri: &str, out: &Path) -> Result<()> {
        let mut cmd = self.command()?;
        cmd.arg("get-url").arg(uri).arg(out);

        tracing::debug!(uri, out = %out.display(), "dvc get-url");
        self.run(cmd, "get-url")
    }
}

/// Fetched copy, removed together with its reader
struct FetchedFile {
    file: File,
    _dir: TempDir,
}

impl Read for FetchedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}
