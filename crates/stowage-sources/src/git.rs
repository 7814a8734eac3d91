use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

use stowage_core::{Error, FileSystem, FsKind, Result};

/// Read-only view of a local git repository at a revision
#[derive(Debug, Clone)]
pub struct GitFileSystem {
    repo: PathBuf,
    rev: String,
}

impl GitFileSystem {
    pub fn new(repo: impl Into<PathBuf>, rev: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            rev: rev.into(),
        }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    pub fn rev(&self) -> &str {
        &self.rev
    }

    /// `<rev>:<path>` object name understood by git
    fn object(&self, path: &str) -> String {
        format!("{}:{}", self.rev, path.trim_start_matches('/'))
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.repo);
        cmd
    }
}

impl FileSystem for GitFileSystem {
    fn protocol(&self) -> &str {
        "git"
    }

    fn kind(&self) -> FsKind<'_> {
        FsKind::Repository {
            protocol: self.protocol(),
        }
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let object = self.object(path);
        tracing::debug!(repo = %self.repo.display(), object = %object, "reading git object");

        let output = self.git().arg("show").arg(&object).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_missing_object(&stderr) {
                return Err(Error::NotFound(self.unstrip_protocol(path)));
            }
            return Err(Error::Io(std::io::Error::other(format!(
                "git show {} failed: {}",
                object,
                stderr.trim()
            ))));
        }

        Ok(Box::new(Cursor::new(output.stdout)))
    }

    fn exists(&self, path: &str) -> Result<bool> {
        let status = self
            .git()
            .arg("cat-file")
            .arg("-e")
            .arg(self.object(path))
            .output()?
            .status;
        Ok(status.success())
    }

    fn unstrip_protocol(&self, path: &str) -> String {
        format!(
            "git://{}:{}@{}",
            self.repo.display(),
            self.rev,
            path.trim_start_matches('/')
        )
    }
}

fn is_missing_object(stderr: &str) -> bool {
    stderr.contains("does not exist")
        || stderr.contains("exists on disk, but not in")
        || stderr.contains("invalid object name")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name() {
        let fs = GitFileSystem::new("/src/project", "v1.0");
        assert_eq!(fs.object("/data/x.csv"), "v1.0:data/x.csv");
    }

    #[test]
    fn test_unstrip_protocol() {
        let fs = GitFileSystem::new("/src/project", "main");
        assert_eq!(fs.unstrip_protocol("data/x.csv"), "git:///src/project:main@data/x.csv");
        assert_eq!(fs.kind(), FsKind::Repository { protocol: "git" });
    }

    #[test]
    fn test_missing_object_detection() {
        assert!(is_missing_object(
            "fatal: path 'x.csv' does not exist in 'main'"
        ));
        assert!(is_missing_object("fatal: invalid object name 'nope'."));
        assert!(!is_missing_object("fatal: not a git repository"));
    }
}
