use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Reference resolution failed: {0}")]
    Reference(String),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("No backend registered for type: {0}")]
    UnknownKind(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Map an I/O error on `path`, turning a missing file into `NotFound`.
    pub fn from_io(err: std::io::Error, path: &str) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path.to_string())
        } else {
            Error::Io(err)
        }
    }

    /// Failures raised by a filesystem or reference-resolution collaborator.
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::Transport(_) | Error::Reference(_)
        )
    }

    pub(crate) fn read_only(protocol: &str) -> Self {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("{} filesystem is read-only", protocol),
        ))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
