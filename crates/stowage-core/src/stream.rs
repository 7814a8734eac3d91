//! Scoped read stream handed out by `open`

use std::fmt;
use std::io::{self, Read};

/// Readable byte stream owned by exactly one reader.
///
/// The underlying handle is released when the stream is dropped or
/// explicitly closed; it is never handed back to the caller.
pub struct ArtifactStream {
    uri: String,
    inner: Option<Box<dyn Read + Send>>,
}

impl ArtifactStream {
    pub fn new(uri: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self::from_boxed(uri, Box::new(reader))
    }

    pub fn from_boxed(uri: impl Into<String>, reader: Box<dyn Read + Send>) -> Self {
        Self {
            uri: uri.into(),
            inner: Some(reader),
        }
    }

    /// Location this stream reads from
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Release the underlying handle. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            tracing::trace!(uri = %self.uri, "stream closed");
        }
    }

    /// Read the remaining bytes and close the stream.
    pub fn read_to_vec(mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        self.close();
        Ok(buf)
    }
}

impl Read for ArtifactStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.as_mut() {
            Some(reader) => reader.read(buf),
            None => Err(io::Error::other(format!("stream closed: {}", self.uri))),
        }
    }
}

impl Drop for ArtifactStream {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for ArtifactStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactStream")
            .field("uri", &self.uri)
            .field("closed", &self.is_closed())
            .finish()
    }
}
