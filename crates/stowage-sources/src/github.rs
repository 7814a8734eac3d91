use std::io::Read;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use stowage_core::{Error, FileSystem, FsKind, GitHubLocation, Result};

/// HTTP settings for reading GitHub-hosted content
#[derive(Debug, Clone)]
pub struct GitHubOptions {
    pub raw_base_url: String,
    pub timeout: Duration,
}

impl Default for GitHubOptions {
    fn default() -> Self {
        Self {
            raw_base_url: "https://raw.githubusercontent.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GitHubOptions {
    pub fn client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(concat!("stowage/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))
    }
}

/// Read-only view of a GitHub repository at `root`
#[derive(Debug, Clone)]
pub struct GitHubFileSystem {
    location: GitHubLocation,
    client: Client,
    raw_base_url: String,
}

impl GitHubFileSystem {
    pub fn new(location: GitHubLocation, client: Client, raw_base_url: impl Into<String>) -> Self {
        Self {
            location,
            client,
            raw_base_url: raw_base_url.into(),
        }
    }

    /// Raw content url of `path`
    pub fn raw_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base_url.trim_end_matches('/'),
            self.location.organization,
            self.location.repository,
            self.location.root,
            path.trim_start_matches('/')
        )
    }
}

impl FileSystem for GitHubFileSystem {
    fn protocol(&self) -> &str {
        "github"
    }

    fn kind(&self) -> FsKind<'_> {
        FsKind::GitHub(&self.location)
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let url = self.raw_url(path);
        tracing::debug!(url = %url, "fetching GitHub content");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::Transport(format!("Failed to fetch {}: {}", url, e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::NotFound(self.unstrip_protocol(path))),
            status if !status.is_success() => Err(Error::Transport(format!(
                "HTTP error {}: {}",
                status.as_u16(),
                url
            ))),
            _ => Ok(Box::new(response)),
        }
    }

    fn exists(&self, path: &str) -> Result<bool> {
        let url = self.raw_url(path);
        let response = self
            .client
            .head(&url)
            .send()
            .map_err(|e| Error::Transport(format!("Failed to fetch {}: {}", url, e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(Error::Transport(format!(
                "HTTP error {}: {}",
                status.as_u16(),
                url
            ))),
        }
    }

    fn unstrip_protocol(&self, path: &str) -> String {
        format!(
            "github://{}:{}@{}/{}",
            self.location.organization,
            self.location.repository,
            self.location.root,
            path.trim_start_matches('/')
        )
    }
}
