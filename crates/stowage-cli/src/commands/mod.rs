pub mod artifact;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use stowage_config::Settings;
use stowage_core::{Backends, Registry};
use stowage_dvc::{DvcCli, DvcFactory};
use stowage_sources::{GitHubOptions, UriResolver};

/// Settings plus the registry built from them
pub struct Context {
    pub settings: Settings,
    pub registry: Registry,
}

impl Context {
    pub fn load(config: Option<&Path>) -> Result<Self> {
        let settings = match config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };
        Self::from_settings(settings)
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let options = GitHubOptions {
            raw_base_url: settings.github.raw_base_url.clone(),
            timeout: Duration::from_secs(settings.github.timeout_secs),
        };
        let resolver = Arc::new(UriResolver::new(options)?);
        let reference = Arc::new(DvcCli::new(settings.dvc.executable.as_str()));

        let mut registry = Registry::new(Backends::new(resolver, reference));
        registry.register(Box::new(DvcFactory));
        tracing::debug!(kinds = ?registry.kinds(), "registered backends");

        Ok(Self { settings, registry })
    }
}
