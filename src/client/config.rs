use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError, PageSizes};
use std::path::Path;

/// Runtime configuration handed to the API client.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app })
    }

    /// Load defaults, then the config file (explicit path or the default
    /// location when it exists), then `ATTENDBOOK_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();
        match path {
            Some(path) => builder = builder.file(path)?,
            None => {
                if let Some(default) = AppConfig::default_path().filter(|p| p.exists()) {
                    tracing::debug!(path = %default.display(), "loading config file");
                    builder = builder.file(&default)?;
                }
            }
        }
        // env goes last so it overrides the file
        Self::with_builder(builder.env())
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    /// Shared application credential
    pub fn pass(&self) -> &str {
        &self.app.pass
    }

    pub fn version_url(&self) -> Option<&str> {
        self.app.version_url.as_deref()
    }

    pub fn page_sizes(&self) -> PageSizes {
        self.app.page_sizes
    }
}
