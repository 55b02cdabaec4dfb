//! Application configuration module
//!
//! `AppConfig` is the validated settings value. It is assembled by
//! `AppConfigBuilder` from defaults, an optional TOML file and environment
//! overrides, in that order.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Backend base URL used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/api";

/// Environment variable overriding the backend base URL
pub const ENV_API_URL: &str = "ATTENDBOOK_API_URL";
/// Environment variable carrying the shared application credential
pub const ENV_PASS: &str = "ATTENDBOOK_PASS";
/// Environment variable overriding the version-check URL
pub const ENV_VERSION_URL: &str = "ATTENDBOOK_VERSION_URL";

/// Records requested per page for each list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageSizes {
    pub books: u32,
    pub events: u32,
    pub notifications: u32,
    pub subscriptions: u32,
    pub history: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            books: 5,
            events: 10,
            notifications: 10,
            subscriptions: 10,
            history: 10,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL, without trailing slash
    pub server_url: String,
    /// Shared application credential sent with every call
    pub pass: String,
    /// Where the update check is sent; disabled when absent
    pub version_url: Option<String>,
    pub page_sizes: PageSizes,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            pass: String::new(),
            version_url: None,
            page_sizes: PageSizes::default(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(&self.server_url)?;
        if let Some(url) = &self.version_url {
            validate_url(url)?;
        }
        let sizes = self.page_sizes;
        for (name, size) in [
            ("page_sizes.books", sizes.books),
            ("page_sizes.events", sizes.events),
            ("page_sizes.notifications", sizes.notifications),
            ("page_sizes.subscriptions", sizes.subscriptions),
            ("page_sizes.history", sizes.history),
        ] {
            if size == 0 {
                return Err(ConfigError::InvalidValue {
                    key: name,
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Default location of the config file (`<config dir>/attendbook/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("attendbook").join("config.toml"))
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl(url.to_string()))
    }
}

/// On-disk shape of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    server_url: Option<String>,
    pass: Option<String>,
    version_url: Option<String>,
    page_sizes: Option<PageSizes>,
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    pass: Option<String>,
    version_url: Option<String>,
    page_sizes: Option<PageSizes>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the shared application credential
    pub fn pass(mut self, pass: impl Into<String>) -> Self {
        self.pass = Some(pass.into());
        self
    }

    pub fn version_url(mut self, url: impl Into<String>) -> Self {
        self.version_url = Some(url.into());
        self
    }

    pub fn page_sizes(mut self, sizes: PageSizes) -> Self {
        self.page_sizes = Some(sizes);
        self
    }

    /// Merge values from a TOML file. Values already set on the builder win.
    pub fn file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let file: FileConfig = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.server_url = self.server_url.or(file.server_url);
        self.pass = self.pass.or(file.pass);
        self.version_url = self.version_url.or(file.version_url);
        self.page_sizes = self.page_sizes.or(file.page_sizes);
        Ok(self)
    }

    /// Apply `ATTENDBOOK_*` environment overrides. These win over everything.
    pub fn env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            self.server_url = Some(url);
        }
        if let Ok(pass) = std::env::var(ENV_PASS) {
            self.pass = Some(pass);
        }
        if let Ok(url) = std::env::var(ENV_VERSION_URL) {
            self.version_url = Some(url);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self
                .server_url
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            pass: self.pass.unwrap_or_default(),
            version_url: self.version_url.filter(|u| !u.is_empty()),
            page_sizes: self.page_sizes.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("cannot read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
    #[error("cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::builder().build().unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.page_sizes.books, 5);
        assert_eq!(config.page_sizes.notifications, 10);
        assert!(config.version_url.is_none());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = AppConfig::builder()
            .server_url("https://attend.example.com/api/")
            .build()
            .unwrap();
        assert_eq!(config.server_url, "https://attend.example.com/api");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = AppConfig::builder().server_url("ftp://x").build().unwrap_err();
        assert_matches!(err, ConfigError::InvalidUrl(url) if url == "ftp://x");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let sizes = PageSizes { history: 0, ..PageSizes::default() };
        let err = AppConfig::builder().page_sizes(sizes).build().unwrap_err();
        assert_matches!(err, ConfigError::InvalidValue { key: "page_sizes.history", .. });
    }

    #[test]
    fn test_file_values_fill_gaps_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server_url = \"https://from-file.example\"\npass = \"file-pass\"\n\n[page_sizes]\nbooks = 20"
        )
        .unwrap();

        let config = AppConfig::builder()
            .pass("explicit")
            .file(file.path())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.server_url, "https://from-file.example");
        assert_eq!(config.pass, "explicit");
        assert_eq!(config.page_sizes.books, 20);
        assert_eq!(config.page_sizes.events, 10);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_url = [").unwrap();
        let err = AppConfig::builder().file(file.path()).unwrap_err();
        assert_matches!(err, ConfigError::Parse { .. });
    }

    #[test]
    #[serial]
    fn test_env_overrides_win() {
        std::env::set_var(ENV_API_URL, "https://env.example");
        std::env::set_var(ENV_PASS, "env-pass");
        let config = AppConfig::builder()
            .server_url("https://builder.example")
            .env()
            .build()
            .unwrap();
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_PASS);

        assert_eq!(config.server_url, "https://env.example");
        assert_eq!(config.pass, "env-pass");
    }
}
