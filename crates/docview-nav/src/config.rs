//! Configuration for the documentation viewer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// Default page shown when an address names no page.
pub const DEFAULT_PAGE: &str = "index.html";

/// Default timeout for version-list requests (in seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings for the viewer's external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerSettings {
    /// Base URL the embedded viewer loads documentation from.
    #[serde(default = "default_docs_base_url")]
    pub docs_base_url: String,

    /// Base URL of the version service (`<api>/<project>/versions.json`).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Page used when the address carries none.
    #[serde(default = "default_page")]
    pub default_page: String,

    /// Timeout for version-list requests.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_docs_base_url() -> String {
    "https://docs.example.com".to_string()
}

fn default_api_base_url() -> String {
    "https://docs.example.com/api".to_string()
}

fn default_page() -> String {
    DEFAULT_PAGE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            docs_base_url: default_docs_base_url(),
            api_base_url: default_api_base_url(),
            default_page: default_page(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ViewerSettings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let settings = Self::from_toml(&raw)?;
        tracing::debug!("Loaded viewer settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Override the docs base URL.
    #[must_use]
    pub fn with_docs_base_url(mut self, url: impl Into<String>) -> Self {
        self.docs_base_url = url.into();
        self
    }

    /// Override the version service base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.default_page.is_empty() {
            return Err(NavError::Config("default_page must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(NavError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
