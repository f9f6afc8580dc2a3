//! Version-list sources and the docs load-target address.
//!
//! The navigator never talks to the network itself. A [`VersionSource`] lists
//! the published versions of a project; [`docs_source_address`] builds the
//! address the embedded viewer loads.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use crate::config::ViewerSettings;
use crate::error::{NavError, Result};
use crate::record::VersionRecord;

/// User agent string for version-service requests.
const USER_AGENT_VALUE: &str = concat!("docview/", env!("CARGO_PKG_VERSION"));

/// Lists the published versions of a project.
pub trait VersionSource {
    /// Fetch every published version of `project`, in any order.
    ///
    /// An unknown project may return an empty list or an error; both end in
    /// the not-found state.
    fn list_versions(&self, project: &str) -> impl Future<Output = Result<Vec<VersionRecord>>>;
}

/// Build the address the embedded viewer loads for a location.
#[must_use]
pub fn docs_source_address(
    settings: &ViewerSettings,
    project: &str,
    version: &str,
    page: &str,
    hash: &str,
) -> String {
    format!(
        "{}/{}/{}/{}{}",
        settings.docs_base_url.trim_end_matches('/'),
        project,
        version,
        page.trim_start_matches('/'),
        hash
    )
}

/// In-memory version lists keyed by project.
///
/// Loadable from a JSON document of the form
/// `{"project": [{"name": "1.0.0", "tags": ["stable"]}]}`.
#[derive(Debug, Clone, Default)]
pub struct StaticVersionSource {
    projects: HashMap<String, Vec<VersionRecord>>,
}

impl StaticVersionSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the versions of a project.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>, records: Vec<VersionRecord>) -> Self {
        self.projects.insert(project.into(), records);
        self
    }

    /// Parse a JSON document of project version lists.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let projects: HashMap<String, Vec<VersionRecord>> = serde_json::from_str(raw)?;
        Ok(Self { projects })
    }

    /// Load a JSON document of project version lists from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Project identifiers known to this source.
    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }
}

impl VersionSource for StaticVersionSource {
    async fn list_versions(&self, project: &str) -> Result<Vec<VersionRecord>> {
        Ok(self.projects.get(project).cloned().unwrap_or_default())
    }
}

/// Version service client over HTTP.
///
/// Fetches `<api_base_url>/<project>/versions.json`, a JSON array of
/// version records.
#[derive(Debug, Clone)]
pub struct HttpVersionSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVersionSource {
    /// Creates a client for the version service configured in `settings`.
    pub fn new(settings: &ViewerSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| NavError::Fetch(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the version list for a project.
    #[must_use]
    pub fn versions_url(&self, project: &str) -> String {
        format!(
            "{}/{}/versions.json",
            self.base_url,
            urlencoding::encode(project)
        )
    }

    /// Checks the HTTP status and parses the version list.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Vec<VersionRecord>> {
        let status = response.status();

        // Unknown project: no published versions
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NavError::Fetch(format!(
                "version service error ({status}): {body}"
            )));
        }

        let records: Vec<VersionRecord> = response.json().await?;
        Ok(records)
    }
}

impl VersionSource for HttpVersionSource {
    async fn list_versions(&self, project: &str) -> Result<Vec<VersionRecord>> {
        let url = self.versions_url(project);
        tracing::debug!("Fetching version list from {}", url);

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }
}
