//! Resolve a requested version token against a project's published versions.

use crate::error::{NavError, Result};
use crate::record::{VersionRecord, VersionSet};
use crate::source::VersionSource;
use crate::version::is_latest_alias;

/// Outcome of a successful resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The token names an existing version.
    Resolved {
        /// The concrete record the token resolved to.
        record: VersionRecord,
        /// Every published version, sorted ascending.
        versions: VersionSet,
    },
    /// "latest" cannot be resolved yet because no versions are known.
    ///
    /// Not terminal: callers retry once versions are available.
    Pending,
}

impl Resolution {
    /// The resolved record, if any.
    #[must_use]
    pub fn record(&self) -> Option<&VersionRecord> {
        match self {
            Self::Resolved { record, .. } => Some(record),
            Self::Pending => None,
        }
    }
}

/// Pick the record a token names out of an already-fetched set.
///
/// "latest" maps to the highest version, or to [`Resolution::Pending`] when
/// only the sentinel is available. Any other token must match a record name
/// or tag.
pub fn select(project: &str, versions: &VersionSet, requested: &str) -> Result<Resolution> {
    if is_latest_alias(requested) {
        let latest = versions.latest();
        if latest.is_sentinel() {
            return Ok(Resolution::Pending);
        }
        return Ok(Resolution::Resolved {
            record: latest,
            versions: versions.clone(),
        });
    }

    match versions.find(requested) {
        Some(record) => Ok(Resolution::Resolved {
            record: record.clone(),
            versions: versions.clone(),
        }),
        None => Err(NavError::UnknownVersion {
            project: project.to_string(),
            requested: requested.to_string(),
        }),
    }
}

/// Fetches version lists and resolves version tokens.
#[derive(Debug, Clone)]
pub struct VersionResolver<S> {
    source: S,
}

impl<S: VersionSource> VersionResolver<S> {
    /// Create a resolver over a version source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and sort the versions of a project.
    ///
    /// Fails with [`NavError::EmptyVersionSet`] when nothing is published.
    pub async fn fetch(&self, project: &str) -> Result<VersionSet> {
        let records = self.source.list_versions(project).await?;
        let versions = VersionSet::from_records(records);
        if versions.is_empty() {
            tracing::warn!("No published versions for project {}", project);
            return Err(NavError::EmptyVersionSet {
                project: project.to_string(),
            });
        }
        tracing::debug!("Fetched {} versions for {}", versions.len(), project);
        Ok(versions)
    }

    /// Resolve `requested` for `project`.
    ///
    /// Idempotent; every call fetches the list again.
    pub async fn resolve(&self, project: &str, requested: &str) -> Result<Resolution> {
        let versions = self.fetch(project).await?;
        let resolution = select(project, &versions, requested)?;
        if let Some(record) = resolution.record() {
            tracing::info!("Resolved {}@{} to {}", project, requested, record.name);
        }
        Ok(resolution)
    }
}
