//! Advisories raised by the navigator and the outdated-version notifier.

use std::fmt;

use serde::Serialize;

use crate::record::VersionSet;

/// Kind of advisory, used by the shell to replace or clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// The viewed version is not the latest one.
    OutdatedVersion,
}

/// Severity determines the icon and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational notice.
    Info,
    /// Warning notice.
    Warning,
    /// Error notice.
    Error,
}

/// How long an advisory stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ttl {
    /// Until explicitly cleared.
    Persistent,
    /// Auto-dismiss after the given number of seconds.
    Seconds(u32),
}

/// Optional action offered with an advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryAction {
    /// Label for the action button.
    pub label: String,
    /// Version to switch to when the action is taken.
    pub switch_to_version: String,
}

/// A notice shown by the UI shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    /// What the advisory is about.
    pub kind: AdvisoryKind,
    /// Message to display.
    pub message: String,
    /// Visual severity.
    pub severity: Severity,
    /// Lifetime.
    pub ttl: Ttl,
    /// Optional action.
    pub action: Option<AdvisoryAction>,
}

impl Advisory {
    /// The persistent "outdated version" advisory.
    #[must_use]
    pub fn outdated(current: &str, latest: &str) -> Self {
        Self {
            kind: AdvisoryKind::OutdatedVersion,
            message: format!(
                "You are viewing the documentation for version {current}. The latest version is {latest}."
            ),
            severity: Severity::Warning,
            ttl: Ttl::Persistent,
            action: Some(AdvisoryAction {
                label: "Go to latest".to_string(),
                switch_to_version: latest.to_string(),
            }),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A change the shell has to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryChange {
    /// Show this advisory.
    Raise(Advisory),
    /// Clear any shown advisory.
    Clear,
}

/// Tracks whether the outdated-version advisory is up.
///
/// Edge-triggered: [`evaluate`](Self::evaluate) only reports a change when
/// the advisory has to appear or disappear, so re-evaluating an unchanged
/// state never flickers.
#[derive(Debug, Clone, Default)]
pub struct OutdatedNotifier {
    raised_for: Option<String>,
}

impl OutdatedNotifier {
    /// Create a notifier with no advisory raised.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the advisory is currently raised.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised_for.is_some()
    }

    /// Forget any raised advisory (the shell clears advisories on project change).
    pub fn reset(&mut self) {
        self.raised_for = None;
    }

    /// Re-evaluate for the viewed version token.
    ///
    /// Tags are compared through the record they name. Nothing happens while
    /// `versions` is empty.
    pub fn evaluate(&mut self, version: &str, versions: &VersionSet) -> Option<AdvisoryChange> {
        if versions.is_empty() {
            return None;
        }
        let latest = versions.latest();
        let current = versions
            .find(version)
            .map_or(version, |record| record.name.as_str());

        if current == latest.name {
            if self.raised_for.take().is_some() {
                tracing::debug!("Viewing latest version {}, clearing advisory", current);
                return Some(AdvisoryChange::Clear);
            }
            return None;
        }

        if self.raised_for.as_deref() == Some(current) {
            return None;
        }
        tracing::info!("Version {} is outdated (latest: {})", current, latest.name);
        self.raised_for = Some(current.to_string());
        Some(AdvisoryChange::Raise(Advisory::outdated(current, &latest.name)))
    }
}
