//! Messages into the navigator and the effects it asks the host to perform.
//!
//! Every inbound signal (address change, viewer report, user action,
//! resolution result) is a [`NavMessage`]. The navigator answers each one
//! with a list of [`Effect`]s and never performs I/O itself.

use serde::Serialize;

use crate::address::NavTuple;
use crate::advisory::Advisory;
use crate::error::NavError;
use crate::resolver::Resolution;

/// A version resolution issued by the navigator.
///
/// Tagged with the project and version it was issued for; a result for any
/// request other than the one currently in flight is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolveRequest {
    /// Monotonic request number within one navigator.
    pub id: u64,
    /// Project to fetch versions for.
    pub project: String,
    /// Version token to resolve.
    pub version: String,
}

/// Input to [`Navigator::update`](crate::navigator::Navigator::update).
#[derive(Debug, Clone)]
pub enum NavMessage {
    // =========================================================================
    // Address
    // =========================================================================
    /// A documentation view was entered for a (possibly new) project.
    ProjectEntered(NavTuple),

    /// The address changed outside the navigator (link, back/forward).
    AddressChanged(NavTuple),

    // =========================================================================
    // Embedded viewer
    // =========================================================================
    /// The viewer navigated to another page on its own.
    ViewerPageChanged {
        /// Page the viewer now shows.
        page: String,
        /// Fragment within that page, possibly empty.
        hash: String,
    },

    /// The viewer moved to another fragment within the current page.
    ViewerHashChanged(String),

    // =========================================================================
    // User actions
    // =========================================================================
    /// The user picked a version from the version menu.
    VersionSelected(String),

    /// The user asked to hide the host UI.
    HideUiRequested,

    // =========================================================================
    // Background results
    // =========================================================================
    /// A [`Effect::Resolve`] request completed.
    VersionsResolved {
        /// The request this result answers.
        request: ResolveRequest,
        /// Resolution outcome.
        outcome: Result<Resolution, NavError>,
    },
}

impl NavMessage {
    /// Creates a page-change report without a fragment.
    pub fn viewer_page(page: impl Into<String>) -> Self {
        Self::ViewerPageChanged {
            page: page.into(),
            hash: String::new(),
        }
    }

    /// Creates a version selection.
    pub fn select_version(version: impl Into<String>) -> Self {
        Self::VersionSelected(version.into())
    }
}

/// Work the host performs on the navigator's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "value", rename_all = "snake_case")]
pub enum Effect {
    /// Replace the visible address without navigating the host page.
    SetAddress(String),

    /// Load the viewer from scratch at this source address.
    ReloadViewer(String),

    /// Point the already-loaded viewer at another page or fragment.
    NavigateViewer(String),

    /// Fetch versions and resolve the request, then send
    /// [`NavMessage::VersionsResolved`] back.
    Resolve(ResolveRequest),

    /// Show an advisory in the UI shell.
    ShowAdvisory(Advisory),

    /// Clear all advisories.
    ClearAdvisories,
}

impl Effect {
    /// Whether this effect reloads the viewer.
    #[must_use]
    pub fn is_reload(&self) -> bool {
        matches!(self, Self::ReloadViewer(_))
    }

    /// Whether this effect mutates the visible address.
    #[must_use]
    pub fn is_address_change(&self) -> bool {
        matches!(self, Self::SetAddress(_))
    }
}
