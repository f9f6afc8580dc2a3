//! The navigation synchronizer.
//!
//! [`Navigator`] is the single owner of the navigation tuple. Three sources
//! race to change it: the address bar, the embedded viewer, and the user.
//! Each arrives as a [`NavMessage`]; `update` compares it against the current
//! state, mutates what differs, and returns the [`Effect`]s that bring the
//! other two sources back in line.
//!
//! # Loop prevention
//!
//! - Viewer reports equal to the current state are dropped, so echoing an
//!   address back into the viewer cannot bounce.
//! - Viewer reports only ever produce `SetAddress`, never a reload.
//! - `ReloadViewer` is emitted only when the `(project, version)` key the
//!   viewer was last loaded with changes.
//!
//! # Stale results
//!
//! Every resolution is issued as a tagged [`ResolveRequest`]. A result for
//! any request but the one in flight is discarded on arrival.

use crate::address::{NavTuple, encode_address, normalize_hash};
use crate::advisory::{AdvisoryChange, OutdatedNotifier};
use crate::config::ViewerSettings;
use crate::error::NavError;
use crate::message::{Effect, NavMessage, ResolveRequest};
use crate::record::{VersionRecord, VersionSet};
use crate::resolver::{Resolution, select};
use crate::source::docs_source_address;
use crate::version::is_latest_alias;

/// Loading state observed by the render layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Versions are being fetched or "latest" is not resolvable yet.
    Loading,
    /// The version resolved; the viewer can be shown.
    Ready,
    /// Terminal for the current version: render the not-found state.
    Failed(NavError),
}

/// How settling the current version token against the known set ended.
enum Settled {
    Ready { alias_replaced: bool },
    Requested(ResolveRequest),
    Failed,
}

/// Owns the navigation tuple and keeps address, viewer and versions in sync.
#[derive(Debug, Clone)]
pub struct Navigator {
    settings: ViewerSettings,
    tuple: NavTuple,
    versions: VersionSet,
    resolved: Option<VersionRecord>,
    load: LoadState,
    in_flight: Option<ResolveRequest>,
    next_request_id: u64,
    viewer_key: Option<(String, String)>,
    viewer_source: Option<String>,
    notifier: OutdatedNotifier,
}

impl Navigator {
    /// Enter a documentation view.
    ///
    /// Returns the navigator and the startup effects (the first resolution
    /// request).
    pub fn new(settings: ViewerSettings, tuple: NavTuple) -> (Self, Vec<Effect>) {
        let mut navigator = Self {
            settings,
            tuple: tuple.clone(),
            versions: VersionSet::empty(),
            resolved: None,
            load: LoadState::Loading,
            in_flight: None,
            next_request_id: 0,
            viewer_key: None,
            viewer_source: None,
            notifier: OutdatedNotifier::new(),
        };
        let effects = navigator.enter(tuple);
        (navigator, effects)
    }

    /// Apply a message and return the effects the host must perform.
    pub fn update(&mut self, message: NavMessage) -> Vec<Effect> {
        match message {
            NavMessage::ProjectEntered(tuple) => self.enter(tuple),
            NavMessage::AddressChanged(tuple) => self.on_address_changed(tuple),
            NavMessage::ViewerPageChanged { page, hash } => self.on_viewer_page(page, &hash),
            NavMessage::ViewerHashChanged(hash) => self.on_viewer_hash(&hash),
            NavMessage::VersionSelected(version) => self.on_version_selected(version),
            NavMessage::HideUiRequested => self.on_hide_ui(),
            NavMessage::VersionsResolved { request, outcome } => {
                self.on_resolved(&request, outcome)
            }
        }
    }

    // =========================================================================
    // Render signals
    // =========================================================================

    /// The current navigation tuple.
    #[must_use]
    pub fn tuple(&self) -> &NavTuple {
        &self.tuple
    }

    /// The canonical address for the current tuple.
    #[must_use]
    pub fn address(&self) -> String {
        encode_address(&self.tuple)
    }

    /// Known versions in picker order; empty while loading.
    #[must_use]
    pub fn versions(&self) -> &VersionSet {
        &self.versions
    }

    /// The record the current version token resolved to.
    #[must_use]
    pub fn resolved_version(&self) -> Option<&VersionRecord> {
        self.resolved.as_ref()
    }

    /// Loading state.
    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Whether the loading indicator should show.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    /// Whether the not-found state should show.
    #[must_use]
    pub fn load_failed(&self) -> bool {
        matches!(self.load, LoadState::Failed(_))
    }

    /// The failure behind the not-found state.
    #[must_use]
    pub fn failure(&self) -> Option<&NavError> {
        match &self.load {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the outdated-version advisory is up.
    #[must_use]
    pub fn is_outdated(&self) -> bool {
        self.notifier.is_raised()
    }

    /// The source address the viewer was last (re)loaded with.
    #[must_use]
    pub fn viewer_source(&self) -> Option<&str> {
        self.viewer_source.as_deref()
    }

    /// The in-flight resolution request, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<&ResolveRequest> {
        self.in_flight.as_ref()
    }

    /// Settings in use.
    #[must_use]
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn enter(&mut self, tuple: NavTuple) -> Vec<Effect> {
        tracing::info!("Entering {}@{}", tuple.project, tuple.version);
        let mut effects = Vec::new();

        self.tuple = tuple;
        self.versions = VersionSet::empty();
        self.resolved = None;
        self.viewer_key = None;
        self.viewer_source = None;
        if self.notifier.is_raised() {
            self.notifier.reset();
            effects.push(Effect::ClearAdvisories);
        }

        let request = self.issue_request();
        effects.push(Effect::Resolve(request));
        effects
    }

    fn on_address_changed(&mut self, incoming: NavTuple) -> Vec<Effect> {
        if incoming.project != self.tuple.project {
            return self.enter(incoming);
        }

        let mut effects = Vec::new();
        let version_changed = incoming.version != self.tuple.version;
        let location_changed =
            incoming.page != self.tuple.page || incoming.hash != self.tuple.hash;
        let mut address_dirty = false;

        self.tuple.page = incoming.page;
        self.tuple.hash = incoming.hash;

        if incoming.hide_ui {
            self.tuple.hide_ui = true;
        } else if self.tuple.hide_ui {
            // hide-ui never turns off within a session; put the flag back
            address_dirty = true;
        }

        let mut request = None;
        if version_changed {
            tracing::debug!(
                "Address changed version {} -> {}",
                self.tuple.version,
                incoming.version
            );
            self.tuple.version = incoming.version;
            match self.settle_version() {
                Settled::Ready { alias_replaced } => address_dirty |= alias_replaced,
                Settled::Requested(req) => request = Some(req),
                Settled::Failed => {}
            }
        } else if self.is_loading() && self.in_flight.is_none() {
            // "latest" was pending; retry now that something changed
            request = Some(self.issue_request());
        }

        if address_dirty {
            effects.push(Effect::SetAddress(self.address()));
        }
        if let Some(request) = request {
            effects.push(Effect::Resolve(request));
        }

        let reloaded = self.finish(&mut effects);
        if location_changed
            && !reloaded
            && let Some(src) = self.viewer_address()
        {
            effects.push(Effect::NavigateViewer(src));
        }
        effects
    }

    fn on_viewer_page(&mut self, page: String, hash: &str) -> Vec<Effect> {
        if page == self.tuple.page {
            tracing::trace!("Viewer page {} unchanged", page);
            return Vec::new();
        }
        self.tuple.page = page;
        self.tuple.hash = normalize_hash(hash);
        vec![Effect::SetAddress(self.address())]
    }

    fn on_viewer_hash(&mut self, hash: &str) -> Vec<Effect> {
        let hash = normalize_hash(hash);
        if hash == self.tuple.hash {
            tracing::trace!("Viewer hash {} unchanged", hash);
            return Vec::new();
        }
        self.tuple.hash = hash;
        vec![Effect::SetAddress(self.address())]
    }

    fn on_version_selected(&mut self, version: String) -> Vec<Effect> {
        if version == self.tuple.version {
            return Vec::new();
        }
        tracing::info!("Switching {} to version {}", self.tuple.project, version);

        let mut effects = Vec::new();
        let previous = self.address();
        self.tuple.version = version;
        let settled = self.settle_version();
        // "latest" may land on the version already shown
        let address = self.address();
        if address != previous {
            effects.push(Effect::SetAddress(address));
        }
        if let Settled::Requested(request) = settled {
            effects.push(Effect::Resolve(request));
        }
        self.finish(&mut effects);
        effects
    }

    fn on_hide_ui(&mut self) -> Vec<Effect> {
        if self.tuple.hide_ui {
            return Vec::new();
        }
        self.tuple.hide_ui = true;
        vec![Effect::SetAddress(self.address())]
    }

    fn on_resolved(
        &mut self,
        request: &ResolveRequest,
        outcome: Result<Resolution, NavError>,
    ) -> Vec<Effect> {
        let current = self.in_flight.as_ref() == Some(request)
            && request.project == self.tuple.project
            && request.version == self.tuple.version;
        if !current {
            tracing::debug!(
                "Discarding stale resolution #{} for {}@{}",
                request.id,
                request.project,
                request.version
            );
            return Vec::new();
        }
        self.in_flight = None;

        let mut effects = Vec::new();
        match outcome {
            Ok(Resolution::Resolved { record, versions }) => {
                self.versions = versions;
                if self.adopt(record) {
                    effects.push(Effect::SetAddress(self.address()));
                }
            }
            Ok(Resolution::Pending) => {
                tracing::debug!("Versions for {} not available yet", request.project);
                self.load = LoadState::Loading;
            }
            Err(err) => self.fail(err),
        }
        self.finish(&mut effects);
        effects
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn issue_request(&mut self) -> ResolveRequest {
        self.next_request_id += 1;
        let request = ResolveRequest {
            id: self.next_request_id,
            project: self.tuple.project.clone(),
            version: self.tuple.version.clone(),
        };
        self.load = LoadState::Loading;
        self.resolved = None;
        self.in_flight = Some(request.clone());
        request
    }

    /// Resolve the current version token against the known set, or request
    /// a fetch when nothing is known yet.
    fn settle_version(&mut self) -> Settled {
        if self.versions.is_empty() {
            return Settled::Requested(self.issue_request());
        }
        // Any earlier request is superseded by the local answer
        self.in_flight = None;
        match select(&self.tuple.project, &self.versions, &self.tuple.version) {
            Ok(Resolution::Resolved { record, .. }) => Settled::Ready {
                alias_replaced: self.adopt(record),
            },
            Ok(Resolution::Pending) => Settled::Requested(self.issue_request()),
            Err(err) => {
                self.fail(err);
                Settled::Failed
            }
        }
    }

    /// Take a resolved record; returns true if "latest" became concrete.
    fn adopt(&mut self, record: VersionRecord) -> bool {
        self.load = LoadState::Ready;
        let replaced = is_latest_alias(&self.tuple.version) && record.name != self.tuple.version;
        if replaced {
            tracing::info!("Resolved latest to {}", record.name);
            self.tuple.version = record.name.clone();
        }
        self.resolved = Some(record);
        replaced
    }

    fn fail(&mut self, err: NavError) {
        tracing::warn!(
            "Cannot show {}@{}: {}",
            self.tuple.project,
            self.tuple.version,
            err
        );
        self.load = LoadState::Failed(err);
        self.resolved = None;
        self.viewer_key = None;
    }

    /// Bring the viewer and the advisory in line with the load state.
    ///
    /// Returns true if a reload was emitted.
    fn finish(&mut self, effects: &mut Vec<Effect>) -> bool {
        match self.load {
            LoadState::Ready => {
                let reloaded = self.refresh_viewer(effects);
                if let Some(change) = self.notifier.evaluate(&self.tuple.version, &self.versions)
                {
                    effects.push(match change {
                        AdvisoryChange::Raise(advisory) => Effect::ShowAdvisory(advisory),
                        AdvisoryChange::Clear => Effect::ClearAdvisories,
                    });
                }
                reloaded
            }
            LoadState::Failed(_) => {
                if self.notifier.is_raised() {
                    self.notifier.reset();
                    effects.push(Effect::ClearAdvisories);
                }
                false
            }
            LoadState::Loading => false,
        }
    }

    fn refresh_viewer(&mut self, effects: &mut Vec<Effect>) -> bool {
        if self.resolved.is_none() || is_latest_alias(&self.tuple.version) {
            return false;
        }
        let key = (self.tuple.project.clone(), self.tuple.version.clone());
        if self.viewer_key.as_ref() == Some(&key) {
            return false;
        }
        let Some(src) = self.viewer_address() else {
            return false;
        };
        tracing::debug!("Reloading viewer at {}", src);
        self.viewer_key = Some(key);
        self.viewer_source = Some(src.clone());
        effects.push(Effect::ReloadViewer(src));
        true
    }

    /// The docs address for the current location, once the version resolved.
    fn viewer_address(&self) -> Option<String> {
        if self.resolved.is_none() {
            return None;
        }
        Some(docs_source_address(
            &self.settings,
            &self.tuple.project,
            &self.tuple.version,
            &self.tuple.page,
            &self.tuple.hash,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions() -> VersionSet {
        VersionSet::from_records(vec![
            VersionRecord::new("1.0.0"),
            VersionRecord::new("1.2.0"),
            VersionRecord::new("1.1.0"),
        ])
    }

    fn resolved(request: &ResolveRequest) -> NavMessage {
        let versions = versions();
        let outcome = select(&request.project, &versions, &request.version);
        NavMessage::VersionsResolved {
            request: request.clone(),
            outcome,
        }
    }

    #[test]
    fn test_new_issues_resolution() {
        let (navigator, effects) = Navigator::new(
            ViewerSettings::default(),
            NavTuple::new("demo", "latest"),
        );
        assert!(navigator.is_loading());
        assert_eq!(
            effects,
            vec![Effect::Resolve(ResolveRequest {
                id: 1,
                project: "demo".to_string(),
                version: "latest".to_string(),
            })]
        );
    }

    #[test]
    fn test_latest_becomes_concrete() {
        let (mut navigator, _) = Navigator::new(
            ViewerSettings::default(),
            NavTuple::new("demo", "latest"),
        );
        let request = navigator.in_flight().cloned().unwrap();
        let effects = navigator.update(resolved(&request));

        assert_eq!(navigator.tuple().version, "1.2.0");
        assert_eq!(
            effects,
            vec![
                Effect::SetAddress("#/demo/1.2.0/index.html".to_string()),
                Effect::ReloadViewer("https://docs.example.com/demo/1.2.0/index.html".to_string()),
            ]
        );
        assert!(!navigator.is_outdated());
    }

    #[test]
    fn test_concrete_version_does_not_touch_address() {
        let (mut navigator, _) = Navigator::new(
            ViewerSettings::default(),
            NavTuple::new("demo", "1.2.0"),
        );
        let request = navigator.in_flight().cloned().unwrap();
        let effects = navigator.update(resolved(&request));
        assert!(!effects.iter().any(Effect::is_address_change));
        assert_eq!(effects.iter().filter(|e| e.is_reload()).count(), 1);
    }

    #[test]
    fn test_stale_resolution_discarded() {
        let (mut navigator, _) = Navigator::new(
            ViewerSettings::default(),
            NavTuple::new("demo", "latest"),
        );
        let stale = navigator.in_flight().cloned().unwrap();
        navigator.update(NavMessage::select_version("1.0.0"));
        assert_ne!(navigator.in_flight(), Some(&stale));

        let effects = navigator.update(resolved(&stale));
        assert!(effects.is_empty());
        assert!(navigator.is_loading());
        assert_eq!(navigator.tuple().version, "1.0.0");
    }

    #[test]
    fn test_pending_retries_on_next_change() {
        let (mut navigator, _) = Navigator::new(
            ViewerSettings::default(),
            NavTuple::new("demo", "latest"),
        );
        let request = navigator.in_flight().cloned().unwrap();
        navigator.update(NavMessage::VersionsResolved {
            request,
            outcome: Ok(Resolution::Pending),
        });
        assert!(navigator.is_loading());
        assert!(navigator.in_flight().is_none());

        let effects = navigator.update(NavMessage::AddressChanged(
            NavTuple::new("demo", "latest").with_page("guide.html"),
        ));
        assert!(matches!(effects.as_slice(), [Effect::Resolve(_)]));
    }

    #[test]
    fn test_failure_is_terminal_not_found() {
        let (mut navigator, _) =
            Navigator::new(ViewerSettings::default(), NavTuple::new("demo", "9.9.9"));
        let request = navigator.in_flight().cloned().unwrap();
        let effects = navigator.update(resolved(&request));
        assert!(effects.is_empty());
        assert!(navigator.load_failed());
        assert!(matches!(
            navigator.failure(),
            Some(NavError::UnknownVersion { .. })
        ));
        assert!(navigator.viewer_source().is_none());
    }
}
