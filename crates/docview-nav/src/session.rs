//! Drives a [`Navigator`] against a version source and a host page.
//!
//! The navigator is pure; a [`Session`] performs its effects. `Resolve`
//! effects are awaited in place and their results fed straight back, which
//! keeps everything on one task. Hosts that prefer to spawn fetches can use
//! the navigator directly and send [`NavMessage::VersionsResolved`] back
//! themselves.

use std::collections::VecDeque;

use crate::address::{NavTuple, decode_address_with_page};
use crate::advisory::Advisory;
use crate::config::ViewerSettings;
use crate::error::Result;
use crate::message::{Effect, NavMessage};
use crate::navigator::Navigator;
use crate::resolver::VersionResolver;
use crate::source::VersionSource;

/// The host page: address bar, embedded viewer and UI shell.
pub trait Host {
    /// Replace the visible address without navigating.
    fn set_address(&mut self, address: &str);

    /// Load the viewer from scratch.
    fn load_viewer(&mut self, src: &str);

    /// Point the loaded viewer at another location.
    fn navigate_viewer(&mut self, src: &str);

    /// Show an advisory.
    fn show_advisory(&mut self, advisory: &Advisory);

    /// Clear all advisories.
    fn clear_advisories(&mut self);
}

/// A host that records every call as the effect that caused it.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    /// Calls in order.
    pub effects: Vec<Effect>,
}

impl RecordingHost {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded effects, leaving the recorder empty.
    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

impl Host for RecordingHost {
    fn set_address(&mut self, address: &str) {
        self.effects.push(Effect::SetAddress(address.to_string()));
    }

    fn load_viewer(&mut self, src: &str) {
        self.effects.push(Effect::ReloadViewer(src.to_string()));
    }

    fn navigate_viewer(&mut self, src: &str) {
        self.effects.push(Effect::NavigateViewer(src.to_string()));
    }

    fn show_advisory(&mut self, advisory: &Advisory) {
        self.effects.push(Effect::ShowAdvisory(advisory.clone()));
    }

    fn clear_advisories(&mut self) {
        self.effects.push(Effect::ClearAdvisories);
    }
}

/// A navigator wired to a version source and a host.
pub struct Session<S, H> {
    navigator: Navigator,
    resolver: VersionResolver<S>,
    host: H,
}

impl<S: VersionSource, H: Host> Session<S, H> {
    /// Enter the view for `tuple` and run the initial resolution.
    pub async fn start(settings: ViewerSettings, tuple: NavTuple, source: S, host: H) -> Self {
        let (navigator, effects) = Navigator::new(settings, tuple);
        let mut session = Self {
            navigator,
            resolver: VersionResolver::new(source),
            host,
        };
        session.apply(effects).await;
        session
    }

    /// Decode `address` and start a session for it.
    pub async fn start_at(settings: ViewerSettings, address: &str, source: S, host: H) -> Result<Self> {
        let tuple = decode_address_with_page(address, &settings.default_page)?;
        Ok(Self::start(settings, tuple, source, host).await)
    }

    /// Enter a new documentation view at `address`, resetting all state.
    pub async fn enter(&mut self, address: &str) -> Result<()> {
        let tuple = self.decode(address)?;
        self.dispatch(NavMessage::ProjectEntered(tuple)).await;
        Ok(())
    }

    /// Handle an externally changed address.
    pub async fn address_changed(&mut self, address: &str) -> Result<()> {
        let tuple = self.decode(address)?;
        self.dispatch(NavMessage::AddressChanged(tuple)).await;
        Ok(())
    }

    /// Apply a message and perform every resulting effect.
    pub async fn dispatch(&mut self, message: NavMessage) {
        let effects = self.navigator.update(message);
        self.apply(effects).await;
    }

    /// The navigator.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the session, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }

    fn decode(&self, address: &str) -> Result<NavTuple> {
        decode_address_with_page(address, &self.navigator.settings().default_page)
    }

    async fn apply(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Resolve(request) => {
                    let outcome = self
                        .resolver
                        .resolve(&request.project, &request.version)
                        .await;
                    queue.extend(
                        self.navigator
                            .update(NavMessage::VersionsResolved { request, outcome }),
                    );
                }
                Effect::SetAddress(address) => self.host.set_address(&address),
                Effect::ReloadViewer(src) => self.host.load_viewer(&src),
                Effect::NavigateViewer(src) => self.host.navigate_viewer(&src),
                Effect::ShowAdvisory(advisory) => self.host.show_advisory(&advisory),
                Effect::ClearAdvisories => self.host.clear_advisories(),
            }
        }
    }
}
