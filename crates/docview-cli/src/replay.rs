//! Scripted navigation replays.
//!
//! A script opens a session at `start` and feeds it a list of events, as if
//! a user and an embedded viewer produced them. Every effect the session
//! performs is recorded per event, so a script doubles as a trace of the
//! navigator's behavior.
//!
//! ```json
//! {
//!   "start": "#/demo/latest/index.html",
//!   "events": [
//!     { "event": "viewer_page", "page": "guide.html" },
//!     { "event": "select_version", "version": "1.0.0" }
//!   ]
//! }
//! ```

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use docview_nav::{
    Effect, LoadState, NavMessage, RecordingHost, Session, VersionSource, ViewerSettings,
    decode_address_with_page,
};

/// A replay script.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Address the session starts at.
    pub start: String,
    /// Events applied after startup, in order.
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Parse a script from JSON.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parse replay script")
    }

    /// Load a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read replay script {}", path.display()))?;
        Self::from_json_str(&raw)
    }
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Enter a new documentation view.
    Enter { address: String },
    /// The address changed outside the viewer.
    Address { address: String },
    /// The viewer reported a new page.
    ViewerPage {
        page: String,
        #[serde(default)]
        hash: String,
    },
    /// The viewer reported a new fragment.
    ViewerHash { hash: String },
    /// The user picked a version.
    SelectVersion { version: String },
    /// The user hid the UI.
    HideUi,
}

impl ScriptEvent {
    fn into_message(self, default_page: &str) -> Result<NavMessage> {
        Ok(match self {
            Self::Enter { address } => NavMessage::ProjectEntered(
                decode_address_with_page(&address, default_page)
                    .with_context(|| format!("decode {address}"))?,
            ),
            Self::Address { address } => NavMessage::AddressChanged(
                decode_address_with_page(&address, default_page)
                    .with_context(|| format!("decode {address}"))?,
            ),
            Self::ViewerPage { page, hash } => NavMessage::ViewerPageChanged { page, hash },
            Self::ViewerHash { hash } => NavMessage::ViewerHashChanged(hash),
            Self::SelectVersion { version } => NavMessage::VersionSelected(version),
            Self::HideUi => NavMessage::HideUiRequested,
        })
    }

    fn label(&self) -> String {
        match self {
            Self::Enter { address } => format!("enter {address}"),
            Self::Address { address } => format!("address {address}"),
            Self::ViewerPage { page, hash } => format!("viewer_page {page}{hash}"),
            Self::ViewerHash { hash } => format!("viewer_hash {hash}"),
            Self::SelectVersion { version } => format!("select_version {version}"),
            Self::HideUi => "hide_ui".to_string(),
        }
    }
}

/// Effects recorded for one step of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    /// Position in the script; startup is step 0.
    pub step: usize,
    /// What happened.
    pub event: String,
    /// Effects performed in response.
    pub effects: Vec<Effect>,
}

/// The full trace of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayTrace {
    /// One entry per step, startup first.
    pub steps: Vec<ReplayStep>,
    /// Address after the last step.
    pub final_address: String,
    /// Load state after the last step.
    pub final_state: String,
}

impl ReplayTrace {
    /// Human-readable rendering, one line per event and effect.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let _ = writeln!(out, "[{}] {}", step.step, step.event);
            for effect in &step.effects {
                let _ = writeln!(out, "    {}", describe_effect(effect));
            }
        }
        let _ = write!(out, "=> {} ({})", self.final_address, self.final_state);
        out
    }

    /// One JSON object per line, steps first, then the final state.
    pub fn to_json_lines(&self) -> Result<String> {
        let mut lines = Vec::with_capacity(self.steps.len() + 1);
        for step in &self.steps {
            lines.push(serde_json::to_string(step).context("serialize replay step")?);
        }
        lines.push(
            serde_json::json!({
                "final_address": self.final_address,
                "final_state": self.final_state,
            })
            .to_string(),
        );
        Ok(lines.join("\n"))
    }
}

/// Run `script` through a session backed by `source`.
pub async fn replay<S: VersionSource>(
    settings: ViewerSettings,
    source: S,
    script: Script,
) -> Result<ReplayTrace> {
    let default_page = settings.default_page.clone();
    let mut session = Session::start_at(settings, &script.start, source, RecordingHost::new())
        .await
        .with_context(|| format!("start session at {}", script.start))?;

    let mut steps = vec![ReplayStep {
        step: 0,
        event: format!("start {}", script.start),
        effects: session.host_mut().drain(),
    }];

    for (index, event) in script.events.into_iter().enumerate() {
        let label = event.label();
        tracing::debug!("Replay step {}: {}", index + 1, label);
        session.dispatch(event.into_message(&default_page)?).await;
        steps.push(ReplayStep {
            step: index + 1,
            event: label,
            effects: session.host_mut().drain(),
        });
    }

    let navigator = session.navigator();
    Ok(ReplayTrace {
        steps,
        final_address: navigator.address(),
        final_state: describe_state(navigator.load_state()),
    })
}

/// Text form of an effect.
#[must_use]
pub fn describe_effect(effect: &Effect) -> String {
    match effect {
        Effect::SetAddress(address) => format!("set_address {address}"),
        Effect::ReloadViewer(src) => format!("reload_viewer {src}"),
        Effect::NavigateViewer(src) => format!("navigate_viewer {src}"),
        Effect::Resolve(request) => format!(
            "resolve #{} {}@{}",
            request.id, request.project, request.version
        ),
        Effect::ShowAdvisory(advisory) => format!("show_advisory {advisory}"),
        Effect::ClearAdvisories => "clear_advisories".to_string(),
    }
}

fn describe_state(state: &LoadState) -> String {
    match state {
        LoadState::Loading => "loading".to_string(),
        LoadState::Ready => "ready".to_string(),
        LoadState::Failed(err) => format!("not found: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = Script::from_json_str(
            r##"{
                "start": "#/demo/latest/index.html",
                "events": [
                    {"event": "viewer_page", "page": "guide.html"},
                    {"event": "viewer_hash", "hash": "#top"},
                    {"event": "hide_ui"}
                ]
            }"##,
        )
        .unwrap();
        assert_eq!(script.events.len(), 3);
        assert_eq!(
            script.events[0],
            ScriptEvent::ViewerPage {
                page: "guide.html".to_string(),
                hash: String::new(),
            }
        );
        assert_eq!(script.events[2], ScriptEvent::HideUi);
    }

    #[test]
    fn test_parse_script_rejects_unknown_event() {
        let result = Script::from_json_str(r##"{"start": "#/a/b", "events": [{"event": "jump"}]}"##);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_address_event_fails() {
        let event = ScriptEvent::Address {
            address: "#/only-project".to_string(),
        };
        assert!(event.into_message("index.html").is_err());
    }
}
