//! Mapping between the navigation tuple and the visible address.
//!
//! Address grammar:
//!
//! ```text
//! #/<project>/<version>/<percent-encoded page><fragment>[?hide-ui=true]
//! ```
//!
//! `<fragment>` is the in-document hash including its `#`. The hide-ui flag
//! follows the fragment after a `?`, or is given as an ordinary query
//! parameter on the outer URL (`https://host/viewer?hide-ui=true#/...`).
//! Both forms are accepted when decoding.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE;
use crate::error::{NavError, Result};

/// The flag marker appended to the route when the UI is hidden.
pub const HIDE_UI_MARKER: &str = "hide-ui=true";

/// Query parameter name of the hide-ui flag.
pub const HIDE_UI_PARAM: &str = "hide-ui";

/// Separator between the fragment and the flag marker.
const FLAG_SEPARATOR: char = '?';

/// Everything that determines what the viewer shows and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTuple {
    /// Project identifier.
    pub project: String,
    /// Version token: "latest", a version name, or a tag.
    pub version: String,
    /// Page path relative to the version's content root.
    pub page: String,
    /// In-document fragment including its leading `#`, or empty.
    pub hash: String,
    /// Whether the host chrome is hidden.
    pub hide_ui: bool,
}

impl NavTuple {
    /// A tuple pointing at the default page of a version.
    #[must_use]
    pub fn new(project: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            version: version.into(),
            page: DEFAULT_PAGE.to_string(),
            hash: String::new(),
            hide_ui: false,
        }
    }

    /// Set the page.
    #[must_use]
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = page.into();
        self
    }

    /// Set the hash (a missing leading `#` is added).
    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = normalize_hash(&hash.into());
        self
    }

    /// Set the hide-ui flag.
    #[must_use]
    pub fn with_hide_ui(mut self, hide_ui: bool) -> Self {
        self.hide_ui = hide_ui;
        self
    }
}

/// Ensure a non-empty hash starts with `#`.
#[must_use]
pub fn normalize_hash(hash: &str) -> String {
    if hash.is_empty() || hash.starts_with('#') {
        hash.to_string()
    } else {
        format!("#{hash}")
    }
}

/// Encode a tuple as a route: `<project>/<version>/<page><hash>[?hide-ui=true]`.
///
/// Project, version and page are each percent-encoded as one segment, so a
/// branch-style version such as `release/1.0` stays a single segment.
#[must_use]
pub fn encode_route(tuple: &NavTuple) -> String {
    let mut route = format!(
        "{}/{}/{}{}",
        urlencoding::encode(&tuple.project),
        urlencoding::encode(&tuple.version),
        urlencoding::encode(&tuple.page),
        tuple.hash
    );
    if tuple.hide_ui {
        route.push(FLAG_SEPARATOR);
        route.push_str(HIDE_UI_MARKER);
    }
    route
}

/// Encode a tuple as a hash-routed address: `#/` followed by [`encode_route`].
#[must_use]
pub fn encode_address(tuple: &NavTuple) -> String {
    format!("#/{}", encode_route(tuple))
}

/// Decode an address into a tuple.
///
/// Accepts a hash-routed address (`#/p/v/page`), a full URL carrying one
/// (`https://host/?hide-ui=true#/p/v/page`), or a bare route (`p/v/page`).
/// A missing page becomes [`DEFAULT_PAGE`].
pub fn decode_address(address: &str) -> Result<NavTuple> {
    decode_address_with_page(address, DEFAULT_PAGE)
}

/// Decode an address, using `default_page` when it names no page.
pub fn decode_address_with_page(address: &str, default_page: &str) -> Result<NavTuple> {
    let (outer, route) = split_outer(address);
    let outer_flag = outer
        .split_once('?')
        .is_some_and(|(_, query)| query_has_hide_ui(query));

    let mut tuple = decode_route_with_page(route, default_page)?;
    tuple.hide_ui |= outer_flag;
    Ok(tuple)
}

/// Decode a bare route as produced by [`encode_route`].
pub fn decode_route(route: &str) -> Result<NavTuple> {
    decode_route_with_page(route, DEFAULT_PAGE)
}

/// Decode a bare route, using `default_page` when it names no page.
pub fn decode_route_with_page(route: &str, default_page: &str) -> Result<NavTuple> {
    let route = route.trim_start_matches('/');
    let path_end = route
        .find(|c: char| c == '#' || c == FLAG_SEPARATOR)
        .unwrap_or(route.len());
    let (path, tail) = route.split_at(path_end);

    let (hash, flags) = if let Some(fragment) = tail.strip_prefix('#') {
        match fragment.split_once(FLAG_SEPARATOR) {
            Some((hash, flags)) => (format!("#{hash}"), flags),
            None => (format!("#{fragment}"), ""),
        }
    } else if let Some(flags) = tail.strip_prefix(FLAG_SEPARATOR) {
        (String::new(), flags)
    } else {
        (String::new(), "")
    };

    let mut segments = path.splitn(3, '/');
    let project = decode_segment(segments.next().unwrap_or_default())?;
    let version = decode_segment(segments.next().unwrap_or_default())?;
    if project.is_empty() || version.is_empty() {
        return Err(NavError::InvalidAddress(format!(
            "expected <project>/<version>/<page>, got '{route}'"
        )));
    }
    let page = decode_segment(segments.next().unwrap_or_default())?;
    let page = if page.is_empty() {
        default_page.to_string()
    } else {
        page
    };

    Ok(NavTuple {
        project,
        version,
        page,
        hash,
        hide_ui: flags.split('&').any(|flag| flag == HIDE_UI_MARKER),
    })
}

/// Split an address into the outer URL and the hash route.
fn split_outer(address: &str) -> (&str, &str) {
    if let Some(route) = address.strip_prefix("#/") {
        return ("", route);
    }
    let is_url = address.contains("://") || address.starts_with('/') || address.starts_with('?');
    if is_url {
        match address.split_once('#') {
            Some((outer, route)) => (outer, route),
            None => (address, ""),
        }
    } else {
        ("", address)
    }
}

fn query_has_hide_ui(query: &str) -> bool {
    query.split('&').any(|pair| match pair.split_once('=') {
        Some((key, value)) => {
            key == HIDE_UI_PARAM && urlencoding::decode(value).is_ok_and(|v| v == "true")
        }
        None => false,
    })
}

fn decode_segment(segment: &str) -> Result<String> {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| NavError::InvalidAddress(format!("bad percent-encoding in '{segment}': {e}")))
}
