//! Navigation core for embedded, versioned documentation.
//!
//! A documentation page embeds an externally hosted docs set in a viewer
//! and has to keep three things consistent: the visible address, the
//! viewer's own navigation, and the list of published versions. This crate
//! holds that logic without touching a browser or the network directly.
//!
//! # Overview
//!
//! - [`version`] orders version names (SemVer with a string fallback) and
//!   finds the latest one.
//! - [`resolver`] fetches a project's versions and resolves a requested
//!   token, including the `latest` alias.
//! - [`address`] maps the navigation tuple to and from the address.
//! - [`navigator`] is the state machine that reacts to address changes,
//!   viewer reports and user actions.
//! - [`advisory`] raises and clears the "outdated version" notice.
//! - [`session`] performs the navigator's effects against a [`VersionSource`]
//!   and a [`Host`].
//!
//! # Example
//!
//! ```no_run
//! use docview_nav::{RecordingHost, Session, StaticVersionSource, VersionRecord, ViewerSettings};
//!
//! async fn open() -> docview_nav::Result<()> {
//!     let source = StaticVersionSource::new().with_project(
//!         "demo",
//!         vec![VersionRecord::new("1.0.0"), VersionRecord::new("1.1.0")],
//!     );
//!     let session = Session::start_at(
//!         ViewerSettings::default(),
//!         "#/demo/latest/index.html",
//!         source,
//!         RecordingHost::new(),
//!     )
//!     .await?;
//!
//!     assert_eq!(session.navigator().tuple().version, "1.1.0");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod error;
pub mod record;
pub mod version;

// Resolution and addresses
pub mod address;
pub mod resolver;
pub mod source;

// State machine
pub mod advisory;
pub mod message;
pub mod navigator;
pub mod session;

// Re-export main types for convenience
pub use address::{
    NavTuple, decode_address, decode_address_with_page, decode_route, decode_route_with_page,
    encode_address, encode_route,
};
pub use advisory::{Advisory, AdvisoryKind, OutdatedNotifier, Severity, Ttl};
pub use config::{DEFAULT_PAGE, ViewerSettings};
pub use error::{NavError, Result};
pub use message::{Effect, NavMessage, ResolveRequest};
pub use navigator::{LoadState, Navigator};
pub use record::{VersionRecord, VersionSet};
pub use resolver::{Resolution, VersionResolver, select};
pub use session::{Host, RecordingHost, Session};
pub use source::{HttpVersionSource, StaticVersionSource, VersionSource, docs_source_address};
pub use version::{LATEST_ALIAS, Version, compare, is_latest_alias, latest_of};
