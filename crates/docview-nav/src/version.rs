//! Version ordering for documentation sets.
//!
//! Version names come from whatever the docs host publishes: release tags such
//! as "v1.4.0" or "2.0.0-rc.1", but also free-form names like "main" or
//! "nightly". Names that parse as semantic versions are ordered by SemVer
//! precedence; everything else falls back to plain string order, so that
//! [`compare`] is a total order over arbitrary input.

use std::cmp::Ordering;
use std::fmt;

use crate::record::VersionRecord;

/// The version alias that resolves to the highest concrete version.
pub const LATEST_ALIAS: &str = "latest";

/// Returns true if `token` is the "latest" alias.
#[must_use]
pub fn is_latest_alias(token: &str) -> bool {
    token == LATEST_ALIAS
}

/// A single dot-separated pre-release identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Purely numeric identifier (e.g. the `1` in `beta.1`).
    Numeric(u64),
    /// Alphanumeric identifier (e.g. `beta`).
    AlphaNumeric(String),
}

impl Identifier {
    fn parse(s: &str) -> Option<Self> {
        if s.is_empty()
            || !s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return None;
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            s.parse().ok().map(Identifier::Numeric)
        } else {
            Some(Identifier::AlphaNumeric(s.to_string()))
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Numeric identifiers always have lower precedence than alphanumeric ones
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.cmp(b),
            (Self::Numeric(_), Self::AlphaNumeric(_)) => Ordering::Less,
            (Self::AlphaNumeric(_), Self::Numeric(_)) => Ordering::Greater,
            (Self::AlphaNumeric(a), Self::AlphaNumeric(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::AlphaNumeric(s) => f.write_str(s),
        }
    }
}

/// A parsed semantic version.
///
/// Equality and ordering follow SemVer precedence, so build metadata is
/// ignored: `1.0.0+a == 1.0.0+b`. Use [`compare`] on the raw names when a
/// strict total order is needed.
#[derive(Debug, Clone, Default)]
pub struct Version {
    /// Major version number.
    pub major: u64,
    /// Minor version number.
    pub minor: u64,
    /// Patch version number.
    pub patch: u64,
    /// Pre-release identifiers, empty for a release.
    pub pre_release: Vec<Identifier>,
    /// Build metadata, if any.
    pub build: Option<String>,
}

impl Version {
    /// Create a new release version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: Vec::new(),
            build: None,
        }
    }

    /// Check if this version is a pre-release.
    #[must_use]
    pub fn is_pre_release(&self) -> bool {
        !self.pre_release.is_empty()
    }

    /// Parse a version name, returning `None` when it is not semantic.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let s = name.trim();
        let s = s.strip_prefix('v').unwrap_or(s);

        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) if !build.is_empty() => (rest, Some(build.to_string())),
            Some(_) => return None,
            None => (s, None),
        };

        let (core, pre_release) = match rest.split_once('-') {
            Some((core, pre)) => {
                let ids = pre
                    .split('.')
                    .map(Identifier::parse)
                    .collect::<Option<Vec<_>>>()?;
                (core, ids)
            }
            None => (rest, Vec::new()),
        };

        let mut parts = core.split('.');
        let major = parse_number(parts.next()?)?;
        let minor = parse_number(parts.next()?)?;
        let patch = parse_number(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            major,
            minor,
            patch,
            pre_release,
            build,
        })
    }
}

fn parse_number(s: &str) -> Option<u64> {
    // u64::from_str accepts a leading '+', which is not valid here
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre_release.is_empty() {
            let pre: Vec<String> = self.pre_release.iter().map(ToString::to_string).collect();
            write!(f, "-{}", pre.join("."))?;
        }
        if let Some(ref build) = self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => {}
            other => return other,
        }
        match self.minor.cmp(&other.minor) {
            Ordering::Equal => {}
            other => return other,
        }
        match self.patch.cmp(&other.patch) {
            Ordering::Equal => {}
            other => return other,
        }

        // A pre-release sorts below the release it precedes: 1.0.0-rc.1 < 1.0.0
        match (self.pre_release.is_empty(), other.pre_release.is_empty()) {
            (true, true) => Ordering::Equal,
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            // Slice ordering already ranks a shorter prefix lower
            (false, false) => self.pre_release.cmp(&other.pre_release),
        }
    }
}

/// Compare two version names.
///
/// Semantic names compare by precedence with the raw string as tie-breaker,
/// any semantic name is greater than any non-semantic one, and two
/// non-semantic names compare lexically. `compare(a, b)` is `Equal` only
/// when `a == b`.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Return the highest record by name.
///
/// An empty input yields the sentinel record named [`LATEST_ALIAS`], which
/// means "no versions available" and must never be shown as a real version.
#[must_use]
pub fn latest_of(records: &[VersionRecord]) -> VersionRecord {
    records
        .iter()
        .max_by(|a, b| compare(&a.name, &b.name))
        .cloned()
        .unwrap_or_else(VersionRecord::sentinel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_version() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
        assert!(!v.is_pre_release());
    }

    #[test]
    fn test_parse_version_with_v_prefix() {
        let v = Version::parse("v1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    }

    #[test]
    fn test_parse_pre_release_and_build() {
        let v = Version::parse("2.0.0-rc.1+build.5").unwrap();
        assert_eq!(
            v.pre_release,
            vec![
                Identifier::AlphaNumeric("rc".to_string()),
                Identifier::Numeric(1)
            ]
        );
        assert_eq!(v.build.as_deref(), Some("build.5"));
        assert_eq!(v.to_string(), "2.0.0-rc.1+build.5");
    }

    #[test]
    fn test_invalid_versions() {
        for name in ["main", "1.2", "1.2.3.4", "1.+2.3", "1.2.3-", "1.2.3+", "1.2.3-a..b", ""] {
            assert!(Version::parse(name).is_none(), "{name} should not parse");
        }
    }

    #[test]
    fn test_precedence_chain() {
        // Example chain from the SemVer 2.0 specification
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.1",
            "1.1.0",
            "2.0.0",
        ];
        for pair in chain.windows(2) {
            assert_eq!(
                compare(pair[0], pair[1]),
                Ordering::Less,
                "{} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_numeric_not_lexical() {
        assert_eq!(compare("1.10.0", "1.9.0"), Ordering::Greater);
    }

    #[test]
    fn test_build_metadata_ignored_for_precedence() {
        assert_eq!(
            Version::parse("1.0.0+a").unwrap(),
            Version::parse("1.0.0+b").unwrap()
        );
        // ...but the raw name still breaks the tie
        assert_ne!(compare("1.0.0+a", "1.0.0+b"), Ordering::Equal);
    }

    #[test]
    fn test_non_semantic_fallback() {
        assert_eq!(compare("main", "1.0.0"), Ordering::Less);
        assert_eq!(compare("2.0.0", "nightly"), Ordering::Greater);
        assert_eq!(compare("main", "nightly"), Ordering::Less);
        assert_eq!(compare("main", "main"), Ordering::Equal);
    }

    #[test]
    fn test_latest_of() {
        let records = vec![
            VersionRecord::new("1.0.0"),
            VersionRecord::new("1.2.0"),
            VersionRecord::new("1.1.0"),
        ];
        assert_eq!(latest_of(&records).name, "1.2.0");
    }

    #[test]
    fn test_latest_of_empty_is_sentinel() {
        let latest = latest_of(&[]);
        assert!(latest.is_sentinel());
        assert!(is_latest_alias(&latest.name));
    }
}
