//! Version records and the ordered set fetched for a project.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::version::{LATEST_ALIAS, compare, latest_of};

/// A concrete, published documentation version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Version name as published (e.g. "1.4.0", "v2.0.0-rc.1", "main").
    pub name: String,

    /// Alternate names that also resolve to this version (e.g. "stable").
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl VersionRecord {
    /// Create a record without tags.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeSet::new(),
        }
    }

    /// Create a record with tags.
    #[must_use]
    pub fn with_tags<I, T>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// The "no versions available" placeholder returned by [`latest_of`] on empty input.
    #[must_use]
    pub fn sentinel() -> Self {
        Self::new(LATEST_ALIAS)
    }

    /// Whether this is the placeholder record rather than a real version.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.name == LATEST_ALIAS
    }

    /// Whether `token` names this record, either directly or through a tag.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.tags.contains(token)
    }
}

/// The versions fetched for one project, sorted ascending.
///
/// Immutable once built; a new set is fetched when the project changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionSet {
    records: Vec<VersionRecord>,
    fetched_at: Option<DateTime<Utc>>,
}

impl VersionSet {
    /// Build a sorted set from fetched records.
    ///
    /// Records named like the "latest" alias are dropped: the alias is never a
    /// concrete version.
    #[must_use]
    pub fn from_records(records: Vec<VersionRecord>) -> Self {
        let mut records: Vec<VersionRecord> = records
            .into_iter()
            .filter(|record| {
                if record.is_sentinel() {
                    tracing::warn!("Ignoring published version named '{}'", LATEST_ALIAS);
                    false
                } else {
                    true
                }
            })
            .collect();
        records.sort_by(|a, b| compare(&a.name, &b.name));

        Self {
            records,
            fetched_at: Some(Utc::now()),
        }
    }

    /// An empty set, used while resolution is in progress.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Records in ascending order (the version-picker order).
    #[must_use]
    pub fn records(&self) -> &[VersionRecord] {
        &self.records
    }

    /// Number of versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no versions are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the set was fetched, `None` for the empty placeholder.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// The highest version, or the sentinel record when the set is empty.
    #[must_use]
    pub fn latest(&self) -> VersionRecord {
        latest_of(&self.records)
    }

    /// Find the record a version token names (by name first, then by tag).
    #[must_use]
    pub fn find(&self, token: &str) -> Option<&VersionRecord> {
        self.records
            .iter()
            .find(|record| record.name == token)
            .or_else(|| self.records.iter().find(|record| record.tags.contains(token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_records_sorts_ascending() {
        let set = VersionSet::from_records(vec![
            VersionRecord::new("1.0.0"),
            VersionRecord::new("1.2.0"),
            VersionRecord::new("1.1.0"),
        ]);
        let names: Vec<&str> = set.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["1.0.0", "1.1.0", "1.2.0"]);
        assert!(set.fetched_at().is_some());
    }

    #[test]
    fn test_from_records_drops_alias() {
        let set = VersionSet::from_records(vec![
            VersionRecord::new("latest"),
            VersionRecord::new("1.0.0"),
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.latest().name, "1.0.0");
    }

    #[test]
    fn test_find_by_name_and_tag() {
        let set = VersionSet::from_records(vec![
            VersionRecord::with_tags("1.0.0", ["stable"]),
            VersionRecord::with_tags("2.0.0-beta.1", ["next"]),
        ]);
        assert_eq!(set.find("stable").map(|r| r.name.as_str()), Some("1.0.0"));
        assert_eq!(
            set.find("2.0.0-beta.1").map(|r| r.name.as_str()),
            Some("2.0.0-beta.1")
        );
        assert!(set.find("3.0.0").is_none());
    }

    #[test]
    fn test_name_wins_over_tag() {
        let set = VersionSet::from_records(vec![
            VersionRecord::with_tags("1.0.0", ["2.0.0"]),
            VersionRecord::new("2.0.0"),
        ]);
        assert_eq!(set.find("2.0.0").map(|r| r.name.as_str()), Some("2.0.0"));
    }

    #[test]
    fn test_deserialize_without_tags() {
        let record: VersionRecord = serde_json::from_str(r#"{"name": "1.0.0"}"#).unwrap();
        assert_eq!(record, VersionRecord::new("1.0.0"));
    }

    #[test]
    fn test_empty_latest_is_sentinel() {
        assert!(VersionSet::empty().latest().is_sentinel());
    }
}
