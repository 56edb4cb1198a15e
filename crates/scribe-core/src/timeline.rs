//! Entity timelines - ordered version history with as-of lookup
//!
//! One `Timeline` holds every logged version of a single entity id, in the
//! order the log enumerated them. Construction trusts the log to be
//! chronologically append-ordered per id; entries are not re-sorted, so a
//! log violating that assumption silently produces wrong as-of answers.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// One timestamped version of an entity's fields.
///
/// Removal events are stored as tombstoned versions and are returned by
/// `as_of` like any other version; resolution does not filter them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version<T> {
    pub timestamp: DateTime<Utc>,
    pub tombstone: bool,
    pub data: T,
}

impl<T> Version<T> {
    pub fn new(timestamp: DateTime<Utc>, tombstone: bool, data: T) -> Self {
        Self {
            timestamp,
            tombstone,
            data,
        }
    }
}

/// Append-only version history of one entity id.
///
/// A timeline always holds at least one version: it is only created when
/// the first log entry for its id is recorded.
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    versions: Vec<Version<T>>,
}

impl<T> Timeline<T> {
    /// Create a timeline from its first version
    pub fn first(version: Version<T>) -> Self {
        Self {
            versions: vec![version],
        }
    }

    /// Append a version (caller supplies versions in timestamp order)
    pub fn record(&mut self, version: Version<T>) {
        self.versions.push(version);
    }

    /// The fields in effect at `at`: the last version whose timestamp is
    /// at or before `at`. When `at` precedes every version, the earliest
    /// known version is extended backward.
    pub fn as_of(&self, at: DateTime<Utc>) -> &Version<T> {
        let idx = self.versions.partition_point(|v| v.timestamp <= at);
        if idx == 0 {
            &self.versions[0]
        } else {
            &self.versions[idx - 1]
        }
    }

    /// Number of recorded versions
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Timelines for every id of one entity kind.
#[derive(Debug, Clone)]
pub struct TimelineMap<T> {
    inner: HashMap<Snowflake, Timeline<T>>,
}

impl<T> Default for TimelineMap<T> {
    fn default() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }
}

impl<T> TimelineMap<T> {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Record a version, creating the id's timeline on first sight
    pub fn record(&mut self, id: Snowflake, version: Version<T>) {
        match self.inner.get_mut(&id) {
            Some(timeline) => timeline.record(version),
            None => {
                self.inner.insert(id, Timeline::first(version));
            }
        }
    }

    /// Look up an id's timeline; an id never seen in the log is an
    /// inconsistent export and surfaces as an error built by `missing`.
    pub fn get(
        &self,
        id: Snowflake,
        missing: impl FnOnce(Snowflake) -> DomainError,
    ) -> Result<&Timeline<T>, DomainError> {
        self.inner.get(&id).ok_or_else(|| missing(id))
    }

    pub fn contains(&self, id: Snowflake) -> bool {
        self.inner.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn timeline(stamps: &[i64]) -> Timeline<i64> {
        let mut versions = stamps.iter();
        let first = *versions.next().unwrap();
        let mut t = Timeline::first(Version::new(at(first), false, first));
        for &s in versions {
            t.record(Version::new(at(s), false, s));
        }
        t
    }

    #[test]
    fn test_as_of_before_first_extends_backward() {
        let t = timeline(&[100, 200, 300]);
        assert_eq!(t.as_of(at(50)).data, 100);
    }

    #[test]
    fn test_as_of_interval_semantics() {
        // for t in [ti, ti+1) the version at ti is returned
        let t = timeline(&[100, 200, 300]);
        assert_eq!(t.as_of(at(100)).data, 100);
        assert_eq!(t.as_of(at(150)).data, 100);
        assert_eq!(t.as_of(at(200)).data, 200);
        assert_eq!(t.as_of(at(299)).data, 200);
    }

    #[test]
    fn test_as_of_past_last() {
        let t = timeline(&[100, 200, 300]);
        assert_eq!(t.as_of(at(300)).data, 300);
        assert_eq!(t.as_of(at(100_000)).data, 300);
    }

    #[test]
    fn test_tombstones_are_returned() {
        let mut t = Timeline::first(Version::new(at(100), false, "joined"));
        t.record(Version::new(at(200), true, "left"));

        let v = t.as_of(at(250));
        assert!(v.tombstone);
        assert_eq!(v.data, "left");
    }

    #[test]
    fn test_map_records_and_looks_up() {
        let mut map = TimelineMap::new();
        map.record(Snowflake::new(1), Version::new(at(10), false, "a"));
        map.record(Snowflake::new(1), Version::new(at(20), false, "b"));

        let t = map
            .get(Snowflake::new(1), DomainError::UnknownMember)
            .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.as_of(at(15)).data, "a");
    }

    #[test]
    fn test_map_unknown_id_is_an_error() {
        let map: TimelineMap<&str> = TimelineMap::new();
        let err = map
            .get(Snowflake::new(9), DomainError::UnknownMember)
            .unwrap_err();
        assert!(matches!(err, DomainError::UnknownMember(id) if id == Snowflake::new(9)));
    }
}
