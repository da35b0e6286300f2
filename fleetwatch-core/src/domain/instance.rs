//! Instance domain model
//!
//! Per-instance runtime status of a worker, and the histogram of
//! instance states derived from it.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Runtime state of a single application instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstanceState {
    Running,
    Flapping,
    Crashed,
    Down,
    Starting,
    Other(String),
}

impl From<String> for InstanceState {
    fn from(label: String) -> Self {
        match label.as_str() {
            "RUNNING" => InstanceState::Running,
            "FLAPPING" => InstanceState::Flapping,
            "CRASHED" => InstanceState::Crashed,
            "DOWN" => InstanceState::Down,
            "STARTING" => InstanceState::Starting,
            _ => InstanceState::Other(label),
        }
    }
}

impl From<InstanceState> for String {
    fn from(state: InstanceState) -> Self {
        state.to_string()
    }
}

impl std::fmt::Display for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceState::Running => write!(f, "RUNNING"),
            InstanceState::Flapping => write!(f, "FLAPPING"),
            InstanceState::Crashed => write!(f, "CRASHED"),
            InstanceState::Down => write!(f, "DOWN"),
            InstanceState::Starting => write!(f, "STARTING"),
            InstanceState::Other(label) => write!(f, "{}", label),
        }
    }
}

/// Status entry for one instance
///
/// The platform reports more fields (usage, uptime, ...); only the state is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceStatus {
    pub state: InstanceState,
}

impl InstanceStatus {
    pub fn new(state: InstanceState) -> Self {
        Self { state }
    }
}

/// Per-instance status keyed by instance index
///
/// Keys are usually numeric strings but are not guaranteed to be contiguous
/// or even numeric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceStatusMap(BTreeMap<String, InstanceStatus>);

impl InstanceStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in instance order: numeric indices ascending, then
    /// any non-numeric keys in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstanceStatus)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by_key(|(key, _)| match key.parse::<u64>() {
            Ok(index) => (false, index),
            Err(_) => (true, 0),
        });
        entries
            .into_iter()
            .map(|(key, status)| (key.as_str(), status))
    }
}

impl<K: Into<String>> FromIterator<(K, InstanceStatus)> for InstanceStatusMap {
    fn from_iter<I: IntoIterator<Item = (K, InstanceStatus)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Count of instances per state
///
/// Keeps labels in the order they were first seen; serializes as a JSON
/// object in that same order, e.g. `{"RUNNING":1,"CRASHED":1}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateHistogram {
    counts: Vec<(InstanceState, usize)>,
}

impl StateHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one more instance in `state`
    pub fn record(&mut self, state: &InstanceState) {
        match self.counts.iter_mut().find(|(seen, _)| seen == state) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((state.clone(), 1)),
        }
    }

    /// Number of instances recorded in `state`
    pub fn count(&self, state: &InstanceState) -> usize {
        self.counts
            .iter()
            .find(|(seen, _)| seen == state)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Number of instances recorded across all states
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InstanceState, usize)> {
        self.counts.iter().map(|(state, count)| (state, *count))
    }
}

impl Serialize for StateHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (state, count) in &self.counts {
            map.serialize_entry(&state.to_string(), count)?;
        }
        map.end()
    }
}
