//! Player display names.

use crate::models::PlayEvent;
use crate::resolve::mode_first_seen;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persistent `player id -> display name` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerNameMap {
    names: BTreeMap<String, String>,
}

impl PlayerNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Name for display; unresolved ids display as themselves.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).unwrap_or(id)
    }

    /// Fresh observations replace stale entries for the same id.
    pub fn merge_observed(&mut self, observed: &BTreeMap<String, String>) {
        for (id, name) in observed {
            self.names.insert(id.clone(), name.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<BTreeMap<String, String>> for PlayerNameMap {
    fn from(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }
}

/// Names seen in the rows fetched by the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedNames {
    /// `qb_id -> qb`
    pub quarterbacks: BTreeMap<String, String>,
    /// `passer_id -> passer`
    pub passers: BTreeMap<String, String>,
}

impl ObservedNames {
    pub fn from_plays(plays: &[PlayEvent]) -> Self {
        Self {
            quarterbacks: most_frequent_names(plays, |p| (p.qb_id.as_deref(), p.qb.as_deref())),
            passers: most_frequent_names(plays, |p| {
                (p.passer_id.as_deref(), p.passer.as_deref())
            }),
        }
    }

    /// Merge order: persisted, then quarterback names, then passer names.
    pub fn merge_into(&self, persisted: &mut PlayerNameMap) {
        persisted.merge_observed(&self.quarterbacks);
        persisted.merge_observed(&self.passers);
    }
}

/// Per id, the name it appears with most often (first seen on ties).
fn most_frequent_names<F>(plays: &[PlayEvent], columns: F) -> BTreeMap<String, String>
where
    F: Fn(&PlayEvent) -> (Option<&str>, Option<&str>),
{
    let mut seen: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for play in plays {
        if let (Some(id), Some(name)) = columns(play) {
            seen.entry(id).or_default().push(name);
        }
    }
    seen.into_iter()
        .filter_map(|(id, names)| {
            mode_first_seen(names).map(|name| (id.to_string(), name.to_string()))
        })
        .collect()
}
