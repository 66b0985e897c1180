//! Quarterback attribution for a drive.
//!
//! Strategies run in order and the first one that yields an identifier wins:
//! 1. most frequent `qb_id` across the drive
//! 2. most frequent `passer_id` among pass attempts
//!
//! When neither applies the drive is credited to a `TEAM_<posteam>`
//! placeholder, which never ranks on a leaderboard.

use crate::models::PlayEvent;
use crate::names::PlayerNameMap;
use std::collections::{BTreeMap, HashMap};

pub const PLACEHOLDER_PREFIX: &str = "TEAM_";
const UNKNOWN_TEAM: &str = "UNK";

/// Name lookups available while resolving.
#[derive(Debug, Clone, Copy)]
pub struct NameSources<'a> {
    /// `qb_id -> qb` observed in the current fetch
    pub quarterbacks: &'a BTreeMap<String, String>,
    /// Persisted map merged with fresh passer observations
    pub passers: &'a PlayerNameMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlayer {
    pub id: String,
    pub name: String,
}

/// An identifier plus its name if the strategy's lookup knew it.
type Attribution = (String, Option<String>);
type Strategy = fn(&[&PlayEvent], &NameSources<'_>) -> Option<Attribution>;

const STRATEGIES: [Strategy; 2] = [by_drive_quarterback, by_most_frequent_passer];

/// Most frequent value; ties go to the value seen first.
pub fn mode_first_seen<'v, I>(values: I) -> Option<&'v str>
where
    I: IntoIterator<Item = &'v str>,
{
    let mut counts: HashMap<&'v str, (usize, usize)> = HashMap::new();
    for (order, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, order)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

pub fn by_drive_quarterback(drive: &[&PlayEvent], names: &NameSources<'_>) -> Option<Attribution> {
    let id = mode_first_seen(drive.iter().filter_map(|p| p.qb_id.as_deref()))?;
    Some((id.to_string(), names.quarterbacks.get(id).cloned()))
}

pub fn by_most_frequent_passer(
    drive: &[&PlayEvent],
    names: &NameSources<'_>,
) -> Option<Attribution> {
    let passers = drive
        .iter()
        .filter(|p| p.is_pass_attempt())
        .filter_map(|p| p.passer_id.as_deref());
    let id = mode_first_seen(passers)?;
    Some((id.to_string(), names.passers.get(id).map(str::to_string)))
}

pub fn placeholder_id(offense: Option<&str>) -> String {
    format!("{}{}", PLACEHOLDER_PREFIX, offense.unwrap_or(UNKNOWN_TEAM))
}

pub fn is_placeholder(id: &str) -> bool {
    id.starts_with(PLACEHOLDER_PREFIX)
}

/// Always returns a non-empty id; an unknown name displays as the id.
pub fn resolve_player(
    drive: &[&PlayEvent],
    offense: Option<&str>,
    names: &NameSources<'_>,
) -> ResolvedPlayer {
    let found = STRATEGIES.iter().find_map(|strategy| strategy(drive, names));
    match found {
        Some((id, name)) => {
            let name = name.unwrap_or_else(|| id.clone());
            ResolvedPlayer { id, name }
        }
        None => {
            let id = placeholder_id(offense);
            ResolvedPlayer { name: id.clone(), id }
        }
    }
}
