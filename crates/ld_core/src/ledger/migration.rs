use super::state::LedgerState;
use super::DEFAULT_LAST_SEASON;
use crate::error::{LedgerError, Result};
use crate::models::{LegacyDriveRow, Opportunity};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Builds a ledger from a parsed snapshot, tolerating older layouts.
///
/// Missing keys take fresh-start defaults. Entries that do not parse are
/// dropped with a warning instead of failing the whole load. A top-level
/// value that is not an object is a schema error.
pub fn ledger_from_value(value: Value) -> Result<LedgerState> {
    let mut root = match value {
        Value::Null => return Ok(LedgerState::new()),
        Value::Object(map) => map,
        other => {
            return Err(LedgerError::Schema(format!(
                "expected a JSON object at the top level, found {}",
                kind(&other)
            )))
        }
    };

    let opportunities: Vec<Opportunity> = entries(&mut root, "opportunities");
    let legacydrive_rows: Vec<LegacyDriveRow> = entries(&mut root, "legacydrive_rows");
    let processed_games = processed_games(&mut root);
    let last_season_processed = last_season(root.get("last_season_processed"));
    let last_updated = root
        .get("last_updated")
        .and_then(Value::as_str)
        .map(str::to_string);

    if opportunities.len() != legacydrive_rows.len() {
        log::warn!(
            "Snapshot has {} opportunities but {} detail rows",
            opportunities.len(),
            legacydrive_rows.len()
        );
    }

    Ok(LedgerState {
        opportunities,
        processed_games,
        last_season_processed,
        legacydrive_rows,
        last_updated,
    })
}

fn entries<T: DeserializeOwned>(root: &mut Map<String, Value>, key: &str) -> Vec<T> {
    let items = match root.remove(key) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            log::warn!("Ignoring '{}': expected a list, found {}", key, kind(&other));
            return Vec::new();
        }
    };

    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Dropping {}[{}]: {}", key, i, e);
                None
            }
        })
        .collect();

    if parsed.len() != total {
        log::info!("Kept {} of {} '{}' entries", parsed.len(), total, key);
    }
    parsed
}

fn processed_games(root: &mut Map<String, Value>) -> BTreeSet<String> {
    match root.remove("processed_games") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(id) => Some(id),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => BTreeSet::new(),
    }
}

/// Zero, null and unparseable values all mean "never processed".
fn last_season(value: Option<&Value>) -> i32 {
    let season = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|s| i32::try_from(s).ok()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f as i32),
        _ => None,
    };
    match season {
        Some(s) if s != 0 => s,
        _ => DEFAULT_LAST_SEASON,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
