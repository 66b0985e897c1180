use super::migration::ledger_from_value;
use super::state::LedgerState;
use crate::error::{LedgerError, Result};
use crate::names::PlayerNameMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{rename, File};
use std::io::Write;
use std::path::Path;

/// Loads the ledger snapshot at `path`.
///
/// A missing file is a fresh start. A file that cannot be read or parsed is
/// also treated as a fresh start (with a warning).
pub fn load_ledger(path: &Path) -> Result<LedgerState> {
    let parsed = match read_if_exists(path) {
        Ok(None) => {
            log::debug!("No ledger at {:?}, starting fresh", path);
            return Ok(LedgerState::new());
        }
        Ok(Some(data)) => serde_json::from_slice(&data)
            .map_err(LedgerError::from)
            .and_then(ledger_from_value),
        Err(e) => Err(e),
    };

    match parsed {
        Ok(ledger) => {
            log::debug!(
                "Loaded ledger from {:?}: {} opportunities, {} games",
                path,
                ledger.opportunities.len(),
                ledger.processed_games.len()
            );
            Ok(ledger)
        }
        Err(e) if e.is_recoverable() => {
            log::warn!("Unreadable ledger at {:?} ({}), starting fresh", path, e);
            Ok(LedgerState::new())
        }
        Err(e) => Err(e),
    }
}

pub fn save_ledger(path: &Path, ledger: &LedgerState) -> Result<()> {
    write_json_atomic(path, ledger)
}

/// Loads the persisted name map. Missing, unreadable or malformed files
/// yield an empty map; non-string values are skipped.
pub fn load_name_map(path: &Path) -> Result<PlayerNameMap> {
    let data = match read_if_exists(path) {
        Ok(Some(data)) => data,
        Ok(None) => return Ok(PlayerNameMap::new()),
        Err(e) if e.is_recoverable() => {
            log::warn!("Unreadable name map at {:?} ({}), ignoring it", path, e);
            return Ok(PlayerNameMap::new());
        }
        Err(e) => return Err(e),
    };

    let raw: serde_json::Value = match serde_json::from_slice(&data) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Unreadable name map at {:?} ({}), ignoring it", path, e);
            return Ok(PlayerNameMap::new());
        }
    };
    let Some(object) = raw.as_object() else {
        log::warn!("Name map at {:?} is not an object, ignoring it", path);
        return Ok(PlayerNameMap::new());
    };

    let names: BTreeMap<String, String> = object
        .iter()
        .filter_map(|(id, name)| name.as_str().map(|n| (id.clone(), n.to_string())))
        .collect();
    log::debug!("Loaded {} names from {:?}", names.len(), path);
    Ok(PlayerNameMap::from(names))
}

pub fn save_name_map(path: &Path, names: &PlayerNameMap) -> Result<()> {
    write_json_atomic(path, names)
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Readers never observe a partially written file.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let Some(file_name) = path.file_name() else {
        return Err(LedgerError::InvalidPath { path: path.display().to_string() });
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_vec(value)?;

    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.flush()?;
        file.sync_all()?;
    }

    rename(&temp_path, path)?;

    log::debug!("Saved {} bytes to {:?}", data.len(), path);
    Ok(())
}
