use crate::errors::AppError;
use crate::models::Record;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub const DEFAULT_DATA_PATH: &str = "data/state.json";

pub enum StoredRecord {
    Missing,
    /// Present but not readable as a JSON object.
    Unusable,
    Found(Map<String, Value>),
}

pub async fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Reads the persisted document as raw JSON.
pub async fn read_record(path: &Path) -> StoredRecord {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => StoredRecord::Found(map),
            Ok(_) => {
                warn!("data file {} is not a JSON object", path.display());
                StoredRecord::Unusable
            }
            Err(err) => {
                warn!("failed to parse data file {}: {err}", path.display());
                StoredRecord::Unusable
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoredRecord::Missing,
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            StoredRecord::Unusable
        }
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Copies a data file that could not be fully loaded to `<path>.bak`, so the
/// next save does not destroy what was rejected.
pub async fn backup_rejected(path: &Path) -> Option<PathBuf> {
    let backup = backup_path(path);
    match fs::copy(path, &backup).await {
        Ok(_) => {
            warn!("kept a copy of the rejected data file at {}", backup.display());
            Some(backup)
        }
        Err(err) => {
            error!("failed to back up data file {}: {err}", path.display());
            None
        }
    }
}

pub async fn persist_data(path: &Path, data: &Record) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
