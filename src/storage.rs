use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

const KEY_PREFIX: &str = "visitors_";

pub fn sheet_key(date: &str) -> String {
    format!("{KEY_PREFIX}{date}")
}

/// String-to-string store; values are the JSON text of each sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalStore {
    items: BTreeMap<String, String>,
}

impl LocalStore {
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Loads the store file. An unparsable file is moved to `<name>.corrupt` so
/// the next write cannot replace the only copy of the old sheets.
pub async fn load_store(path: &Path) -> LocalStore {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(store) => store,
            Err(err) => {
                error!("failed to parse store file {}: {err}", path.display());
                let aside = sibling(path, ".corrupt");
                match fs::rename(path, &aside).await {
                    Ok(()) => warn!("moved unreadable store to {}", aside.display()),
                    Err(err) => error!("failed to move {} aside: {err}", path.display()),
                }
                LocalStore::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => LocalStore::default(),
        Err(err) => {
            error!("failed to read store file {}: {err}", path.display());
            LocalStore::default()
        }
    }
}

pub async fn persist_store(path: &Path, store: &LocalStore) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(store)?;
    let staging = sibling(path, ".tmp");
    fs::write(&staging, payload).await?;
    fs::rename(&staging, path).await?;
    Ok(())
}
