//! JSON file backed store.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use hoverpane_core::logging::targets;
use parking_lot::RwLock;

use super::{PersistenceStore, StoreKey};
use crate::error::StoreError;

/// Name of the state document inside the data directory.
pub const STATE_FILE_NAME: &str = "state.json";

/// A store holding every key in one JSON document.
///
/// The whole document is rewritten on each save through a temporary file
/// and a rename, so a crash mid-write leaves the previous document intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<HashMap<String, serde_json::Value>>,
}

impl JsonFileStore {
    /// Open (or create) `state.json` inside `dir`.
    ///
    /// A missing file starts empty. A file that is not a JSON object is
    /// logged and also starts empty; it is overwritten by the next save.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(STATE_FILE_NAME);

        let data = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, serde_json::Value>>(&text) {
                Ok(data) => data,
                Err(err) => {
                    tracing::error!(
                        target: targets::STORE,
                        path = %path.display(),
                        error = %err,
                        "state file is corrupt, starting empty"
                    );
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(target: targets::STORE, path = %path.display(), keys = data.len(), "opened state file");
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, data: &HashMap<String, serde_json::Value>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(data).map_err(|source| StoreError::Encode {
            key: STATE_FILE_NAME.to_string(),
            source,
        })?;
        write_atomic(&self.path, &json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl PersistenceStore for JsonFileStore {
    fn load_raw(&self, key: StoreKey) -> Option<serde_json::Value> {
        self.data.read().get(key.as_str()).cloned()
    }

    fn save_raw(&self, key: StoreKey, value: serde_json::Value) -> Result<(), StoreError> {
        let mut data = self.data.write();
        data.insert(key.as_str().to_string(), value);
        self.flush(&data)?;
        tracing::trace!(target: targets::STORE, %key, "saved");
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        let mut data = self.data.write();
        if data.remove(key.as_str()).is_some() {
            self.flush(&data)?;
        }
        Ok(())
    }
}

/// Write `bytes` to `path` through a sibling temporary file and a rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(STATE_FILE_NAME);
    let temp_path = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

    let result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
