//! Durable key-value storage for widget state.
//!
//! A [`PersistenceStore`] stores one JSON value per [`StoreKey`]. The typed
//! helpers on [`StoreExt`] sit on top and implement the failure policy:
//! a value that no longer decodes is logged and treated as absent, so
//! corrupt saved state can never stop the host from launching.

mod json;
mod memory;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use hoverpane_core::logging::targets;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::model::WidgetId;

pub use json::{JsonFileStore, STATE_FILE_NAME};
pub use memory::MemoryStore;

/// Every key the host persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    /// Settings of the primary clock.
    MainSettings,
    /// List of secondary clock records.
    ClockRecords,
    /// List of photo records.
    PhotoRecords,
    /// Ids of clocks that had a floating window at exit.
    OpenClockIds,
    /// Ids of photos that had a window at exit.
    OpenPhotoIds,
    /// Primary window size before the first widget docked.
    PreDockSize,
    /// Primary window origin.
    PrimaryPosition,
    /// Primary window placement preset.
    PrimaryPreset,
    /// Whether the primary window was showing at exit.
    PrimaryVisible,
}

impl StoreKey {
    /// The key's name in the backing document.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainSettings => "main_settings",
            Self::ClockRecords => "clock_records",
            Self::PhotoRecords => "photo_records",
            Self::OpenClockIds => "open_clock_ids",
            Self::OpenPhotoIds => "open_photo_ids",
            Self::PreDockSize => "pre_dock_size",
            Self::PrimaryPosition => "primary_position",
            Self::PrimaryPreset => "primary_preset",
            Self::PrimaryVisible => "primary_visible",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw key-value storage.
///
/// Methods take `&self`; implementations use interior mutability so a store
/// can be shared between the managers and the coordinator.
pub trait PersistenceStore: Send + Sync {
    /// Read the value stored under `key`.
    fn load_raw(&self, key: StoreKey) -> Option<serde_json::Value>;

    /// Replace the value stored under `key` and make it durable.
    fn save_raw(&self, key: StoreKey, value: serde_json::Value) -> Result<(), StoreError>;

    /// Delete the value stored under `key`.
    fn remove(&self, key: StoreKey) -> Result<(), StoreError>;
}

/// A store shared by every component of one host.
pub type SharedStore = Arc<dyn PersistenceStore>;

/// Typed access on top of [`PersistenceStore`].
pub trait StoreExt: PersistenceStore {
    /// Load a list of records. Missing or undecodable data yields an empty list.
    fn load_list<T: DeserializeOwned>(&self, key: StoreKey) -> Vec<T> {
        self.load_value(key).unwrap_or_default()
    }

    /// Persist a list of records.
    fn save_list<T: Serialize>(&self, key: StoreKey, records: &[T]) -> Result<(), StoreError> {
        self.save_value(key, records)
    }

    /// Load a set of widget ids. Missing or undecodable data yields an empty set.
    fn load_id_set(&self, key: StoreKey) -> BTreeSet<WidgetId> {
        self.load_value(key).unwrap_or_default()
    }

    /// Persist a set of widget ids.
    fn save_id_set(&self, key: StoreKey, ids: &BTreeSet<WidgetId>) -> Result<(), StoreError> {
        self.save_value(key, ids)
    }

    /// Load a single value, or `None` if it is missing or does not decode.
    fn load_value<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        let raw = self.load_raw(key)?;
        match serde_json::from_value(raw) {
            Ok(value) => Some(value),
            Err(source) => {
                let err = StoreError::Decode {
                    key: key.to_string(),
                    source,
                };
                tracing::warn!(target: targets::STORE, error = %err, "discarding undecodable value");
                None
            }
        }
    }

    /// Persist a single value.
    fn save_value<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_value(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.save_raw(key, raw)
    }
}

impl<S: PersistenceStore + ?Sized> StoreExt for S {}
