//! Clock-specific operations: creating clocks and changing their timezone.

use hoverpane_core::logging::targets;

use crate::model::{ClockRecord, SettingsRecord, WidgetId};
use crate::window::WindowDriver;

use super::ClockManager;

impl ClockManager {
    /// Create a clock for `timezone_id` and dock it.
    ///
    /// New clocks start from `settings`, normally a copy of the primary
    /// clock's settings.
    pub fn add_clock(
        &mut self,
        label: impl Into<String>,
        timezone_id: impl Into<String>,
        settings: SettingsRecord,
        driver: &mut impl WindowDriver,
    ) -> Option<WidgetId> {
        self.add(ClockRecord::new(label, timezone_id, settings), driver)
    }

    /// Change the timezone of a clock. Unknown timezone ids are rejected.
    pub fn set_timezone(&mut self, id: WidgetId, timezone_id: &str) -> bool {
        if timezone_id.parse::<chrono_tz::Tz>().is_err() {
            tracing::warn!(
                target: targets::MANAGER,
                %id,
                timezone_id,
                "unknown timezone"
            );
            return false;
        }
        let Some(record) = self.record_mut(id) else {
            tracing::debug!(target: targets::MANAGER, %id, "set_timezone: unknown widget");
            return false;
        };
        record.timezone_id = timezone_id.to_string();
        self.persist_records();
        self.emit_records();
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::manager::ManagerOptions;
    use crate::store::{MemoryStore, PersistenceStore, SharedStore, StoreKey};
    use crate::window::{CoordinatorConfig, HeadlessHost, WindowCoordinator};

    #[test]
    fn test_add_clock_and_change_timezone() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut coordinator =
            WindowCoordinator::new(Box::new(HeadlessHost::default()), store.clone(), CoordinatorConfig::default());
        coordinator.open_primary(&SettingsRecord::default(), 0).unwrap();
        let mut clocks = ClockManager::load(store, ManagerOptions::default());

        let id = clocks
            .add_clock("Tokyo", "Asia/Tokyo", SettingsRecord::default(), &mut coordinator)
            .unwrap();
        assert!(clocks.set_timezone(id, "America/New_York"));
        assert!(!clocks.set_timezone(id, "Mars/Olympus"));
        assert_eq!(clocks.get(id).unwrap().timezone_id, "America/New_York");
    }

    #[test]
    fn test_set_timezone_unknown_widget() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut clocks = ClockManager::load(store.clone(), ManagerOptions::default());

        assert!(!clocks.set_timezone(WidgetId::from_raw(7), "Asia/Tokyo"));
        assert!(clocks.records().is_empty());
        assert!(store.load_raw(StoreKey::ClockRecords).is_none());
    }
}
