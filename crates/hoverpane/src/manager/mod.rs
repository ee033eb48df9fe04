//! Widget managers.
//!
//! One [`WidgetManager`] exists per widget kind. It owns the authoritative
//! record list, the map from widget id to live panel, and the set of ids
//! that should reopen as floating windows on the next launch. Every mutation
//! goes through a manager method, which persists the change and then
//! notifies observers through the manager's signals.
//!
//! Operations on unknown ids are logged at debug level and ignored: a record
//! can disappear between a menu being built and an item being clicked.

mod clock;
mod dock;
mod photo;

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use hoverpane_core::logging::targets;
use hoverpane_core::{ApplyGuard, Point, Rect, Signal};

use crate::model::{
    ClockRecord, Geometry, PhotoRecord, SettingsRecord, WidgetId, WidgetKind, WidgetRecord,
    fit_to_screen,
};
use crate::store::{SharedStore, StoreExt, StoreKey};
use crate::window::{PanelId, PanelOwner, PanelSpec, WindowDriver};

pub use photo::{PHOTO_DEFAULT_LONG_SIDE, import_photo};

/// Manager of secondary clocks.
pub type ClockManager = WidgetManager<ClockRecord>;

/// Manager of photo widgets.
pub type PhotoManager = WidgetManager<PhotoRecord>;

/// Construction options of a [`WidgetManager`].
#[derive(Debug, Clone, Default)]
pub struct ManagerOptions {
    /// Directory holding resources owned by records, such as stored photos.
    pub resource_dir: Option<PathBuf>,
    /// Cascade step between newly placed widgets.
    pub new_widget_offset: f64,
}

/// Owner of every record of one widget kind.
pub struct WidgetManager<R: WidgetRecord> {
    records: Vec<R>,
    live: HashMap<WidgetId, PanelId>,
    open_ids: BTreeSet<WidgetId>,
    store: SharedStore,
    options: ManagerOptions,
    apply_guard: ApplyGuard,
    records_changed: Signal<Vec<R>>,
    dock_changed: Signal<usize>,
    window_opened: Signal<WidgetId>,
    window_closed: Signal<WidgetId>,
}

impl<R: WidgetRecord> WidgetManager<R> {
    /// Load the records and open-window set of this kind from `store`.
    ///
    /// Docked records are put back in their stored dock order before the
    /// order is made dense again.
    pub fn load(store: SharedStore, options: ManagerOptions) -> Self {
        let (list_key, open_key) = Self::keys();
        let mut records: Vec<R> = store.load_list(list_key);
        normalize_dock_order(&mut records);
        let open_ids = store.load_id_set(open_key);

        tracing::info!(
            target: targets::MANAGER,
            kind = %R::KIND,
            records = records.len(),
            open = open_ids.len(),
            "loaded widgets"
        );

        Self {
            records,
            live: HashMap::new(),
            open_ids,
            store,
            options,
            apply_guard: ApplyGuard::new(),
            records_changed: Signal::new(),
            dock_changed: Signal::new(),
            window_opened: Signal::new(),
            window_closed: Signal::new(),
        }
    }

    fn keys() -> (StoreKey, StoreKey) {
        match R::KIND {
            WidgetKind::Clock => (StoreKey::ClockRecords, StoreKey::OpenClockIds),
            WidgetKind::Photo => (StoreKey::PhotoRecords, StoreKey::OpenPhotoIds),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All records, in list order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: WidgetId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Number of docked records.
    pub fn docked_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_docked()).count()
    }

    /// Docked records in dock order.
    pub fn docked(&self) -> impl Iterator<Item = &R> {
        self.records.iter().filter(|r| r.is_docked())
    }

    /// Returns `true` if the widget has a live floating window.
    pub fn is_open(&self, id: WidgetId) -> bool {
        self.live.contains_key(&id)
    }

    /// The live panel of a widget.
    pub fn panel_of(&self, id: WidgetId) -> Option<PanelId> {
        self.live.get(&id).copied()
    }

    /// Ids that will reopen as floating windows on the next launch.
    pub fn open_ids(&self) -> &BTreeSet<WidgetId> {
        &self.open_ids
    }

    /// Absolute path of the resource a record owns.
    pub fn resource_path(&self, id: WidgetId) -> Option<PathBuf> {
        let file = self.get(id)?.owned_resource()?;
        Some(self.options.resource_dir.as_ref()?.join(file))
    }

    /// The guard held while [`WidgetManager::apply_settings_to_all`] runs.
    pub fn apply_guard(&self) -> &ApplyGuard {
        &self.apply_guard
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Emitted with a copy of the record list after every change.
    pub fn records_changed(&self) -> &Signal<Vec<R>> {
        &self.records_changed
    }

    /// Emitted with the docked count whenever the docked set or its order changes.
    pub fn dock_changed(&self) -> &Signal<usize> {
        &self.dock_changed
    }

    pub fn window_opened(&self) -> &Signal<WidgetId> {
        &self.window_opened
    }

    pub fn window_closed(&self) -> &Signal<WidgetId> {
        &self.window_closed
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a new record.
    ///
    /// Unplaced records get a default position. Dockable records join the
    /// primary window at the end of the dock order; other records open a
    /// floating window. Returns `None` if the record is rejected.
    pub fn add(&mut self, mut record: R, driver: &mut impl WindowDriver) -> Option<WidgetId> {
        let id = record.id();
        if let Err(err) = record.validate() {
            tracing::warn!(target: targets::MANAGER, kind = %R::KIND, error = %err, "rejected new widget");
            return None;
        }
        if self.index_of(id).is_some() {
            tracing::warn!(target: targets::MANAGER, kind = %R::KIND, %id, "widget already exists");
            return None;
        }

        if record.geometry().is_unplaced() {
            let placed = self.default_geometry(record.geometry(), &*driver);
            record.set_geometry(placed);
        }

        let next_order = self.next_dock_order();
        let docks = match record.dock_state_mut() {
            Some(dock) => {
                dock.is_docked = true;
                dock.dock_order = next_order;
                true
            }
            None => false,
        };

        self.records.push(record);
        resequence(&mut self.records);
        self.persist_records();
        tracing::info!(target: targets::MANAGER, kind = %R::KIND, %id, docked = docks, "widget added");

        if docks {
            self.notify_dock_changed(driver);
        } else {
            self.open(id, driver);
        }
        self.emit_records();
        Some(id)
    }

    /// Remove a record, closing its window and deleting its resource file.
    pub fn remove(&mut self, id: WidgetId, driver: &mut impl WindowDriver) {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "remove: unknown widget");
            return;
        };

        if let Some(panel) = self.live.remove(&id) {
            driver.destroy(panel);
            self.window_closed.emit(id);
        }
        let open_changed = self.open_ids.remove(&id);

        let record = self.records.remove(index);
        if let Some(file) = record.owned_resource() {
            self.delete_resource(file);
        }

        resequence(&mut self.records);
        self.persist_records();
        if open_changed {
            self.persist_open_ids();
        }
        tracing::info!(target: targets::MANAGER, kind = %R::KIND, %id, "widget removed");

        self.emit_records();
        if record.is_docked() {
            self.notify_dock_changed(driver);
        }
    }

    /// Show a widget's floating window, or raise it if already open.
    ///
    /// For a docked widget this shows the primary window instead.
    pub fn open(&mut self, id: WidgetId, driver: &mut impl WindowDriver) {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "open: unknown widget");
            return;
        };
        if self.records[index].is_docked() {
            driver.show_primary();
            return;
        }
        if let Some(&panel) = self.live.get(&id) {
            driver.bring_to_front(panel);
            return;
        }

        if self.records[index].geometry().is_unplaced() {
            let placed = self.default_geometry(self.records[index].geometry(), &*driver);
            self.records[index].set_geometry(placed);
            self.persist_records();
        }

        let record = &self.records[index];
        let spec = PanelSpec {
            owner: PanelOwner::Widget(R::KIND, id),
            title: record.label(),
            frame: record.geometry().to_rect(),
            settings: record.settings(),
        };
        let Some(panel) = driver.materialize(spec) else {
            return;
        };

        self.live.insert(id, panel);
        if self.open_ids.insert(id) {
            self.persist_open_ids();
        }
        tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, panel = panel.as_raw(), "window opened");
        self.window_opened.emit(id);
    }

    /// Close a widget's floating window. The record is kept.
    pub fn close(&mut self, id: WidgetId, driver: &mut impl WindowDriver) {
        if !self.unregister(id, driver) {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "close: no open window");
        }
    }

    /// Open the window if closed, close it if open.
    pub fn toggle(&mut self, id: WidgetId, driver: &mut impl WindowDriver) {
        if self.is_open(id) {
            self.close(id, driver);
        } else {
            self.open(id, driver);
        }
    }

    /// The user closed the window through the platform.
    pub fn window_closed_by_user(&mut self, id: WidgetId, driver: &mut impl WindowDriver) {
        self.unregister(id, driver);
    }

    /// Record a new frame reported by the window.
    pub fn update_geometry(&mut self, id: WidgetId, frame: Rect) {
        let Some(record) = self.record_mut(id) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "geometry for unknown widget");
            return;
        };
        let geometry = Geometry::from(frame);
        if record.geometry() == geometry {
            return;
        }
        record.set_geometry(geometry);
        self.persist_records();
        self.emit_records();
    }

    /// Rename a widget.
    pub fn rename(&mut self, id: WidgetId, label: impl Into<String>) {
        let Some(record) = self.record_mut(id) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "rename: unknown widget");
            return;
        };
        record.set_label(label.into());
        self.persist_records();
        self.emit_records();
    }

    /// Edit one widget's settings.
    pub fn update_settings(
        &mut self,
        id: WidgetId,
        mutate: impl FnOnce(&mut SettingsRecord),
        driver: &mut impl WindowDriver,
    ) {
        let panel = self.live.get(&id).copied();
        let Some(record) = self.record_mut(id) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "settings for unknown widget");
            return;
        };
        mutate(record.settings_mut());
        if let Some(panel) = panel {
            driver.apply_appearance(panel, record.settings());
        }
        self.persist_records();
        self.emit_records();
    }

    /// Apply `mutate` to every record's settings.
    ///
    /// Observers are notified once, while the apply guard is held. A nested
    /// call made while the guard is held is ignored.
    pub fn apply_settings_to_all(
        &mut self,
        mutate: impl Fn(&mut SettingsRecord),
        driver: &mut impl WindowDriver,
    ) {
        let Some(_token) = self.apply_guard.try_enter() else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, "settings broadcast already in progress");
            return;
        };

        for record in &mut self.records {
            mutate(record.settings_mut());
            if let Some(&panel) = self.live.get(&record.id()) {
                driver.apply_appearance(panel, record.settings());
            }
        }
        self.persist_records();
        tracing::debug!(target: targets::MANAGER, kind = %R::KIND, count = self.records.len(), "settings applied to all");
        self.emit_records();
    }

    /// Move `dragged` to the position `target` occupies.
    pub fn reorder(&mut self, dragged: WidgetId, target: WidgetId) {
        if dragged == target {
            return;
        }
        let (Some(from), Some(to)) = (self.index_of(dragged), self.index_of(target)) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %dragged, %target, "reorder: unknown widget");
            return;
        };
        let record = self.records.remove(from);
        self.records.insert(to, record);
        self.after_reorder();
    }

    /// Move a record to the end of the list.
    pub fn move_to_end(&mut self, id: WidgetId) {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "move_to_end: unknown widget");
            return;
        };
        let record = self.records.remove(index);
        self.records.push(record);
        self.after_reorder();
    }

    /// Recreate the floating windows that were open at the last exit.
    ///
    /// Ids that no longer name a floating record are dropped from the set.
    pub fn restore_open_windows(&mut self, driver: &mut impl WindowDriver) {
        let ids: Vec<WidgetId> = self.open_ids.iter().copied().collect();
        let mut pruned = false;

        for id in ids {
            match self.get(id) {
                Some(record) if !record.is_docked() => self.open(id, driver),
                _ => {
                    self.open_ids.remove(&id);
                    pruned = true;
                }
            }
        }

        if pruned {
            self.persist_open_ids();
        }
        tracing::debug!(target: targets::MANAGER, kind = %R::KIND, restored = self.live.len(), "restored open windows");
    }

    /// Close every live window without forgetting which ones were open.
    pub fn close_all_for_shutdown(&mut self, driver: &mut impl WindowDriver) {
        for (_, panel) in self.live.drain() {
            driver.destroy(panel);
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    fn record_mut(&mut self, id: WidgetId) -> Option<&mut R> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    fn next_dock_order(&self) -> u32 {
        self.records
            .iter()
            .filter_map(|r| r.dock_state())
            .filter(|d| d.is_docked)
            .map(|d| d.dock_order)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Drop a live window. Returns `false` if the widget had none.
    fn unregister(&mut self, id: WidgetId, driver: &mut impl WindowDriver) -> bool {
        let Some(panel) = self.live.remove(&id) else {
            return false;
        };
        driver.destroy(panel);
        if self.open_ids.remove(&id) {
            self.persist_open_ids();
        }
        tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "window closed");
        self.window_closed.emit(id);
        true
    }

    fn after_reorder(&mut self) {
        resequence(&mut self.records);
        self.persist_records();
        self.emit_records();
        self.dock_changed.emit(self.docked_count());
    }

    fn default_geometry(&self, geometry: Geometry, driver: &impl WindowDriver) -> Geometry {
        let size = geometry.size();
        let screen = driver.screen_frame();
        let frame = match driver.primary_frame() {
            Some(primary) => {
                let step = self.options.new_widget_offset * (self.live.len() + 1) as f64;
                Rect::from_origin_size(primary.origin.offset(Point::new(step, step)), size)
            }
            None => Rect::from_center(screen.center(), size),
        };
        fit_to_screen(frame, screen).into()
    }

    fn delete_resource(&self, file: &str) {
        let Some(dir) = &self.options.resource_dir else {
            tracing::warn!(target: targets::MANAGER, file, "no resource directory; leaving file");
            return;
        };
        let path = dir.join(Path::new(file));
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(target: targets::MANAGER, path = %path.display(), "deleted resource"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(target: targets::MANAGER, path = %path.display(), error = %err, "failed to delete resource");
            }
        }
    }

    fn notify_dock_changed(&self, driver: &mut impl WindowDriver) {
        let count = self.docked_count();
        self.dock_changed.emit(count);
        driver.docked_count_changed(count);
    }

    fn emit_records(&self) {
        self.records_changed.emit(self.records.clone());
    }

    fn persist_records(&self) {
        let (list_key, _) = Self::keys();
        if let Err(err) = self.store.save_list(list_key, &self.records) {
            tracing::error!(target: targets::MANAGER, kind = %R::KIND, error = %err, "failed to persist widgets");
        }
    }

    fn persist_open_ids(&self) {
        let (_, open_key) = Self::keys();
        if let Err(err) = self.store.save_id_set(open_key, &self.open_ids) {
            tracing::error!(target: targets::MANAGER, kind = %R::KIND, error = %err, "failed to persist open windows");
        }
    }
}

impl<R: WidgetRecord> std::fmt::Debug for WidgetManager<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetManager")
            .field("kind", &R::KIND)
            .field("records", &self.records.len())
            .field("live", &self.live.len())
            .field("open_ids", &self.open_ids.len())
            .finish()
    }
}

/// Renumber docked records `0..n` in list order.
fn resequence<R: WidgetRecord>(records: &mut [R]) {
    let mut next = 0;
    for record in records.iter_mut() {
        if let Some(dock) = record.dock_state_mut() {
            if dock.is_docked {
                dock.dock_order = next;
                next += 1;
            } else {
                dock.dock_order = 0;
            }
        }
    }
}

/// Put docked records back in stored dock order, within the list positions
/// docked records occupy, then make the order dense.
fn normalize_dock_order<R: WidgetRecord>(records: &mut [R]) {
    let slots: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_docked())
        .map(|(i, _)| i)
        .collect();

    let mut docked: Vec<R> = slots.iter().map(|&i| records[i].clone()).collect();
    docked.sort_by_key(|r| r.dock_state().map_or(0, |d| d.dock_order));

    for (slot, record) in slots.into_iter().zip(docked) {
        records[slot] = record;
    }
    resequence(records);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::model::DockState;
    use crate::store::{MemoryStore, PersistenceStore};
    use crate::window::{CoordinatorConfig, HeadlessHost, WindowCoordinator};

    fn setup() -> (ClockManager, WindowCoordinator, HeadlessHost, SharedStore) {
        let host = HeadlessHost::new(Rect::new(0.0, 0.0, 1440.0, 900.0));
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut coordinator =
            WindowCoordinator::new(Box::new(host.clone()), store.clone(), CoordinatorConfig::default());
        coordinator.open_primary(&SettingsRecord::default(), 0).unwrap();
        let manager = ClockManager::load(
            store.clone(),
            ManagerOptions {
                resource_dir: None,
                new_widget_offset: 30.0,
            },
        );
        (manager, coordinator, host, store)
    }

    fn clock(label: &str) -> ClockRecord {
        ClockRecord::new(label, "Europe/Paris", SettingsRecord::default())
    }

    fn floating(label: &str) -> ClockRecord {
        let mut record = clock(label);
        record.geometry = Geometry::from(Rect::new(50.0, 60.0, 220.0, 72.0));
        record
    }

    #[test]
    fn test_add_docks_new_clocks_in_order() {
        let (mut manager, mut coordinator, host, _) = setup();
        let a = manager.add(clock("A"), &mut coordinator).unwrap();
        let b = manager.add(clock("B"), &mut coordinator).unwrap();

        assert_eq!(manager.get(a).unwrap().dock.dock_order, 0);
        assert_eq!(manager.get(b).unwrap().dock.dock_order, 1);
        assert!(!manager.is_open(a));
        // Only the primary window exists.
        assert_eq!(host.live_count(), 1);
        assert_eq!(coordinator.docked_count(), 2);
    }

    #[test]
    fn test_add_rejects_unknown_timezone() {
        let (mut manager, mut coordinator, _, store) = setup();
        let bad = ClockRecord::new("X", "Not/AZone", SettingsRecord::default());
        assert!(manager.add(bad, &mut coordinator).is_none());
        assert!(manager.records().is_empty());
        assert!(store.load_raw(StoreKey::ClockRecords).is_none());
    }

    #[test]
    fn test_add_places_unplaced_record_near_primary() {
        let (mut manager, mut coordinator, _, _) = setup();
        let primary = coordinator.primary_frame().unwrap();
        let id = manager.add(clock("A"), &mut coordinator).unwrap();

        let geometry = manager.get(id).unwrap().geometry;
        assert!(!geometry.is_unplaced());
        assert_eq!(geometry.x, primary.left() + 30.0);
        assert_eq!(geometry.y, primary.top() + 30.0);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let (mut manager, mut coordinator, host, _) = setup();
        let ghost = WidgetId::from_raw(42);
        manager.remove(ghost, &mut coordinator);
        manager.open(ghost, &mut coordinator);
        manager.close(ghost, &mut coordinator);
        manager.dock(ghost, &mut coordinator);
        manager.undock(ghost, &mut coordinator);
        manager.hide(ghost, &mut coordinator);
        manager.update_geometry(ghost, Rect::new(0.0, 0.0, 1.0, 1.0));
        manager.rename(ghost, "nobody");
        manager.reorder(ghost, ghost);
        assert!(manager.records().is_empty());
        assert_eq!(host.live_count(), 1);
    }

    #[test]
    fn test_open_is_idempotent_and_raises() {
        let (mut manager, mut coordinator, host, store) = setup();
        let id = manager.add(floating("A"), &mut coordinator).unwrap();
        manager.undock(id, &mut coordinator);
        let panel = manager.panel_of(id).unwrap();

        manager.open(id, &mut coordinator);
        assert_eq!(manager.panel_of(id), Some(panel));
        assert_eq!(host.panel(panel).unwrap().raised, 1);
        assert!(store.load_id_set(StoreKey::OpenClockIds).contains(&id));

        manager.close(id, &mut coordinator);
        manager.close(id, &mut coordinator);
        assert!(!manager.is_open(id));
        assert!(store.load_id_set(StoreKey::OpenClockIds).is_empty());
        assert!(manager.get(id).is_some());
    }

    #[test]
    fn test_toggle() {
        let (mut manager, mut coordinator, _, _) = setup();
        let id = manager.add(floating("A"), &mut coordinator).unwrap();
        manager.undock(id, &mut coordinator);
        assert!(manager.is_open(id));
        manager.toggle(id, &mut coordinator);
        assert!(!manager.is_open(id));
        manager.toggle(id, &mut coordinator);
        assert!(manager.is_open(id));
    }

    #[test]
    fn test_update_geometry_persists() {
        let (mut manager, mut coordinator, _, store) = setup();
        let id = manager.add(clock("A"), &mut coordinator).unwrap();
        manager.update_geometry(id, Rect::new(11.0, 22.0, 333.0, 44.0));

        let saved: Vec<ClockRecord> = store.load_list(StoreKey::ClockRecords);
        assert_eq!(saved[0].geometry, Geometry::from(Rect::new(11.0, 22.0, 333.0, 44.0)));
    }

    #[test]
    fn test_apply_settings_to_all_notifies_once() {
        let (mut manager, mut coordinator, _, _) = setup();
        manager.add(clock("A"), &mut coordinator);
        manager.add(clock("B"), &mut coordinator);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        manager.records_changed().connect(move |records: &Vec<ClockRecord>| {
            seen_clone.lock().push(records.len());
        });

        manager.apply_settings_to_all(|s| s.set_adjustable_black_opacity(1.5), &mut coordinator);

        assert_eq!(*seen.lock(), vec![2]);
        assert!(
            manager
                .records()
                .iter()
                .all(|r| r.settings.adjustable_black_opacity() == 1.0)
        );
        assert!(!manager.apply_guard().is_applying());
    }

    #[test]
    fn test_apply_settings_to_all_ignores_nested_call() {
        let (mut manager, mut coordinator, _, _) = setup();
        manager.add(clock("A"), &mut coordinator);

        let token = manager.apply_guard().try_enter().unwrap();
        manager.apply_settings_to_all(|s| s.show_seconds = true, &mut coordinator);
        drop(token);

        assert!(!manager.records()[0].settings.show_seconds);
    }

    #[test]
    fn test_load_uses_stored_dock_order() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut records = vec![clock("A"), floating("F"), clock("B"), clock("C")];
        let orders = [2, 0, 0, 7];
        for (record, order) in records.iter_mut().zip(orders) {
            record.dock = DockState {
                is_docked: record.label != "F",
                dock_order: order,
            };
        }
        store.save_list(StoreKey::ClockRecords, &records).unwrap();

        let manager = ClockManager::load(store, ManagerOptions::default());
        let labels: Vec<_> = manager.records().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "F", "A", "C"]);
        let orders: Vec<_> = manager.docked().map(|r| r.dock.dock_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_restore_prunes_stale_ids() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut open = floating("Open");
        open.dock = DockState::default();
        let stale = WidgetId::from_raw(77);
        store.save_list(StoreKey::ClockRecords, &[open.clone()]).unwrap();
        store
            .save_id_set(StoreKey::OpenClockIds, &BTreeSet::from([open.id(), stale]))
            .unwrap();

        let host = HeadlessHost::default();
        let mut coordinator =
            WindowCoordinator::new(Box::new(host.clone()), store.clone(), CoordinatorConfig::default());
        let mut manager = ClockManager::load(store.clone(), ManagerOptions::default());
        manager.restore_open_windows(&mut coordinator);

        assert!(manager.is_open(open.id()));
        assert_eq!(host.live_count(), 1);
        assert_eq!(
            store.load_id_set(StoreKey::OpenClockIds),
            BTreeSet::from([open.id()])
        );
    }
}
