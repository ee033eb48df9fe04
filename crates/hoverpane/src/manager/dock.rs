//! Docking: moving widgets between floating windows and the primary window.

use hoverpane_core::logging::targets;

use super::{WidgetManager, resequence};
use crate::model::{Dockable, WidgetId};
use crate::window::WindowDriver;

impl<R: Dockable> WidgetManager<R> {
    /// Move a widget into the primary window.
    ///
    /// Docked widgets appear in list order, so a widget that was hidden
    /// returns to its old slot. Its floating window closes. If the primary
    /// window is hidden it is shown instead and nothing is docked.
    pub fn dock(&mut self, id: WidgetId, driver: &mut impl WindowDriver) {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "dock: unknown widget");
            return;
        };
        if self.records[index].dock().is_docked {
            return;
        }
        if !driver.is_primary_visible() {
            tracing::warn!(target: targets::MANAGER, %id, "primary window hidden; showing it instead of docking");
            driver.show_primary();
            return;
        }

        if let Some(panel) = self.live.remove(&id) {
            if let Some(frame) = driver.panel_frame(panel) {
                self.records[index].set_geometry(frame.into());
            }
            driver.destroy(panel);
            self.window_closed.emit(id);
        }
        let open_changed = self.open_ids.remove(&id);

        let order = self.next_dock_order();
        let dock = self.records[index].dock_mut();
        dock.is_docked = true;
        dock.dock_order = order;

        resequence(&mut self.records);
        self.persist_records();
        if open_changed {
            self.persist_open_ids();
        }
        tracing::info!(target: targets::MANAGER, kind = %R::KIND, %id, order, "widget docked");

        self.emit_records();
        self.notify_dock_changed(driver);
    }

    /// Take a widget out of the primary window and show it floating at its
    /// saved geometry.
    pub fn undock(&mut self, id: WidgetId, driver: &mut impl WindowDriver) {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "undock: unknown widget");
            return;
        };
        if !self.records[index].dock().is_docked {
            return;
        }

        self.records[index].dock_mut().is_docked = false;
        resequence(&mut self.records);
        self.persist_records();
        tracing::info!(target: targets::MANAGER, kind = %R::KIND, %id, "widget undocked");

        // Shrink the primary window before the floating one appears.
        self.notify_dock_changed(driver);
        self.open(id, driver);
        self.emit_records();
    }

    /// Leave a widget neither docked nor floating. The record is kept.
    pub fn hide(&mut self, id: WidgetId, driver: &mut impl WindowDriver) {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, "hide: unknown widget");
            return;
        };
        let was_docked = self.records[index].dock().is_docked;
        self.records[index].dock_mut().is_docked = false;

        if let Some(panel) = self.live.remove(&id) {
            if let Some(frame) = driver.panel_frame(panel) {
                self.records[index].set_geometry(frame.into());
            }
            driver.destroy(panel);
            self.window_closed.emit(id);
        }
        if self.open_ids.remove(&id) {
            self.persist_open_ids();
        }

        resequence(&mut self.records);
        self.persist_records();
        tracing::debug!(target: targets::MANAGER, kind = %R::KIND, %id, was_docked, "widget hidden");

        self.emit_records();
        if was_docked {
            self.notify_dock_changed(driver);
        }
    }
}
