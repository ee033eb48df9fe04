//! The widget host: owner of every long-lived component.
//!
//! [`WidgetHost`] wires the store, both managers, the window coordinator
//! and the battery monitor together. Everything runs on the UI thread.
//! Other threads and UI surfaces (menus, pickers) talk to it by sending
//! [`HostCommand`]s, which are applied on the next [`WidgetHost::pump`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use hoverpane_core::logging::targets;
use hoverpane_core::{ApplyGuard, Signal};

use crate::battery::{BatteryMonitor, BatteryReading};
use crate::config::HostConfig;
use crate::error::HostResult;
use crate::manager::{ClockManager, PhotoManager};
use crate::model::{PositionPreset, SettingsRecord, WidgetId, WidgetKind};
use crate::store::{SharedStore, StoreExt, StoreKey};
use crate::window::{
    CoordinatorNotice, PanelEvent, PanelHost, PanelId, PanelOwner, WindowCoordinator, WindowDriver,
};

/// An edit applied to the primary clock's settings and mirrored to every
/// secondary clock.
pub type SettingsMutator = Arc<dyn Fn(&mut SettingsRecord) + Send + Sync>;

/// A request from outside the UI thread.
#[derive(Clone)]
pub enum HostCommand {
    /// Show a clock's window, or the primary window if it is docked.
    OpenClock(WidgetId),
    /// Show a photo's window.
    OpenPhoto(WidgetId),
    AddClock { label: String, timezone_id: String },
    /// Import an image file as a new photo widget.
    AddPhoto(PathBuf),
    Remove(WidgetKind, WidgetId),
    Dock(WidgetId),
    Undock(WidgetId),
    Hide(WidgetId),
    /// Move a clock to the position of another in the list.
    ReorderClocks { dragged: WidgetId, target: WidgetId },
    ShowPrimary,
    SetPrimaryPreset(PositionPreset),
    UpdateMainSettings(SettingsMutator),
    Quit,
}

impl fmt::Debug for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenClock(id) => f.debug_tuple("OpenClock").field(id).finish(),
            Self::OpenPhoto(id) => f.debug_tuple("OpenPhoto").field(id).finish(),
            Self::AddClock { label, timezone_id } => f
                .debug_struct("AddClock")
                .field("label", label)
                .field("timezone_id", timezone_id)
                .finish(),
            Self::AddPhoto(path) => f.debug_tuple("AddPhoto").field(path).finish(),
            Self::Remove(kind, id) => f.debug_tuple("Remove").field(kind).field(id).finish(),
            Self::Dock(id) => f.debug_tuple("Dock").field(id).finish(),
            Self::Undock(id) => f.debug_tuple("Undock").field(id).finish(),
            Self::Hide(id) => f.debug_tuple("Hide").field(id).finish(),
            Self::ReorderClocks { dragged, target } => f
                .debug_struct("ReorderClocks")
                .field("dragged", dragged)
                .field("target", target)
                .finish(),
            Self::ShowPrimary => f.write_str("ShowPrimary"),
            Self::SetPrimaryPreset(preset) => f.debug_tuple("SetPrimaryPreset").field(preset).finish(),
            Self::UpdateMainSettings(_) => f.write_str("UpdateMainSettings(..)"),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

/// Composition root of the widget host.
pub struct WidgetHost {
    config: HostConfig,
    store: SharedStore,
    main_settings: SettingsRecord,
    clocks: ClockManager,
    photos: PhotoManager,
    coordinator: WindowCoordinator,
    battery: BatteryMonitor,
    battery_state: BatteryReading,
    commands: Receiver<HostCommand>,
    command_sender: Sender<HostCommand>,
    main_settings_changed: Signal<SettingsRecord>,
    battery_changed: Signal<BatteryReading>,
    settings_guard: ApplyGuard,
    quit_requested: bool,
}

impl WidgetHost {
    /// Load saved state and create the primary window and every floating
    /// window that was open at the last exit.
    ///
    /// `photo_dir` holds imported photos; without one, adding photos is
    /// refused.
    pub fn open(
        config: HostConfig,
        store: SharedStore,
        panel_host: Box<dyn PanelHost>,
        photo_dir: Option<PathBuf>,
    ) -> HostResult<Self> {
        let main_settings = store
            .load_value::<SettingsRecord>(StoreKey::MainSettings)
            .unwrap_or_default();

        let mut coordinator = WindowCoordinator::new(panel_host, store.clone(), config.coordinator_config());
        let mut clocks = ClockManager::load(store.clone(), config.manager_options(None));
        let mut photos = PhotoManager::load(store.clone(), config.manager_options(photo_dir));

        coordinator.open_primary(&main_settings, clocks.docked_count())?;
        clocks.restore_open_windows(&mut coordinator);
        photos.restore_open_windows(&mut coordinator);

        let battery = if main_settings.show_battery {
            BatteryMonitor::spawn(config.battery_poll_interval())
        } else {
            BatteryMonitor::disabled()
        };

        let (command_sender, commands) = unbounded();

        tracing::info!(
            target: targets::HOST,
            clocks = clocks.records().len(),
            docked = clocks.docked_count(),
            photos = photos.records().len(),
            "host opened"
        );

        Ok(Self {
            config,
            store,
            main_settings,
            clocks,
            photos,
            coordinator,
            battery,
            battery_state: None,
            commands,
            command_sender,
            main_settings_changed: Signal::new(),
            battery_changed: Signal::new(),
            settings_guard: ApplyGuard::new(),
            quit_requested: false,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn main_settings(&self) -> &SettingsRecord {
        &self.main_settings
    }

    pub fn clocks(&self) -> &ClockManager {
        &self.clocks
    }

    pub fn photos(&self) -> &PhotoManager {
        &self.photos
    }

    pub fn coordinator(&self) -> &WindowCoordinator {
        &self.coordinator
    }

    /// A sender for [`HostCommand`]s. Clone it freely.
    pub fn command_sender(&self) -> Sender<HostCommand> {
        self.command_sender.clone()
    }

    /// Emitted with the new main settings after each change.
    pub fn main_settings_changed(&self) -> &Signal<SettingsRecord> {
        &self.main_settings_changed
    }

    /// Emitted when the battery reading changes.
    pub fn battery_changed(&self) -> &Signal<BatteryReading> {
        &self.battery_changed
    }

    /// The most recent battery reading.
    pub fn battery_state(&self) -> BatteryReading {
        self.battery_state
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    // =========================================================================
    // Event loop entry points
    // =========================================================================

    /// Apply queued commands and pending battery readings.
    ///
    /// Returns `false` once [`HostCommand::Quit`] has been received.
    pub fn pump(&mut self) -> bool {
        while let Ok(command) = self.commands.try_recv() {
            self.execute(command);
            if self.quit_requested {
                break;
            }
        }

        if let Some(reading) = self.battery.latest()
            && reading != self.battery_state
        {
            self.battery_state = reading;
            self.battery_changed.emit(reading);
        }

        !self.quit_requested
    }

    /// Apply one command immediately.
    pub fn execute(&mut self, command: HostCommand) {
        tracing::debug!(target: targets::HOST, ?command, "command");
        let driver = &mut self.coordinator;
        match command {
            HostCommand::OpenClock(id) => self.clocks.open(id, driver),
            HostCommand::OpenPhoto(id) => self.photos.open(id, driver),
            HostCommand::AddClock { label, timezone_id } => {
                self.clocks
                    .add_clock(label, timezone_id, self.main_settings.clone(), driver);
            }
            HostCommand::AddPhoto(path) => {
                self.photos.add_photo(&path, self.main_settings.clone(), driver);
            }
            HostCommand::Remove(WidgetKind::Clock, id) => self.clocks.remove(id, driver),
            HostCommand::Remove(WidgetKind::Photo, id) => self.photos.remove(id, driver),
            HostCommand::Dock(id) => self.clocks.dock(id, driver),
            HostCommand::Undock(id) => self.clocks.undock(id, driver),
            HostCommand::Hide(id) => self.clocks.hide(id, driver),
            HostCommand::ReorderClocks { dragged, target } => self.clocks.reorder(dragged, target),
            HostCommand::ShowPrimary => driver.show_primary(),
            HostCommand::SetPrimaryPreset(preset) => driver.set_primary_preset(preset),
            HostCommand::UpdateMainSettings(mutate) => self.update_main_settings(|s| mutate(s)),
            HostCommand::Quit => {
                tracing::info!(target: targets::HOST, "quit requested");
                self.quit_requested = true;
            }
        }
    }

    /// Route a backend event and forward its outcome to the owning manager.
    pub fn handle_panel_event(&mut self, panel: PanelId, event: PanelEvent, now: Instant) {
        let Some(notice) = self.coordinator.handle_event(panel, event, now) else {
            return;
        };
        match notice {
            CoordinatorNotice::FrameChanged { owner, frame } => match owner {
                PanelOwner::Widget(WidgetKind::Clock, id) => self.clocks.update_geometry(id, frame),
                PanelOwner::Widget(WidgetKind::Photo, id) => self.photos.update_geometry(id, frame),
                PanelOwner::Primary => {}
            },
            CoordinatorNotice::CloseRequested(owner) => match owner {
                PanelOwner::Widget(WidgetKind::Clock, id) => {
                    self.clocks.window_closed_by_user(id, &mut self.coordinator)
                }
                PanelOwner::Widget(WidgetKind::Photo, id) => {
                    self.photos.window_closed_by_user(id, &mut self.coordinator)
                }
                PanelOwner::Primary => {}
            },
        }
    }

    /// Fire due timers.
    pub fn tick(&mut self, now: Instant) {
        self.coordinator.tick(now);
    }

    /// How long the event loop may sleep.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.coordinator.time_until_next(now)
    }

    /// Change the primary clock's settings.
    ///
    /// The change is persisted, applied to the primary window and mirrored
    /// to every secondary clock. Photos follow the always-on-top choice.
    /// A change requested by an observer while one is being applied is
    /// ignored.
    pub fn update_main_settings(&mut self, mutate: impl Fn(&mut SettingsRecord)) {
        let Some(_token) = self.settings_guard.try_enter() else {
            tracing::debug!(target: targets::HOST, "main settings update already in progress");
            return;
        };

        let before = self.main_settings.clone();
        mutate(&mut self.main_settings);
        if self.main_settings == before {
            return;
        }

        if let Err(err) = self.store.save_value(StoreKey::MainSettings, &self.main_settings) {
            tracing::error!(target: targets::HOST, error = %err, "failed to persist main settings");
        }
        self.coordinator.apply_primary_settings(&self.main_settings);
        self.clocks.apply_settings_to_all(&mutate, &mut self.coordinator);

        let always_on_top = self.main_settings.always_on_top;
        if always_on_top != before.always_on_top {
            self.photos
                .apply_settings_to_all(|s| s.always_on_top = always_on_top, &mut self.coordinator);
        }

        if self.main_settings.show_battery != before.show_battery {
            self.battery = if self.main_settings.show_battery {
                BatteryMonitor::spawn(self.config.battery_poll_interval())
            } else {
                BatteryMonitor::disabled()
            };
        }

        self.main_settings_changed.emit(self.main_settings.clone());
    }

    /// Close every window, keeping the open-window sets for the next launch.
    pub fn shutdown(&mut self) {
        self.clocks.close_all_for_shutdown(&mut self.coordinator);
        self.photos.close_all_for_shutdown(&mut self.coordinator);
        tracing::info!(target: targets::HOST, "host shut down");
    }
}

impl fmt::Debug for WidgetHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetHost")
            .field("clocks", &self.clocks)
            .field("photos", &self.photos)
            .field("coordinator", &self.coordinator)
            .field("quit_requested", &self.quit_requested)
            .finish_non_exhaustive()
    }
}
