//! The window coordinator.
//!
//! Owns the panel backend and everything attached to a live panel: the owner
//! map used to route backend events, each panel's resize/drag controller and
//! hover fade, the primary window and its layout engine, and the timers that
//! drive hover effects.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use hoverpane_core::logging::targets;
use hoverpane_core::{Point, Rect, Signal, Size, TimerManager};

use super::chrome::{ChromeMetrics, PointerController};
use super::driver::{PanelOwner, PanelSpec, WindowDriver};
use super::hover::{HoverAction, HoverFade, HoverTiming};
use super::layout::{LayoutMetrics, LayoutPlan, PrimaryLayoutEngine};
use super::panel::{PanelConfig, PanelEvent, PanelHost, PanelId, PanelLevel};
use crate::error::PanelError;
use crate::model::{PositionPreset, SettingsRecord, fit_to_screen};
use crate::store::{SharedStore, StoreExt, StoreKey};

/// Title of the primary window.
pub const PRIMARY_TITLE: &str = "Hoverpane";

/// Tunables of the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    pub chrome: ChromeMetrics,
    pub layout: LayoutMetrics,
    pub hover: HoverTiming,
    /// Minimum size of widget panels.
    pub panel_min_size: Size,
    /// Maximum size of every panel.
    pub panel_max_size: Size,
    /// Primary window size when nothing was saved.
    pub primary_default_size: Size,
    /// Distance from the screen edge for position presets.
    pub screen_margin: f64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            chrome: ChromeMetrics::default(),
            layout: LayoutMetrics::default(),
            hover: HoverTiming::default(),
            panel_min_size: Size::new(120.0, 60.0),
            panel_max_size: Size::new(1600.0, 1200.0),
            primary_default_size: Size::new(260.0, 120.0),
            screen_margin: 24.0,
        }
    }
}

/// Something the host must forward to a manager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinatorNotice {
    /// A panel moved or was resized.
    FrameChanged { owner: PanelOwner, frame: Rect },
    /// The user closed a panel. For the primary window this has already
    /// been handled by hiding it.
    CloseRequested(PanelOwner),
}

#[derive(Debug)]
struct PanelState {
    owner: PanelOwner,
    pointer: PointerController,
    hover: HoverFade,
}

/// Creates, routes and lays out every panel of one host.
pub struct WindowCoordinator {
    host: Box<dyn PanelHost>,
    store: SharedStore,
    config: CoordinatorConfig,
    panels: HashMap<PanelId, PanelState>,
    primary: Option<PanelId>,
    primary_origin: Option<Point>,
    layout: PrimaryLayoutEngine,
    timers: TimerManager,
    primary_visibility_changed: Signal<bool>,
}

impl WindowCoordinator {
    pub fn new(host: Box<dyn PanelHost>, store: SharedStore, config: CoordinatorConfig) -> Self {
        Self {
            host,
            store,
            layout: PrimaryLayoutEngine::new(config.layout),
            config,
            panels: HashMap::new(),
            primary: None,
            primary_origin: None,
            timers: TimerManager::new(),
            primary_visibility_changed: Signal::new(),
        }
    }

    /// Emitted with the new visibility when the primary window is shown or hidden.
    pub fn primary_visibility_changed(&self) -> &Signal<bool> {
        &self.primary_visibility_changed
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn primary(&self) -> Option<PanelId> {
        self.primary
    }

    /// Number of live panels, the primary window included.
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn docked_count(&self) -> usize {
        self.layout.docked_count()
    }

    /// Create the primary window from the saved size, position and visibility.
    ///
    /// `docked_count` is the number of widgets already docked at launch.
    pub fn open_primary(&mut self, settings: &SettingsRecord, docked_count: usize) -> Result<PanelId, PanelError> {
        if let Some(primary) = self.primary {
            return Ok(primary);
        }

        let screen = self.host.screen_frame();
        let size = self
            .store
            .load_value::<Size>(StoreKey::PreDockSize)
            .unwrap_or(self.config.primary_default_size);
        let preset = self
            .store
            .load_value::<PositionPreset>(StoreKey::PrimaryPreset)
            .unwrap_or_default();

        let placed = preset
            .frame_for(size, screen, self.config.screen_margin)
            .or_else(|| {
                self.store
                    .load_value::<Point>(StoreKey::PrimaryPosition)
                    .map(|origin| Rect::from_origin_size(origin, size))
            })
            .or_else(|| PositionPreset::default().frame_for(size, screen, self.config.screen_margin))
            .unwrap_or_else(|| Rect::from_center(screen.center(), size));
        let frame = fit_to_screen(placed, screen);

        let plan = self.layout.initialize(docked_count, frame);
        let visible = self
            .store
            .load_value::<bool>(StoreKey::PrimaryVisible)
            .unwrap_or(true);

        let config = PanelConfig::new(PRIMARY_TITLE)
            .with_frame(plan.frame)
            .with_min_size(plan.min_size)
            .with_max_size(self.config.panel_max_size)
            .with_level(PanelLevel::for_always_on_top(settings.always_on_top))
            .with_opacity(settings.window_opacity())
            .with_visible(visible);
        let id = self.host.create(&config)?;

        self.register(id, PanelOwner::Primary, settings, plan.min_size);
        self.primary = Some(id);
        self.primary_origin = Some(plan.frame.origin);

        tracing::info!(
            target: targets::COORDINATOR,
            panel = id.as_raw(),
            ?preset,
            docked_count,
            visible,
            "primary window created"
        );
        Ok(id)
    }

    /// Hide the primary window. The process keeps running.
    pub fn hide_primary(&mut self) {
        let Some(primary) = self.primary else {
            return;
        };
        self.host.set_visible(primary, false);
        self.persist(StoreKey::PrimaryVisible, &false);
        tracing::debug!(target: targets::COORDINATOR, "primary window hidden");
        self.primary_visibility_changed.emit(false);
    }

    /// Move the primary window to a preset position and remember the choice.
    pub fn set_primary_preset(&mut self, preset: PositionPreset) {
        self.persist(StoreKey::PrimaryPreset, &preset);
        let Some(primary) = self.primary else {
            return;
        };
        let Some(current) = self.host.frame(primary) else {
            return;
        };
        let screen = self.host.screen_frame();
        if let Some(frame) = preset.frame_for(current.size, screen, self.config.screen_margin) {
            self.host.set_frame(primary, frame);
            self.primary_origin = Some(frame.origin);
            self.persist(StoreKey::PrimaryPosition, &frame.origin);
        }
    }

    /// Re-apply level and opacity to the primary window.
    pub fn apply_primary_settings(&mut self, settings: &SettingsRecord) {
        if let Some(primary) = self.primary {
            self.apply_appearance(primary, settings);
        }
    }

    /// Set the window level of a live panel.
    pub fn apply_always_on_top(&mut self, panel: PanelId, enabled: bool) {
        self.host.set_level(panel, PanelLevel::for_always_on_top(enabled));
    }

    /// Route a backend event.
    pub fn handle_event(&mut self, panel: PanelId, event: PanelEvent, now: Instant) -> Option<CoordinatorNotice> {
        let Some(state) = self.panels.get_mut(&panel) else {
            tracing::debug!(target: targets::COORDINATOR, panel = panel.as_raw(), ?event, "event for unknown panel");
            return None;
        };
        let owner = state.owner;

        match event {
            PanelEvent::Moved(origin) => {
                let frame = self.host.frame(panel)?.with_origin(origin);
                self.frame_changed(owner, frame)
            }
            PanelEvent::Resized(size) => {
                let frame = self.host.frame(panel)?.with_size(size);
                self.frame_changed(owner, frame)
            }
            PanelEvent::CloseRequested => {
                state.pointer.release();
                if owner == PanelOwner::Primary {
                    self.hide_primary();
                }
                Some(CoordinatorNotice::CloseRequested(owner))
            }
            PanelEvent::PointerPressed(pos) => {
                let frame = self.host.frame(panel)?;
                state.pointer.press(pos.local, pos.screen, frame);
                None
            }
            PanelEvent::PointerMoved(pos) => {
                let frame = self.host.frame(panel)?;
                if !state.pointer.is_active() {
                    let cursor = state.pointer.hover(pos.local, frame.size);
                    self.host.set_cursor(panel, cursor);
                    return None;
                }
                let next = state.pointer.drag_to(pos.screen)?;
                if next == frame {
                    return None;
                }
                self.host.set_frame(panel, next);
                self.frame_changed(owner, next)
            }
            PanelEvent::PointerReleased => {
                state.pointer.release();
                None
            }
            PanelEvent::PointerEntered => {
                let actions = state.hover.enter(&mut self.timers, now);
                self.apply_hover(panel, actions);
                None
            }
            PanelEvent::PointerLeft => {
                let cursor = state.pointer.leave();
                let actions = state.hover.leave(&mut self.timers);
                self.host.set_cursor(panel, cursor);
                self.apply_hover(panel, actions);
                None
            }
        }
    }

    /// Fire due timers.
    pub fn tick(&mut self, now: Instant) {
        for fired in self.timers.process_expired(now) {
            let owner = self
                .panels
                .iter_mut()
                .find_map(|(id, state)| {
                    state
                        .hover
                        .timer_fired(fired, &mut self.timers, now)
                        .map(|actions| (*id, actions))
                });
            if let Some((panel, actions)) = owner {
                self.apply_hover(panel, actions);
            }
        }
    }

    /// Time until the next timer is due.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    fn register(&mut self, panel: PanelId, owner: PanelOwner, settings: &SettingsRecord, min_size: Size) {
        let mut hover = HoverFade::new(self.config.hover);
        hover.configure(settings.disappear_on_hover, settings.window_opacity(), &mut self.timers);
        self.panels.insert(
            panel,
            PanelState {
                owner,
                pointer: PointerController::new(self.config.chrome, min_size, self.config.panel_max_size),
                hover,
            },
        );
    }

    fn frame_changed(&mut self, owner: PanelOwner, frame: Rect) -> Option<CoordinatorNotice> {
        if owner == PanelOwner::Primary {
            if self.layout.docked_count() == 0 {
                self.persist(StoreKey::PreDockSize, &frame.size);
            }
            if self.primary_origin != Some(frame.origin) {
                self.primary_origin = Some(frame.origin);
                self.persist(StoreKey::PrimaryPosition, &frame.origin);
                self.persist(StoreKey::PrimaryPreset, &PositionPreset::Custom);
            }
        }
        Some(CoordinatorNotice::FrameChanged { owner, frame })
    }

    fn apply_plan(&mut self, primary: PanelId, plan: LayoutPlan) {
        self.host.set_min_size(primary, plan.min_size);
        if let Some(state) = self.panels.get_mut(&primary) {
            state.pointer.set_min_size(plan.min_size);
        }
        if self.host.frame(primary) != Some(plan.frame) {
            self.host.set_frame(primary, plan.frame);
        }
    }

    fn apply_hover(&mut self, panel: PanelId, actions: Vec<HoverAction>) {
        for action in actions {
            match action {
                HoverAction::SetOpacity(opacity) => self.host.set_opacity(panel, opacity),
                HoverAction::SetIgnoresMouse(ignore) => self.host.set_ignores_mouse(panel, ignore),
            }
        }
    }

    fn persist<T: serde::Serialize>(&self, key: StoreKey, value: &T) {
        if let Err(err) = self.store.save_value(key, value) {
            tracing::error!(target: targets::COORDINATOR, %key, error = %err, "failed to persist window state");
        }
    }
}

impl WindowDriver for WindowCoordinator {
    fn materialize(&mut self, spec: PanelSpec<'_>) -> Option<PanelId> {
        let config = PanelConfig::new(spec.title)
            .with_frame(spec.frame)
            .with_min_size(self.config.panel_min_size)
            .with_max_size(self.config.panel_max_size)
            .with_level(PanelLevel::for_always_on_top(spec.settings.always_on_top))
            .with_opacity(spec.settings.window_opacity());

        match self.host.create(&config) {
            Ok(panel) => {
                self.register(panel, spec.owner, spec.settings, self.config.panel_min_size);
                tracing::debug!(
                    target: targets::COORDINATOR,
                    panel = panel.as_raw(),
                    owner = ?spec.owner,
                    "panel created"
                );
                Some(panel)
            }
            Err(err) => {
                tracing::error!(target: targets::COORDINATOR, owner = ?spec.owner, error = %err, "panel creation failed");
                None
            }
        }
    }

    fn destroy(&mut self, panel: PanelId) {
        if Some(panel) == self.primary {
            tracing::warn!(target: targets::COORDINATOR, "refusing to destroy the primary window");
            return;
        }
        if let Some(mut state) = self.panels.remove(&panel) {
            state.hover.cancel(&mut self.timers);
        }
        self.host.close(panel);
    }

    fn panel_frame(&self, panel: PanelId) -> Option<Rect> {
        self.host.frame(panel)
    }

    fn bring_to_front(&mut self, panel: PanelId) {
        self.host.order_front(panel);
    }

    fn apply_appearance(&mut self, panel: PanelId, settings: &SettingsRecord) {
        self.apply_always_on_top(panel, settings.always_on_top);
        let Some(state) = self.panels.get_mut(&panel) else {
            return;
        };
        let actions = state.hover.configure(
            settings.disappear_on_hover,
            settings.window_opacity(),
            &mut self.timers,
        );
        let hidden = state.hover.is_hidden();
        if !hidden {
            self.host.set_opacity(panel, settings.window_opacity());
        }
        self.apply_hover(panel, actions);
    }

    fn primary_frame(&self) -> Option<Rect> {
        self.primary.and_then(|p| self.host.frame(p))
    }

    fn is_primary_visible(&self) -> bool {
        self.primary.is_some_and(|p| self.host.is_visible(p))
    }

    fn show_primary(&mut self) {
        let Some(primary) = self.primary else {
            return;
        };
        self.host.set_visible(primary, true);
        self.host.order_front(primary);
        self.persist(StoreKey::PrimaryVisible, &true);
        self.primary_visibility_changed.emit(true);
    }

    fn screen_frame(&self) -> Rect {
        self.host.screen_frame()
    }

    fn docked_count_changed(&mut self, count: usize) {
        let Some(primary) = self.primary else {
            self.layout.initialize(count, Rect::default());
            return;
        };
        let Some(current) = self.host.frame(primary) else {
            return;
        };
        let pre_dock = self.store.load_value::<Size>(StoreKey::PreDockSize);
        let Some(plan) = self.layout.transition(count, current, pre_dock) else {
            return;
        };
        if let Some(size) = plan.snapshot {
            self.persist(StoreKey::PreDockSize, &size);
        }
        self.apply_plan(primary, plan);
    }
}

impl std::fmt::Debug for WindowCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowCoordinator")
            .field("panels", &self.panels.len())
            .field("primary", &self.primary)
            .field("docked_count", &self.layout.docked_count())
            .finish()
    }
}
