//! winit panel backend.
//!
//! winit can only create windows while an [`ActiveEventLoop`] is available,
//! but managers create panels from arbitrary call sites. [`WinitPanelHost`]
//! therefore hands out a [`PanelId`] immediately, records the desired state,
//! and realizes the window on the next [`WinitPanelHost::flush`]. Operations
//! on a panel that is not realized yet update the recorded state and are
//! applied at creation.
//!
//! Clones share state; the application handler keeps one clone to flush and
//! translate events while the coordinator owns another.

use std::collections::HashMap;
use std::sync::Arc;

use cursor_icon::CursorIcon;
use hoverpane_core::logging::targets;
use hoverpane_core::{Point, Rect, Size};
use parking_lot::Mutex;
use winit::dpi::{LogicalPosition, LogicalSize, Position};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowButtons, WindowId, WindowLevel};

use super::panel::{PanelConfig, PanelEvent, PanelHost, PanelId, PanelLevel, PointerPosition};
use crate::error::PanelError;

/// Positions closer than this are treated as the same frame when filtering
/// the echo of our own `set_frame` calls.
const FRAME_EPSILON: f64 = 0.5;

/// Convert a [`PanelConfig`] into winit window attributes.
pub fn to_window_attributes(config: &PanelConfig) -> winit::window::WindowAttributes {
    let frame = config.frame();
    let mut attrs = Window::default_attributes()
        .with_title(config.title())
        .with_inner_size(LogicalSize::new(frame.width(), frame.height()))
        .with_position(Position::Logical(LogicalPosition::new(frame.left(), frame.top())))
        .with_decorations(!config.is_borderless())
        .with_transparent(config.is_transparent())
        .with_visible(config.is_visible())
        .with_resizable(true)
        .with_window_level(level_to_winit(config.level()));

    if let Some(min) = config.min_size() {
        attrs = attrs.with_min_inner_size(LogicalSize::new(min.width, min.height));
    }
    if let Some(max) = config.max_size() {
        attrs = attrs.with_max_inner_size(LogicalSize::new(max.width, max.height));
    }

    let buttons = if config.has_chrome_buttons() {
        WindowButtons::all()
    } else {
        WindowButtons::empty()
    };
    attrs.with_enabled_buttons(buttons)
}

fn level_to_winit(level: PanelLevel) -> WindowLevel {
    match level {
        PanelLevel::Normal => WindowLevel::Normal,
        PanelLevel::Floating => WindowLevel::AlwaysOnTop,
    }
}

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() < FRAME_EPSILON
}

#[derive(Debug)]
struct Entry {
    config: PanelConfig,
    window: Option<Window>,
    /// Last frame requested, echoed by [`PanelHost::frame`].
    frame: Rect,
    /// Origin the platform last reported. Lags `frame` while a requested
    /// move is in flight; screen pointer positions are built from it.
    reported_origin: Point,
    min_size: Option<Size>,
    level: PanelLevel,
    visible: bool,
    opacity: f64,
    ignores_mouse: bool,
    cursor: CursorIcon,
    last_pointer: PointerPosition,
}

impl Entry {
    fn scale(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }

    /// Push the recorded state onto a freshly created window.
    fn apply_all(&self, window: &Window) {
        window.set_cursor(self.cursor);
        if self.ignores_mouse
            && let Err(err) = window.set_cursor_hittest(false)
        {
            tracing::warn!(target: targets::BACKEND, error = %err, "click-through unsupported");
        }
    }
}

#[derive(Debug)]
struct State {
    next_id: u64,
    entries: HashMap<PanelId, Entry>,
    by_window: HashMap<WindowId, PanelId>,
    screen: Rect,
}

/// A [`PanelHost`] backed by winit windows.
#[derive(Debug, Clone)]
pub struct WinitPanelHost {
    state: Arc<Mutex<State>>,
}

impl Default for WinitPanelHost {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitPanelHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                entries: HashMap::new(),
                by_window: HashMap::new(),
                screen: Rect::new(0.0, 0.0, 1440.0, 900.0),
            })),
        }
    }

    /// Refresh the screen area and realize every pending panel.
    pub fn flush(&self, event_loop: &ActiveEventLoop) {
        let mut state = self.state.lock();

        if let Some(monitor) = event_loop.primary_monitor() {
            let scale = monitor.scale_factor();
            let origin = monitor.position().to_logical::<f64>(scale);
            let size = monitor.size().to_logical::<f64>(scale);
            state.screen = Rect::new(origin.x, origin.y, size.width, size.height);
        }

        let State {
            entries, by_window, ..
        } = &mut *state;
        for (id, entry) in entries.iter_mut().filter(|(_, e)| e.window.is_none()) {
            let config = entry
                .config
                .clone()
                .with_frame(entry.frame)
                .with_level(entry.level)
                .with_visible(entry.visible)
                .with_opacity(entry.opacity);
            let config = match entry.min_size {
                Some(min) => config.with_min_size(min),
                None => config,
            };

            match event_loop.create_window(to_window_attributes(&config)) {
                Ok(window) => {
                    entry.apply_all(&window);
                    if let Ok(pos) = window.outer_position() {
                        let pos = pos.to_logical::<f64>(window.scale_factor());
                        entry.reported_origin = Point::new(pos.x, pos.y);
                    }
                    by_window.insert(window.id(), *id);
                    tracing::debug!(target: targets::BACKEND, panel = id.as_raw(), "window realized");
                    entry.window = Some(window);
                }
                Err(err) => {
                    tracing::error!(target: targets::BACKEND, panel = id.as_raw(), error = %err, "window creation failed");
                }
            }
        }
    }

    /// Number of panels still waiting for [`WinitPanelHost::flush`].
    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .entries
            .values()
            .filter(|e| e.window.is_none())
            .count()
    }

    /// Opacity requested for a panel. winit has no per-window alpha, so the
    /// presentation layer multiplies this into what it draws.
    pub fn opacity(&self, panel: PanelId) -> Option<f64> {
        self.state.lock().entries.get(&panel).map(|e| e.opacity)
    }

    /// Translate a winit window event into a panel event.
    ///
    /// Frame events that merely echo a frame we set ourselves are dropped.
    pub fn translate(&self, window_id: WindowId, event: &WindowEvent) -> Option<(PanelId, PanelEvent)> {
        let mut state = self.state.lock();
        let panel = *state.by_window.get(&window_id)?;
        let entry = state.entries.get_mut(&panel)?;
        let scale = entry.scale();

        let event = match event {
            WindowEvent::Moved(position) => {
                let pos = position.to_logical::<f64>(scale);
                let origin = Point::new(pos.x, pos.y);
                entry.reported_origin = origin;
                if close_enough(origin.x, entry.frame.left()) && close_enough(origin.y, entry.frame.top()) {
                    return None;
                }
                entry.frame = entry.frame.with_origin(origin);
                PanelEvent::Moved(origin)
            }
            WindowEvent::Resized(physical) => {
                let logical = physical.to_logical::<f64>(scale);
                let size = Size::new(logical.width, logical.height);
                if close_enough(size.width, entry.frame.width())
                    && close_enough(size.height, entry.frame.height())
                {
                    return None;
                }
                entry.frame = entry.frame.with_size(size);
                PanelEvent::Resized(size)
            }
            WindowEvent::CloseRequested => PanelEvent::CloseRequested,
            WindowEvent::CursorMoved { position, .. } => {
                let pos = position.to_logical::<f64>(scale);
                let local = Point::new(pos.x, pos.y);
                entry.last_pointer = PointerPosition::new(local, entry.reported_origin.offset(local));
                PanelEvent::PointerMoved(entry.last_pointer)
            }
            WindowEvent::CursorEntered { .. } => PanelEvent::PointerEntered,
            WindowEvent::CursorLeft { .. } => PanelEvent::PointerLeft,
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed => PanelEvent::PointerPressed(entry.last_pointer),
                ElementState::Released => PanelEvent::PointerReleased,
            },
            _ => return None,
        };
        Some((panel, event))
    }

    fn with_entry(&self, panel: PanelId, f: impl FnOnce(&mut Entry)) {
        let mut state = self.state.lock();
        match state.entries.get_mut(&panel) {
            Some(entry) => f(entry),
            None => {
                tracing::debug!(target: targets::BACKEND, panel = panel.as_raw(), "operation on unknown panel");
            }
        }
    }
}

impl PanelHost for WinitPanelHost {
    fn create(&mut self, config: &PanelConfig) -> Result<PanelId, PanelError> {
        let mut state = self.state.lock();
        let id = PanelId(state.next_id);
        state.next_id += 1;
        state.entries.insert(
            id,
            Entry {
                config: config.clone(),
                window: None,
                frame: config.frame(),
                reported_origin: config.frame().origin,
                min_size: config.min_size(),
                level: config.level(),
                visible: config.is_visible(),
                opacity: config.opacity(),
                ignores_mouse: false,
                cursor: CursorIcon::Default,
                last_pointer: PointerPosition::new(Point::ZERO, config.frame().origin),
            },
        );
        Ok(id)
    }

    fn close(&mut self, panel: PanelId) {
        let mut state = self.state.lock();
        if let Some(entry) = state.entries.remove(&panel)
            && let Some(window) = entry.window
        {
            state.by_window.remove(&window.id());
            // Dropping the window closes it.
        }
    }

    fn frame(&self, panel: PanelId) -> Option<Rect> {
        self.state.lock().entries.get(&panel).map(|e| e.frame)
    }

    fn set_frame(&mut self, panel: PanelId, frame: Rect) {
        self.with_entry(panel, |entry| {
            entry.frame = frame;
            if entry.window.is_none() {
                entry.reported_origin = frame.origin;
            }
            if let Some(window) = &entry.window {
                window.set_outer_position(LogicalPosition::new(frame.left(), frame.top()));
                let _ = window.request_inner_size(LogicalSize::new(frame.width(), frame.height()));
            }
        });
    }

    fn set_min_size(&mut self, panel: PanelId, size: Size) {
        self.with_entry(panel, |entry| {
            entry.min_size = Some(size);
            if let Some(window) = &entry.window {
                window.set_min_inner_size(Some(LogicalSize::new(size.width, size.height)));
            }
        });
    }

    fn set_level(&mut self, panel: PanelId, level: PanelLevel) {
        self.with_entry(panel, |entry| {
            entry.level = level;
            if let Some(window) = &entry.window {
                window.set_window_level(level_to_winit(level));
            }
        });
    }

    fn set_visible(&mut self, panel: PanelId, visible: bool) {
        self.with_entry(panel, |entry| {
            entry.visible = visible;
            if let Some(window) = &entry.window {
                window.set_visible(visible);
            }
        });
    }

    fn is_visible(&self, panel: PanelId) -> bool {
        self.state
            .lock()
            .entries
            .get(&panel)
            .is_some_and(|e| e.visible)
    }

    fn order_front(&mut self, panel: PanelId) {
        self.with_entry(panel, |entry| {
            if let Some(window) = &entry.window {
                window.focus_window();
            }
        });
    }

    fn set_opacity(&mut self, panel: PanelId, opacity: f64) {
        self.with_entry(panel, |entry| {
            entry.opacity = opacity;
            if let Some(window) = &entry.window {
                window.request_redraw();
            }
        });
    }

    fn set_ignores_mouse(&mut self, panel: PanelId, ignore: bool) {
        self.with_entry(panel, |entry| {
            entry.ignores_mouse = ignore;
            if let Some(window) = &entry.window
                && let Err(err) = window.set_cursor_hittest(!ignore)
            {
                tracing::warn!(target: targets::BACKEND, error = %err, "click-through unsupported");
            }
        });
    }

    fn set_cursor(&mut self, panel: PanelId, cursor: CursorIcon) {
        self.with_entry(panel, |entry| {
            if entry.cursor == cursor {
                return;
            }
            entry.cursor = cursor;
            if let Some(window) = &entry.window {
                window.set_cursor(cursor);
            }
        });
    }

    fn screen_frame(&self) -> Rect {
        self.state.lock().screen
    }
}
