//! In-memory panel backend.
//!
//! [`HeadlessHost`] keeps panel state in memory and logs every operation, so
//! coordinator, manager and layout behavior can be exercised without a
//! display server. Clones share state: hand one clone to the coordinator
//! and keep another to inspect.

use std::collections::BTreeMap;
use std::sync::Arc;

use cursor_icon::CursorIcon;
use hoverpane_core::logging::targets;
use hoverpane_core::{Rect, Size};
use parking_lot::Mutex;

use super::panel::{PanelConfig, PanelHost, PanelId, PanelLevel};
use crate::error::PanelError;

/// Snapshot of one headless panel.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessPanel {
    pub title: String,
    pub frame: Rect,
    pub min_size: Option<Size>,
    pub level: PanelLevel,
    pub visible: bool,
    pub opacity: f64,
    pub ignores_mouse: bool,
    pub cursor: CursorIcon,
    /// Incremented on each `order_front`.
    pub raised: u32,
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessOp {
    Create(PanelId),
    Close(PanelId),
    SetFrame(PanelId, Rect),
    SetMinSize(PanelId, Size),
    SetLevel(PanelId, PanelLevel),
    SetVisible(PanelId, bool),
    OrderFront(PanelId),
    SetOpacity(PanelId, f64),
    SetIgnoresMouse(PanelId, bool),
    SetCursor(PanelId, CursorIcon),
}

#[derive(Debug)]
struct State {
    screen: Rect,
    next_id: u64,
    panels: BTreeMap<PanelId, HeadlessPanel>,
    ops: Vec<HeadlessOp>,
    fail_next_create: bool,
}

/// A [`PanelHost`] without windows.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    state: Arc<Mutex<State>>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(Rect::new(0.0, 0.0, 1440.0, 900.0))
    }
}

impl HeadlessHost {
    /// Create a host with the given screen work area.
    pub fn new(screen: Rect) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                screen,
                next_id: 1,
                panels: BTreeMap::new(),
                ops: Vec::new(),
                fail_next_create: false,
            })),
        }
    }

    /// Snapshot a live panel.
    pub fn panel(&self, panel: PanelId) -> Option<HeadlessPanel> {
        self.state.lock().panels.get(&panel).cloned()
    }

    /// IDs of all live panels in creation order.
    pub fn panel_ids(&self) -> Vec<PanelId> {
        self.state.lock().panels.keys().copied().collect()
    }

    /// Number of live panels.
    pub fn live_count(&self) -> usize {
        self.state.lock().panels.len()
    }

    /// Find a live panel by title.
    pub fn find_by_title(&self, title: &str) -> Option<PanelId> {
        self.state
            .lock()
            .panels
            .iter()
            .find(|(_, p)| p.title == title)
            .map(|(id, _)| *id)
    }

    /// Every recorded operation so far.
    pub fn ops(&self) -> Vec<HeadlessOp> {
        self.state.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.lock().ops.clear();
    }

    /// Make the next `create` call fail.
    pub fn fail_next_create(&self) {
        self.state.lock().fail_next_create = true;
    }

    /// Change the reported screen work area.
    pub fn set_screen(&self, screen: Rect) {
        self.state.lock().screen = screen;
    }

    fn with_panel(&self, panel: PanelId, op: HeadlessOp, f: impl FnOnce(&mut HeadlessPanel)) {
        let mut state = self.state.lock();
        let Some(p) = state.panels.get_mut(&panel) else {
            tracing::debug!(target: targets::BACKEND, panel = panel.as_raw(), "operation on unknown panel");
            return;
        };
        f(p);
        state.ops.push(op);
    }
}

impl PanelHost for HeadlessHost {
    fn create(&mut self, config: &PanelConfig) -> Result<PanelId, PanelError> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_next_create) {
            return Err(PanelError::CreationFailed("headless failure injected".into()));
        }
        let id = PanelId(state.next_id);
        state.next_id += 1;
        state.panels.insert(
            id,
            HeadlessPanel {
                title: config.title().to_string(),
                frame: config.frame(),
                min_size: config.min_size(),
                level: config.level(),
                visible: config.is_visible(),
                opacity: config.opacity(),
                ignores_mouse: false,
                cursor: CursorIcon::Default,
                raised: 0,
            },
        );
        state.ops.push(HeadlessOp::Create(id));
        Ok(id)
    }

    fn close(&mut self, panel: PanelId) {
        let mut state = self.state.lock();
        if state.panels.remove(&panel).is_some() {
            state.ops.push(HeadlessOp::Close(panel));
        }
    }

    fn frame(&self, panel: PanelId) -> Option<Rect> {
        self.state.lock().panels.get(&panel).map(|p| p.frame)
    }

    fn set_frame(&mut self, panel: PanelId, frame: Rect) {
        self.with_panel(panel, HeadlessOp::SetFrame(panel, frame), |p| p.frame = frame);
    }

    fn set_min_size(&mut self, panel: PanelId, size: Size) {
        self.with_panel(panel, HeadlessOp::SetMinSize(panel, size), |p| {
            p.min_size = Some(size)
        });
    }

    fn set_level(&mut self, panel: PanelId, level: PanelLevel) {
        self.with_panel(panel, HeadlessOp::SetLevel(panel, level), |p| p.level = level);
    }

    fn set_visible(&mut self, panel: PanelId, visible: bool) {
        self.with_panel(panel, HeadlessOp::SetVisible(panel, visible), |p| {
            p.visible = visible
        });
    }

    fn is_visible(&self, panel: PanelId) -> bool {
        self.state
            .lock()
            .panels
            .get(&panel)
            .is_some_and(|p| p.visible)
    }

    fn order_front(&mut self, panel: PanelId) {
        self.with_panel(panel, HeadlessOp::OrderFront(panel), |p| p.raised += 1);
    }

    fn set_opacity(&mut self, panel: PanelId, opacity: f64) {
        self.with_panel(panel, HeadlessOp::SetOpacity(panel, opacity), |p| {
            p.opacity = opacity
        });
    }

    fn set_ignores_mouse(&mut self, panel: PanelId, ignore: bool) {
        self.with_panel(panel, HeadlessOp::SetIgnoresMouse(panel, ignore), |p| {
            p.ignores_mouse = ignore
        });
    }

    fn set_cursor(&mut self, panel: PanelId, cursor: CursorIcon) {
        self.with_panel(panel, HeadlessOp::SetCursor(panel, cursor), |p| p.cursor = cursor);
    }

    fn screen_frame(&self) -> Rect {
        self.state.lock().screen
    }
}
