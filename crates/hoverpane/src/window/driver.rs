//! The window operations widget managers depend on.

use hoverpane_core::Rect;

use super::panel::PanelId;
use crate::model::{SettingsRecord, WidgetId, WidgetKind};

/// Who a panel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelOwner {
    /// The primary clock window.
    Primary,
    /// A floating widget owned by the manager for `kind`.
    Widget(WidgetKind, WidgetId),
}

/// What a manager asks the driver to create.
#[derive(Debug, Clone, Copy)]
pub struct PanelSpec<'a> {
    pub owner: PanelOwner,
    pub title: &'a str,
    pub frame: Rect,
    pub settings: &'a SettingsRecord,
}

/// Window services consumed by the widget managers.
///
/// Implemented by [`super::WindowCoordinator`]; managers never talk to a
/// windowing backend directly.
pub trait WindowDriver {
    /// Create a floating panel. Failures are logged and yield `None`.
    fn materialize(&mut self, spec: PanelSpec<'_>) -> Option<PanelId>;

    /// Close a panel created by [`WindowDriver::materialize`].
    fn destroy(&mut self, panel: PanelId);

    /// Current frame of a panel.
    fn panel_frame(&self, panel: PanelId) -> Option<Rect>;

    fn bring_to_front(&mut self, panel: PanelId);

    /// Re-apply level and opacity after a settings change.
    fn apply_appearance(&mut self, panel: PanelId, settings: &SettingsRecord);

    /// Frame of the primary window, if it exists.
    fn primary_frame(&self) -> Option<Rect>;

    fn is_primary_visible(&self) -> bool;

    fn show_primary(&mut self);

    /// Work area of the primary screen.
    fn screen_frame(&self) -> Rect;

    /// The number of docked widgets changed; relayout the primary window.
    fn docked_count_changed(&mut self, count: usize);
}
