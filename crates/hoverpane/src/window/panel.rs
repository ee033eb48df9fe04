//! Floating panel configuration and the backend trait.

use cursor_icon::CursorIcon;
use hoverpane_core::{Point, Rect, Size};

use crate::error::PanelError;

/// Identifier of a panel allocated by a [`PanelHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(pub(crate) u64);

impl PanelId {
    /// The raw value, for logging.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Z-ordering tier of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelLevel {
    /// Ordinary application window level.
    Normal,
    /// Floats above other applications, including full-screen ones.
    #[default]
    Floating,
}

impl PanelLevel {
    /// The level for an `always_on_top` setting.
    pub fn for_always_on_top(enabled: bool) -> Self {
        if enabled { Self::Floating } else { Self::Normal }
    }
}

/// Configuration for creating a floating panel.
///
/// Panels are borderless, transparent and carry no standard window buttons
/// unless configured otherwise; the resize/drag controller supplies the
/// interactions the missing chrome would have provided.
///
/// ```ignore
/// let config = PanelConfig::new("Tokyo")
///     .with_frame(Rect::new(40.0, 40.0, 220.0, 72.0))
///     .with_min_size(Size::new(120.0, 60.0))
///     .with_level(PanelLevel::Floating);
/// let panel = host.create(&config)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    title: String,
    frame: Rect,
    min_size: Option<Size>,
    max_size: Option<Size>,
    level: PanelLevel,
    opacity: f64,
    corner_radius: f64,
    borderless: bool,
    chrome_buttons: bool,
    transparent: bool,
    visible: bool,
}

impl PanelConfig {
    /// Create a configuration with the given title and default options.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            frame: Rect::new(0.0, 0.0, 200.0, 100.0),
            min_size: None,
            max_size: None,
            level: PanelLevel::Floating,
            opacity: 1.0,
            corner_radius: 16.0,
            borderless: true,
            chrome_buttons: false,
            transparent: true,
            visible: true,
        }
    }

    /// Set the initial frame in screen coordinates.
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    /// Set the minimum content size.
    pub fn with_min_size(mut self, size: Size) -> Self {
        self.min_size = Some(size);
        self
    }

    /// Set the maximum content size.
    pub fn with_max_size(mut self, size: Size) -> Self {
        self.max_size = Some(size);
        self
    }

    /// Set the window level.
    pub fn with_level(mut self, level: PanelLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the whole-window opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the corner radius of the rounded mask.
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius.max(0.0);
        self
    }

    /// Keep or drop the platform border.
    pub fn with_borderless(mut self, borderless: bool) -> Self {
        self.borderless = borderless;
        self
    }

    /// Show the platform close/minimize/maximize buttons.
    pub fn with_chrome_buttons(mut self, enabled: bool) -> Self {
        self.chrome_buttons = enabled;
        self
    }

    /// Set whether the window background is transparent.
    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Set whether the panel is visible on creation.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn min_size(&self) -> Option<Size> {
        self.min_size
    }

    pub fn max_size(&self) -> Option<Size> {
        self.max_size
    }

    pub fn level(&self) -> PanelLevel {
        self.level
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    pub fn is_borderless(&self) -> bool {
        self.borderless
    }

    pub fn has_chrome_buttons(&self) -> bool {
        self.chrome_buttons
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Where the pointer was when a pointer event happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    /// Relative to the panel's top-left corner.
    pub local: Point,
    /// Screen coordinates, from the position the platform last reported for
    /// the panel rather than the last one requested.
    pub screen: Point,
}

impl PointerPosition {
    pub const fn new(local: Point, screen: Point) -> Self {
        Self { local, screen }
    }
}

/// Something that happened to a panel, reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelEvent {
    /// The panel's origin moved.
    Moved(Point),
    /// The panel's size changed.
    Resized(Size),
    /// The user asked to close the panel.
    CloseRequested,
    /// Primary button pressed.
    PointerPressed(PointerPosition),
    /// The pointer moved over the panel.
    PointerMoved(PointerPosition),
    /// Primary button released.
    PointerReleased,
    /// The pointer entered the panel.
    PointerEntered,
    /// The pointer left the panel.
    PointerLeft,
}

/// A windowing backend able to host floating panels.
pub trait PanelHost {
    /// Create a panel. The returned ID stays valid until [`PanelHost::close`].
    fn create(&mut self, config: &PanelConfig) -> Result<PanelId, PanelError>;

    /// Close and forget a panel. Unknown IDs are ignored.
    fn close(&mut self, panel: PanelId);

    /// Current frame of a panel in screen coordinates.
    fn frame(&self, panel: PanelId) -> Option<Rect>;

    fn set_frame(&mut self, panel: PanelId, frame: Rect);

    fn set_min_size(&mut self, panel: PanelId, size: Size);

    fn set_level(&mut self, panel: PanelId, level: PanelLevel);

    fn set_visible(&mut self, panel: PanelId, visible: bool);

    fn is_visible(&self, panel: PanelId) -> bool;

    /// Raise the panel above its siblings.
    fn order_front(&mut self, panel: PanelId);

    fn set_opacity(&mut self, panel: PanelId, opacity: f64);

    /// Let pointer events pass through the panel.
    fn set_ignores_mouse(&mut self, panel: PanelId, ignore: bool);

    fn set_cursor(&mut self, panel: PanelId, cursor: CursorIcon);

    /// Work area of the primary screen.
    fn screen_frame(&self) -> Rect;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_chromeless() {
        let config = PanelConfig::new("clock");
        assert!(config.is_borderless());
        assert!(!config.has_chrome_buttons());
        assert!(config.is_transparent());
        assert_eq!(config.level(), PanelLevel::Floating);
    }

    #[test]
    fn test_builder_chain() {
        let config = PanelConfig::new("photo")
            .with_frame(Rect::new(1.0, 2.0, 3.0, 4.0))
            .with_min_size(Size::new(10.0, 10.0))
            .with_opacity(2.0)
            .with_corner_radius(-4.0)
            .with_level(PanelLevel::Normal)
            .with_visible(false);

        assert_eq!(config.title(), "photo");
        assert_eq!(config.frame(), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(config.min_size(), Some(Size::new(10.0, 10.0)));
        assert_eq!(config.opacity(), 1.0);
        assert_eq!(config.corner_radius(), 0.0);
        assert_eq!(config.level(), PanelLevel::Normal);
        assert!(!config.is_visible());
    }

    #[test]
    fn test_level_for_always_on_top() {
        assert_eq!(PanelLevel::for_always_on_top(true), PanelLevel::Floating);
        assert_eq!(PanelLevel::for_always_on_top(false), PanelLevel::Normal);
    }
}
