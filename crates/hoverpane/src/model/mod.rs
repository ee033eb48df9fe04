//! Data model: widget identity, settings and persisted records.

mod id;
mod preset;
mod record;
mod settings;

pub use id::{ParseWidgetIdError, WidgetId};
pub use preset::{PositionPreset, fit_to_screen};
pub use record::{
    ClockRecord, DEFAULT_CLOCK_SIZE, DockState, Dockable, Geometry, PhotoRecord, UNPLACED,
    WidgetKind, WidgetRecord,
};
pub use settings::{
    FitMode, FontColor, FontFamily, GlassStyle, MAX_ADJUSTABLE_BLACK_OPACITY,
    MIN_ADJUSTABLE_BLACK_OPACITY, SettingsRecord,
};
