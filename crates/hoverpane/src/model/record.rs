//! Persisted per-widget state.

use std::fmt;

use hoverpane_core::{Rect, Size};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::id::WidgetId;
use crate::error::HostError;
use super::settings::SettingsRecord;

/// The x/y value meaning "not yet placed, compute a default position".
pub const UNPLACED: f64 = -1.0;

/// Default size of a new secondary clock panel.
pub const DEFAULT_CLOCK_SIZE: Size = Size::new(220.0, 72.0);

/// The widget kinds that have a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    /// Secondary ("world") clock.
    Clock,
    /// Photo frame.
    Photo,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock => f.write_str("clock"),
            Self::Photo => f.write_str("photo"),
        }
    }
}

/// Frame of a widget in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    /// A geometry with the given size and no position yet.
    pub const fn unplaced(size: Size) -> Self {
        Self {
            x: UNPLACED,
            y: UNPLACED,
            width: size.width,
            height: size.height,
        }
    }

    /// Returns `true` while either coordinate still holds the sentinel.
    pub fn is_unplaced(&self) -> bool {
        self.x == UNPLACED || self.y == UNPLACED
    }

    /// The size part of the geometry.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Convert to a rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl From<Rect> for Geometry {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.origin.x,
            y: rect.origin.y,
            width: rect.size.width,
            height: rect.size.height,
        }
    }
}

/// Docking state of a dockable widget.
///
/// `dock_order` is only meaningful while `is_docked` is set; it is rebuilt
/// from list order after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DockState {
    pub is_docked: bool,
    pub dock_order: u32,
}

/// Behavior shared by every persisted widget record.
pub trait WidgetRecord: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Which manager owns records of this type.
    const KIND: WidgetKind;

    fn id(&self) -> WidgetId;

    fn geometry(&self) -> Geometry;

    fn set_geometry(&mut self, geometry: Geometry);

    fn settings(&self) -> &SettingsRecord;

    fn settings_mut(&mut self) -> &mut SettingsRecord;

    /// Label shown in menus and on the panel.
    fn label(&self) -> &str;

    fn set_label(&mut self, label: String);

    /// Check that a new record is usable before it is added.
    fn validate(&self) -> Result<(), HostError> {
        Ok(())
    }

    /// File name of a resource the record owns inside the data directory.
    ///
    /// Removing the record deletes this file.
    fn owned_resource(&self) -> Option<&str> {
        None
    }

    /// Docking state for kinds that can dock.
    fn dock_state(&self) -> Option<&DockState> {
        None
    }

    fn dock_state_mut(&mut self) -> Option<&mut DockState> {
        None
    }

    fn is_docked(&self) -> bool {
        self.dock_state().is_some_and(|d| d.is_docked)
    }
}

/// Records that can attach to the primary window.
pub trait Dockable: WidgetRecord {
    fn dock(&self) -> &DockState;

    fn dock_mut(&mut self) -> &mut DockState;
}

/// A secondary clock showing the time in another timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockRecord {
    id: WidgetId,
    pub label: String,
    /// IANA timezone identifier, e.g. `Europe/Paris`.
    pub timezone_id: String,
    #[serde(flatten)]
    pub geometry: Geometry,
    pub settings: SettingsRecord,
    #[serde(flatten)]
    pub dock: DockState,
}

impl ClockRecord {
    /// Create an unplaced, undocked clock with a fresh identity.
    pub fn new(label: impl Into<String>, timezone_id: impl Into<String>, settings: SettingsRecord) -> Self {
        Self {
            id: WidgetId::generate(),
            label: label.into(),
            timezone_id: timezone_id.into(),
            geometry: Geometry::unplaced(DEFAULT_CLOCK_SIZE),
            settings,
            dock: DockState::default(),
        }
    }
}

impl WidgetRecord for ClockRecord {
    const KIND: WidgetKind = WidgetKind::Clock;

    fn id(&self) -> WidgetId {
        self.id
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    fn settings(&self) -> &SettingsRecord {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut SettingsRecord {
        &mut self.settings
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: String) {
        self.label = label;
    }

    fn validate(&self) -> Result<(), HostError> {
        self.timezone_id
            .parse::<chrono_tz::Tz>()
            .map(|_| ())
            .map_err(|_| HostError::UnknownTimezone(self.timezone_id.clone()))
    }

    fn dock_state(&self) -> Option<&DockState> {
        Some(&self.dock)
    }

    fn dock_state_mut(&mut self) -> Option<&mut DockState> {
        Some(&mut self.dock)
    }
}

impl Dockable for ClockRecord {
    fn dock(&self) -> &DockState {
        &self.dock
    }

    fn dock_mut(&mut self) -> &mut DockState {
        &mut self.dock
    }
}

/// A floating photo frame backed by an image copied into the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    id: WidgetId,
    pub label: String,
    /// File name of the copy inside the photo storage directory.
    pub stored_image_file_name: String,
    /// Name of the file the user picked; display only.
    #[serde(default)]
    pub original_file_name: Option<String>,
    #[serde(flatten)]
    pub geometry: Geometry,
    pub settings: SettingsRecord,
}

impl PhotoRecord {
    /// Create an unplaced photo record.
    ///
    /// `id` is chosen by the caller because the stored file is named after it.
    pub fn new(id: WidgetId, stored_image_file_name: impl Into<String>, size: Size, settings: SettingsRecord) -> Self {
        Self {
            id,
            label: String::new(),
            stored_image_file_name: stored_image_file_name.into(),
            original_file_name: None,
            geometry: Geometry::unplaced(size),
            settings,
        }
    }
}

impl WidgetRecord for PhotoRecord {
    const KIND: WidgetKind = WidgetKind::Photo;

    fn id(&self) -> WidgetId {
        self.id
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    fn settings(&self) -> &SettingsRecord {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut SettingsRecord {
        &mut self.settings
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: String) {
        self.label = label;
    }

    fn owned_resource(&self) -> Option<&str> {
        Some(&self.stored_image_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_is_unplaced_and_floating() {
        let clock = ClockRecord::new("Paris", "Europe/Paris", SettingsRecord::default());
        assert!(clock.geometry.is_unplaced());
        assert!(!clock.is_docked());
        assert_eq!(clock.geometry.size(), DEFAULT_CLOCK_SIZE);
    }

    #[test]
    fn test_clock_wire_shape_is_flat() {
        let mut clock = ClockRecord::new("Tokyo", "Asia/Tokyo", SettingsRecord::default());
        clock.dock = DockState {
            is_docked: true,
            dock_order: 2,
        };
        let json = serde_json::to_value(&clock).unwrap();
        assert_eq!(json["timezone_id"], "Asia/Tokyo");
        assert_eq!(json["is_docked"], true);
        assert_eq!(json["dock_order"], 2);
        assert_eq!(json["x"], -1.0);

        let back: ClockRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, clock);
    }

    #[test]
    fn test_clock_validates_timezone() {
        let ok = ClockRecord::new("Paris", "Europe/Paris", SettingsRecord::default());
        assert!(ok.validate().is_ok());

        let bad = ClockRecord::new("Nowhere", "Mars/Olympus_Mons", SettingsRecord::default());
        assert!(matches!(bad.validate(), Err(HostError::UnknownTimezone(_))));
    }

    #[test]
    fn test_photo_owns_its_file() {
        let photo = PhotoRecord::new(
            WidgetId::from_raw(9),
            "cat.png",
            Size::new(300.0, 200.0),
            SettingsRecord::default(),
        );
        assert_eq!(photo.owned_resource(), Some("cat.png"));
        assert!(photo.dock_state().is_none());
        assert!(!photo.is_docked());
    }

    #[test]
    fn test_geometry_rect_conversion() {
        let g = Geometry::from(Rect::new(10.0, 20.0, 30.0, 40.0));
        assert!(!g.is_unplaced());
        assert_eq!(g.to_rect(), Rect::new(10.0, 20.0, 30.0, 40.0));
    }
}
