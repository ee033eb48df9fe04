//! Per-widget visual configuration.
//!
//! A [`SettingsRecord`] is plain data plus clamping setters. Opacity fields
//! are private so every write, including decoding a hand-edited state file,
//! passes through the clamp.

use serde::{Deserialize, Deserializer, Serialize};

/// Lower bound of [`SettingsRecord::adjustable_black_opacity`].
pub const MIN_ADJUSTABLE_BLACK_OPACITY: f64 = 0.4;
/// Upper bound of [`SettingsRecord::adjustable_black_opacity`].
pub const MAX_ADJUSTABLE_BLACK_OPACITY: f64 = 1.0;

/// Named palette for clock text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontColor {
    #[default]
    White,
    Black,
    Red,
    Orange,
    Yellow,
    Green,
    Mint,
    Teal,
    Cyan,
    Blue,
    Indigo,
    Purple,
    Pink,
    Gray,
}

impl FontColor {
    /// Every palette entry, in menu order.
    pub const ALL: [FontColor; 14] = [
        Self::White,
        Self::Black,
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Mint,
        Self::Teal,
        Self::Cyan,
        Self::Blue,
        Self::Indigo,
        Self::Purple,
        Self::Pink,
        Self::Gray,
    ];

    /// sRGB components for the presentation layer.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::White => [255, 255, 255],
            Self::Black => [0, 0, 0],
            Self::Red => [255, 59, 48],
            Self::Orange => [255, 149, 0],
            Self::Yellow => [255, 204, 0],
            Self::Green => [52, 199, 89],
            Self::Mint => [0, 199, 190],
            Self::Teal => [48, 176, 199],
            Self::Cyan => [50, 173, 230],
            Self::Blue => [0, 122, 255],
            Self::Indigo => [88, 86, 214],
            Self::Purple => [175, 82, 222],
            Self::Pink => [255, 45, 85],
            Self::Gray => [142, 142, 147],
        }
    }
}

/// Named typeface styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    Rounded,
    Monospaced,
    Serif,
    Condensed,
    Default,
}

/// Background treatment of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlassStyle {
    #[default]
    Liquid,
    Clear,
    Black,
    /// Black backdrop with [`SettingsRecord::adjustable_black_opacity`].
    AdjustableBlack,
}

/// How a background image fills the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    #[default]
    Fill,
    Fit,
}

/// Visual configuration of one widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsRecord {
    pub font_color: FontColor,
    pub font_family: FontFamily,
    pub glass_style: GlassStyle,
    #[serde(deserialize_with = "de_black_opacity")]
    adjustable_black_opacity: f64,
    pub show_seconds: bool,
    pub use_24_hour: bool,
    pub show_battery: bool,
    pub always_on_top: bool,
    pub disappear_on_hover: bool,
    #[serde(deserialize_with = "de_unit_interval")]
    window_opacity: f64,
    pub background_image_ref: Option<String>,
    pub background_image_fit_mode: FitMode,
    #[serde(deserialize_with = "de_unit_interval")]
    background_image_opacity: f64,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            font_color: FontColor::default(),
            font_family: FontFamily::default(),
            glass_style: GlassStyle::default(),
            adjustable_black_opacity: 0.7,
            show_seconds: false,
            use_24_hour: false,
            show_battery: false,
            always_on_top: true,
            disappear_on_hover: false,
            window_opacity: 1.0,
            background_image_ref: None,
            background_image_fit_mode: FitMode::default(),
            background_image_opacity: 1.0,
        }
    }
}

impl SettingsRecord {
    /// Opacity of the adjustable-black glass, always in `[0.4, 1.0]`.
    pub fn adjustable_black_opacity(&self) -> f64 {
        self.adjustable_black_opacity
    }

    /// Set the adjustable-black opacity, clamped to `[0.4, 1.0]`.
    pub fn set_adjustable_black_opacity(&mut self, value: f64) {
        self.adjustable_black_opacity = clamp_black_opacity(value);
    }

    /// Whole-window opacity, always in `[0, 1]`.
    pub fn window_opacity(&self) -> f64 {
        self.window_opacity
    }

    /// Set the whole-window opacity, clamped to `[0, 1]`.
    pub fn set_window_opacity(&mut self, value: f64) {
        self.window_opacity = clamp_unit(value, 1.0);
    }

    /// Background image opacity, always in `[0, 1]`.
    pub fn background_image_opacity(&self) -> f64 {
        self.background_image_opacity
    }

    /// Set the background image opacity, clamped to `[0, 1]`.
    pub fn set_background_image_opacity(&mut self, value: f64) {
        self.background_image_opacity = clamp_unit(value, 1.0);
    }
}

fn clamp_black_opacity(value: f64) -> f64 {
    if value.is_nan() {
        return MAX_ADJUSTABLE_BLACK_OPACITY;
    }
    value.clamp(MIN_ADJUSTABLE_BLACK_OPACITY, MAX_ADJUSTABLE_BLACK_OPACITY)
}

fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(0.0, 1.0)
}

fn de_black_opacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_black_opacity)
}

fn de_unit_interval<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(|v| clamp_unit(v, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_opacity_clamps_on_write() {
        let mut settings = SettingsRecord::default();

        settings.set_adjustable_black_opacity(1.5);
        assert_eq!(settings.adjustable_black_opacity(), 1.0);

        settings.set_adjustable_black_opacity(0.1);
        assert_eq!(settings.adjustable_black_opacity(), 0.4);

        settings.set_adjustable_black_opacity(0.65);
        assert_eq!(settings.adjustable_black_opacity(), 0.65);
    }

    #[test]
    fn test_unit_opacities_clamp() {
        let mut settings = SettingsRecord::default();
        settings.set_window_opacity(-2.0);
        settings.set_background_image_opacity(3.0);
        assert_eq!(settings.window_opacity(), 0.0);
        assert_eq!(settings.background_image_opacity(), 1.0);

        settings.set_window_opacity(f64::NAN);
        assert_eq!(settings.window_opacity(), 1.0);
    }

    #[test]
    fn test_decode_clamps_out_of_range_values() {
        let json = r#"{"adjustable_black_opacity": 7.0, "window_opacity": -1.0}"#;
        let settings: SettingsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(settings.adjustable_black_opacity(), 1.0);
        assert_eq!(settings.window_opacity(), 0.0);
        // Missing fields take defaults.
        assert_eq!(settings.font_color, FontColor::White);
        assert!(settings.always_on_top);
    }

    #[test]
    fn test_enum_wire_names() {
        let mut settings = SettingsRecord::default();
        settings.glass_style = GlassStyle::AdjustableBlack;
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["glass_style"], "adjustable-black");
    }

    #[test]
    fn test_palette_is_complete() {
        assert_eq!(FontColor::ALL.len(), 14);
        assert_eq!(FontColor::Black.rgb(), [0, 0, 0]);
    }
}
