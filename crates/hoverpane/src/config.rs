//! Host configuration.
//!
//! Tunables live in `hoverpane.toml` in the platform config directory. Every
//! field has a default, so the file may list only what it overrides:
//!
//! ```toml
//! per_widget_height = 64
//! hover_fade_opacity = 0.1
//! log_filter = "hoverpane=debug"
//!
//! [panel_min_size]
//! width = 140
//! height = 60
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use hoverpane_core::Size;
use hoverpane_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::manager::ManagerOptions;
use crate::window::{ChromeMetrics, CoordinatorConfig, HoverTiming, LayoutMetrics};

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "hoverpane.toml";

/// Subdirectory of the data directory holding imported photos.
pub const PHOTO_DIR_NAME: &str = "photos";

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "hoverpane";
const APPLICATION: &str = "hoverpane";

/// Tunables of the widget host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Primary window minimum height with nothing docked.
    pub base_min_height: f64,
    /// Height each docked widget adds to the primary window.
    pub per_widget_height: f64,
    pub primary_min_width: f64,
    /// Primary window size when nothing was saved.
    pub primary_default_size: Size,
    /// Width of the resize band along each panel edge.
    pub edge_hit_thickness: f64,
    pub corner_size: f64,
    pub panel_min_size: Size,
    pub panel_max_size: Size,
    /// Cascade step between newly placed widgets.
    pub new_widget_offset: f64,
    /// Distance from the screen edge for position presets.
    pub screen_margin: f64,
    pub battery_poll_secs: u64,
    /// Delay before a faded panel starts ignoring the mouse.
    pub hover_hit_test_delay_ms: u64,
    /// How long a click-through panel stays hidden.
    pub hover_restore_ms: u64,
    pub hover_fade_opacity: f64,
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        let layout = LayoutMetrics::default();
        let chrome = ChromeMetrics::default();
        let hover = HoverTiming::default();
        let coordinator = CoordinatorConfig::default();
        Self {
            base_min_height: layout.base_min_height,
            per_widget_height: layout.per_widget_height,
            primary_min_width: layout.min_width,
            primary_default_size: coordinator.primary_default_size,
            edge_hit_thickness: chrome.edge_thickness,
            corner_size: chrome.corner_size,
            panel_min_size: coordinator.panel_min_size,
            panel_max_size: coordinator.panel_max_size,
            new_widget_offset: 30.0,
            screen_margin: coordinator.screen_margin,
            battery_poll_secs: 60,
            hover_hit_test_delay_ms: hover.hit_test_delay.as_millis() as u64,
            hover_restore_ms: hover.restore_after.as_millis() as u64,
            hover_fade_opacity: hover.faded_opacity,
            data_dir: None,
            log_filter: None,
        }
    }
}

impl HostConfig {
    /// Load the config from the platform config directory.
    ///
    /// A missing file yields the defaults. So does a file that cannot be read
    /// or parsed, after logging why. Fails only if the platform directories
    /// cannot be determined.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        Ok(Self::from_file(&path).unwrap_or_else(|err| {
            tracing::warn!(target: targets::CONFIG, error = %err, "using default config");
            Self::default()
        }))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(target: targets::CONFIG, path = %path.display(), "no config file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(target: targets::CONFIG, path = %path.display(), "config loaded");
        Ok(config)
    }

    /// `<config_dir>/hoverpane.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Directory holding the state file and imported photos.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }

    /// Directory of imported photos under `data_dir`.
    pub fn photo_dir(data_dir: &Path) -> PathBuf {
        data_dir.join(PHOTO_DIR_NAME)
    }

    pub fn battery_poll_interval(&self) -> Duration {
        Duration::from_secs(self.battery_poll_secs.max(1))
    }

    /// Window coordinator settings derived from this config.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            chrome: ChromeMetrics {
                edge_thickness: self.edge_hit_thickness,
                corner_size: self.corner_size,
            },
            layout: LayoutMetrics {
                base_min_height: self.base_min_height,
                per_widget_height: self.per_widget_height,
                min_width: self.primary_min_width,
            },
            hover: HoverTiming {
                faded_opacity: self.hover_fade_opacity.clamp(0.0, 1.0),
                hit_test_delay: Duration::from_millis(self.hover_hit_test_delay_ms),
                restore_after: Duration::from_millis(self.hover_restore_ms),
            },
            panel_min_size: self.panel_min_size,
            panel_max_size: self.panel_max_size,
            primary_default_size: self.primary_default_size,
            screen_margin: self.screen_margin,
        }
    }

    /// Manager options for a kind whose resources live in `resource_dir`.
    pub fn manager_options(&self, resource_dir: Option<PathBuf>) -> ManagerOptions {
        ManagerOptions {
            resource_dir,
            new_widget_offset: self.new_widget_offset,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(ConfigError::NoDirectories)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = HostConfig::from_file(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.base_min_height, 80.0);
        assert_eq!(config.per_widget_height, 56.0);
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "per_widget_height = 64.0\nlog_filter = \"debug\"\n\n[panel_min_size]\nwidth = 140.0\nheight = 70.0\n",
        )
        .unwrap();

        let config = HostConfig::from_file(&path).unwrap();
        assert_eq!(config.per_widget_height, 64.0);
        assert_eq!(config.panel_min_size, Size::new(140.0, 70.0));
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
        assert_eq!(config.base_min_height, 80.0);

        let coordinator = config.coordinator_config();
        assert_eq!(coordinator.layout.per_widget_height, 64.0);
        assert_eq!(coordinator.panel_min_size, Size::new(140.0, 70.0));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "per_widget_height = [").unwrap();
        assert!(matches!(
            HostConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_data_dir_override() {
        let config = HostConfig {
            data_dir: Some(PathBuf::from("/tmp/hoverpane-test")),
            ..HostConfig::default()
        };
        let data = config.data_dir().unwrap();
        assert_eq!(data, PathBuf::from("/tmp/hoverpane-test"));
        assert_eq!(HostConfig::photo_dir(&data), data.join("photos"));
    }
}
