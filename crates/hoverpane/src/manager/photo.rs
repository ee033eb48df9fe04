//! Photo import.
//!
//! A photo widget shows a private copy of the user's image, stored in the
//! photo directory under a name derived from the widget id. Removing the
//! widget deletes the copy.

use std::fs;
use std::path::Path;

use hoverpane_core::Size;
use hoverpane_core::logging::targets;
use image::ImageFormat;

use super::PhotoManager;
use crate::error::ImportError;
use crate::model::{PhotoRecord, SettingsRecord, WidgetId};
use crate::window::WindowDriver;

/// Length of the longer side of a new photo widget.
pub const PHOTO_DEFAULT_LONG_SIDE: f64 = 280.0;

/// Validate `source`, copy it into `storage_dir` and build an unplaced record.
///
/// Nothing is left behind in `storage_dir` on failure.
pub fn import_photo(
    source: &Path,
    storage_dir: &Path,
    settings: SettingsRecord,
) -> Result<PhotoRecord, ImportError> {
    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| ImageFormat::from_extension(e).is_some())
        .ok_or_else(|| ImportError::UnsupportedFormat(source.to_path_buf()))?;

    let (width, height) = image::image_dimensions(source).map_err(|source_err| ImportError::Unreadable {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let id = WidgetId::generate();
    let file_name = format!("{id}.{extension}");
    let target = storage_dir.join(&file_name);

    fs::create_dir_all(storage_dir)
        .and_then(|()| fs::copy(source, &target))
        .map_err(|err| {
            let _ = fs::remove_file(&target);
            ImportError::Copy {
                path: target.clone(),
                source: err,
            }
        })?;

    let mut record = PhotoRecord::new(id, file_name, fitted_size(width, height), settings);
    record.original_file_name = source.file_name().map(|n| n.to_string_lossy().into_owned());
    record.label = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::info!(
        target: targets::MANAGER,
        %id,
        source = %source.display(),
        width,
        height,
        "photo imported"
    );
    Ok(record)
}

/// Scale pixel dimensions so the longer side is [`PHOTO_DEFAULT_LONG_SIDE`].
fn fitted_size(width: u32, height: u32) -> Size {
    let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
    if w >= h {
        Size::new(PHOTO_DEFAULT_LONG_SIDE, (PHOTO_DEFAULT_LONG_SIDE * h / w).round())
    } else {
        Size::new((PHOTO_DEFAULT_LONG_SIDE * w / h).round(), PHOTO_DEFAULT_LONG_SIDE)
    }
}

impl PhotoManager {
    /// Import `source` and open it as a new photo widget.
    ///
    /// Returns `None` if the image cannot be imported; the record list is
    /// not touched in that case.
    pub fn add_photo(
        &mut self,
        source: &Path,
        settings: SettingsRecord,
        driver: &mut impl WindowDriver,
    ) -> Option<WidgetId> {
        let Some(dir) = self.options.resource_dir.clone() else {
            tracing::warn!(target: targets::MANAGER, "no photo directory configured");
            return None;
        };
        let record = match import_photo(source, &dir, settings) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(target: targets::MANAGER, error = %err, "photo import failed");
                return None;
            }
        };

        let stored = dir.join(&record.stored_image_file_name);
        let added = self.add(record, driver);
        if added.is_none() {
            let _ = fs::remove_file(stored);
        }
        added
    }
}
