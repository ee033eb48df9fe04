//! Error types for the widget host.
//!
//! Manager operations never surface these: per the host's failure policy
//! they are logged and absorbed where they occur. They appear only on
//! construction paths (opening the store, loading config, importing a photo,
//! creating a panel) where the caller decides how to degrade.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a [`crate::store::PersistenceStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded.
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be decoded.
    #[error("failed to decode '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by a [`crate::window::PanelHost`] backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    /// The platform refused to create the window.
    #[error("panel creation failed: {0}")]
    CreationFailed(String),
}

/// Errors raised while importing an image for a photo widget.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The source image could not be read or decoded.
    #[error("cannot read image '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The source has no usable file extension.
    #[error("unsupported image file '{0}'")]
    UnsupportedFormat(PathBuf),

    /// Copying into the photo storage directory failed.
    #[error("cannot store image at '{path}': {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading the host configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::config::HostConfig`].
    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Platform directories could not be determined.
    #[error("could not determine application directories")]
    NoDirectories,
}

/// Top-level error for host construction.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Panel(#[from] PanelError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Clock widgets need a valid IANA timezone identifier.
    #[error("unknown timezone identifier '{0}'")]
    UnknownTimezone(String),
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PanelError::CreationFailed("no display".into());
        assert!(err.to_string().contains("no display"));

        let err: HostError = PanelError::CreationFailed("no display".into()).into();
        assert!(err.to_string().contains("no display"));

        let err = HostError::UnknownTimezone("Mars/Olympus".into());
        assert!(err.to_string().contains("Mars/Olympus"));
    }
}
