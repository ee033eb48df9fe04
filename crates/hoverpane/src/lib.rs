//! Hoverpane - floating desktop widgets.
//!
//! A primary clock window plus optional secondary clocks and photos, each
//! shown as a borderless panel that floats above other applications.
//! Secondary clocks can dock into the primary window, which grows and
//! shrinks from its top edge to fit them. Positions, sizes, appearance and
//! docking survive restarts.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hoverpane::config::HostConfig;
//! use hoverpane::store::{MemoryStore, SharedStore};
//! use hoverpane::window::HeadlessHost;
//! use hoverpane::{HostCommand, WidgetHost};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: SharedStore = Arc::new(MemoryStore::new());
//!     let mut host = WidgetHost::open(HostConfig::default(), store, Box::new(HeadlessHost::default()), None)?;
//!
//!     host.execute(HostCommand::AddClock {
//!         label: "Tokyo".into(),
//!         timezone_id: "Asia/Tokyo".into(),
//!     });
//!     assert_eq!(host.clocks().docked_count(), 1);
//!     Ok(())
//! }
//! ```

pub use hoverpane_core::{Point, Rect, Signal, Size};

pub mod battery;
pub mod config;
pub mod error;
pub mod host;
pub mod manager;
pub mod model;
pub mod store;
pub mod window;

pub use error::{HostError, HostResult};
pub use host::{HostCommand, SettingsMutator, WidgetHost};
