//! Core systems for Hoverpane.
//!
//! This crate provides the foundational pieces the widget host is built on:
//!
//! - **Signal/Slot System**: Typed observer lists for cross-component notifications
//! - **Timers**: One-shot timers, plus a cancel-and-replace debounce slot
//! - **Apply Guard**: An explicit `Idle | Applying` re-entrancy state machine
//! - **Geometry**: Points, sizes and frames in logical screen pixels
//! - **Logging**: Tracing targets used across the workspace
//!
//! # Signal Example
//!
//! ```
//! use hoverpane_core::Signal;
//!
//! let docked_count_changed = Signal::<usize>::new();
//!
//! let conn_id = docked_count_changed.connect(|count| {
//!     println!("{} widgets docked", count);
//! });
//!
//! docked_count_changed.emit(2);
//! docked_count_changed.disconnect(conn_id);
//! ```
//!
//! # Debounce Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use hoverpane_core::{DebounceSlot, TimerManager};
//!
//! let mut timers = TimerManager::new();
//! let mut slot = DebounceSlot::new();
//!
//! let now = Instant::now();
//! slot.schedule(&mut timers, now, Duration::from_millis(200));
//! // A newer request supersedes the pending one.
//! let latest = slot.schedule(&mut timers, now, Duration::from_millis(200));
//!
//! let fired = timers.process_expired(now + Duration::from_millis(250));
//! assert_eq!(fired, vec![latest]);
//! ```

mod error;
pub mod geometry;
pub mod guard;
pub mod logging;
pub mod signal;
pub mod timer;

pub use error::{CoreError, Result, TimerError};
pub use geometry::{Point, Rect, Size};
pub use guard::{ApplyGuard, ApplyToken, GuardState};
pub use signal::{ConnectionId, Signal};
pub use timer::{DebounceSlot, TimerId, TimerManager};
