//! Logging facilities for Hoverpane.
//!
//! Hoverpane uses the `tracing` crate for instrumentation. Libraries only emit
//! events; the `hoverpane` binary installs a `tracing-subscriber` formatter.
//!
//! Every event carries an explicit target from [`targets`], so a filter such
//! as `RUST_LOG=hoverpane::manager=debug,hoverpane::layout=trace` isolates one
//! subsystem.

/// Target names for log filtering.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "hoverpane_core::signal";
    /// Timer system target.
    pub const TIMER: &str = "hoverpane_core::timer";
    /// Widget managers (add/remove/dock/undock/reorder).
    pub const MANAGER: &str = "hoverpane::manager";
    /// Window coordinator (panel creation, event routing).
    pub const COORDINATOR: &str = "hoverpane::coordinator";
    /// Primary window layout engine.
    pub const LAYOUT: &str = "hoverpane::layout";
    /// Persistence store.
    pub const STORE: &str = "hoverpane::store";
    /// Resize/drag controller.
    pub const CHROME: &str = "hoverpane::chrome";
    /// Hover fade controller.
    pub const HOVER: &str = "hoverpane::hover";
    /// Battery polling.
    pub const BATTERY: &str = "hoverpane::battery";
    /// Host composition root and command bus.
    pub const HOST: &str = "hoverpane::host";
    /// Configuration loading.
    pub const CONFIG: &str = "hoverpane::config";
    /// Platform window backend.
    pub const BACKEND: &str = "hoverpane::backend";
}
