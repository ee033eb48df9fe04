//! Floating panel management.
//!
//! This module turns widget records into borderless, always-on-top panels
//! and keeps them in sync with the managers:
//!
//! - [`PanelHost`]: the windowing backend ([`WinitPanelHost`] for real
//!   windows, [`HeadlessHost`] for tests)
//! - [`WindowCoordinator`]: owner map, event routing, primary window
//! - [`PrimaryLayoutEngine`]: primary height from the docked-widget count
//! - [`PointerController`]: resize/drag replacing the missing window chrome
//! - [`HoverFade`]: the "disappear on hover" effect
//!
//! Managers only see the [`WindowDriver`] trait.

mod chrome;
mod coordinator;
mod driver;
mod headless;
mod hover;
mod layout;
mod panel;
mod winit_host;

pub use chrome::{ChromeMetrics, Gesture, PointerController, ResizeRegion};
pub use coordinator::{CoordinatorConfig, CoordinatorNotice, PRIMARY_TITLE, WindowCoordinator};
pub use driver::{PanelOwner, PanelSpec, WindowDriver};
pub use headless::{HeadlessHost, HeadlessOp, HeadlessPanel};
pub use hover::{HoverAction, HoverFade, HoverTiming};
pub use layout::{LayoutMetrics, LayoutPlan, PrimaryLayoutEngine};
pub use panel::{PanelConfig, PanelEvent, PanelHost, PanelId, PanelLevel, PointerPosition};
pub use winit_host::{WinitPanelHost, to_window_attributes};
