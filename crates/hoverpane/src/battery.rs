//! Battery status polling for the clock's battery indicator.
//!
//! [`BatteryMonitor`] polls on a background thread and sends a
//! [`BatteryReading`] whenever the reading changes. The UI thread takes the
//! newest reading with [`BatteryMonitor::latest`]. Without the
//! `power-management` feature the monitor never reports anything.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use hoverpane_core::logging::targets;

/// Charge state of the system battery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySnapshot {
    /// Average charge over all batteries, 0 to 100.
    pub level_percent: f32,
    /// On external power (charging or full).
    pub charging: bool,
}

/// One poll result. `None` means no battery could be read.
pub type BatteryReading = Option<BatterySnapshot>;

/// Background battery poller. Stops when dropped.
#[derive(Debug)]
pub struct BatteryMonitor {
    readings: Receiver<BatteryReading>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl BatteryMonitor {
    /// Start polling every `interval`.
    pub fn spawn(interval: Duration) -> Self {
        let (reading_tx, readings) = unbounded();
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("hoverpane-battery".into())
            .spawn(move || poll_loop(interval, &reading_tx, &stop_rx));

        match handle {
            Ok(handle) => Self {
                readings,
                stop: Some(stop_tx),
                handle: Some(handle),
            },
            Err(err) => {
                tracing::error!(target: targets::BATTERY, error = %err, "failed to start battery polling");
                Self::disabled()
            }
        }
    }

    /// A monitor that never reports.
    pub fn disabled() -> Self {
        let (_, readings) = unbounded();
        Self {
            readings,
            stop: None,
            handle: None,
        }
    }

    /// Returns `true` if a polling thread is running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// The most recent reading received since the last call, if any.
    pub fn latest(&self) -> Option<BatteryReading> {
        self.readings.try_iter().last()
    }
}

impl Drop for BatteryMonitor {
    fn drop(&mut self) {
        // Dropping the sender wakes the poll loop with `Disconnected`.
        self.stop.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!(target: targets::BATTERY, "battery thread panicked");
        }
    }
}

fn poll_loop(interval: Duration, readings: &Sender<BatteryReading>, stop: &Receiver<()>) {
    let mut last: Option<BatteryReading> = None;
    loop {
        let reading = read_battery();
        if last != Some(reading) {
            tracing::debug!(target: targets::BATTERY, ?reading, "battery reading changed");
            if readings.send(reading).is_err() {
                break;
            }
            last = Some(reading);
        }

        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    tracing::debug!(target: targets::BATTERY, "battery polling stopped");
}

#[cfg(feature = "power-management")]
fn read_battery() -> BatteryReading {
    use starship_battery::Manager;
    use starship_battery::units::ratio::percent;

    let manager = Manager::new().ok()?;
    let batteries = manager.batteries().ok()?;

    let mut total = 0.0;
    let mut count = 0;
    let mut charging = false;
    for battery in batteries.flatten() {
        total += battery.state_of_charge().get::<percent>();
        count += 1;
        charging |= matches!(
            battery.state(),
            starship_battery::State::Charging | starship_battery::State::Full
        );
    }

    (count > 0).then(|| BatterySnapshot {
        level_percent: total / count as f32,
        charging,
    })
}

#[cfg(not(feature = "power-management"))]
fn read_battery() -> BatteryReading {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let monitor = BatteryMonitor::disabled();
        assert!(!monitor.is_running());
        assert!(monitor.latest().is_none());
    }

    #[test]
    fn test_monitor_reports_first_reading_and_stops_on_drop() {
        let monitor = BatteryMonitor::spawn(Duration::from_secs(3600));
        let first = monitor.readings.recv_timeout(Duration::from_secs(5));
        assert!(first.is_ok());
        drop(monitor);
    }
}
