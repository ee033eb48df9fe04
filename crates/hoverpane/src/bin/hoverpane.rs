//! The Hoverpane desktop widget host.
//!
//! ```text
//! hoverpane [--ephemeral] [--data-dir <path>]
//! ```
//!
//! Closing the primary clock hides it; the process keeps running until it
//! receives a quit command.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hoverpane::config::HostConfig;
use hoverpane::store::{JsonFileStore, MemoryStore, SharedStore};
use hoverpane::window::WinitPanelHost;
use hoverpane::WidgetHost;
use hoverpane_core::logging::targets;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

const USAGE: &str = "usage: hoverpane [--ephemeral] [--data-dir <path>]";

/// Longest sleep between command-queue checks.
const MAX_IDLE: Duration = Duration::from_millis(250);

#[derive(Debug, Default)]
struct Args {
    /// Keep state in memory only.
    ephemeral: bool,
    data_dir: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ephemeral" => parsed.ephemeral = true,
            "--data-dir" => {
                let dir = args.next().ok_or("--data-dir needs a path")?;
                parsed.data_dir = Some(PathBuf::from(dir));
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(parsed)
}

fn init_tracing(directive: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

struct App {
    host: WidgetHost,
    panels: WinitPanelHost,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.panels.flush(event_loop);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if let Some((panel, event)) = self.panels.translate(window_id, &event) {
            self.host.handle_panel_event(panel, event, Instant::now());
        }
        self.panels.flush(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.host.pump() {
            self.host.shutdown();
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        self.host.tick(now);
        self.panels.flush(event_loop);

        let wait = self
            .host
            .time_until_next(now)
            .map_or(MAX_IDLE, |next| next.min(MAX_IDLE));
        event_loop.set_control_flow(ControlFlow::WaitUntil(now + wait));
    }
}

fn run(args: Args, mut config: HostConfig) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }

    let (store, photo_dir): (SharedStore, Option<PathBuf>) = if args.ephemeral {
        tracing::info!(target: targets::HOST, "ephemeral session; nothing will be saved");
        (Arc::new(MemoryStore::new()), None)
    } else {
        let data_dir = config.data_dir()?;
        let store = JsonFileStore::open(&data_dir)?;
        tracing::info!(target: targets::HOST, path = %store.path().display(), "state file");
        (Arc::new(store), Some(HostConfig::photo_dir(&data_dir)))
    };

    let panels = WinitPanelHost::new();
    let host = WidgetHost::open(config, store, Box::new(panels.clone()), photo_dir)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut app = App { host, panels };
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let loaded = HostConfig::default_path().and_then(|path| HostConfig::from_file(&path));
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(err) => (HostConfig::default(), Some(err)),
    };
    init_tracing(config.log_filter.as_deref());
    if let Some(err) = config_error {
        tracing::warn!(target: targets::CONFIG, error = %err, "using default config");
    }

    match run(args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(target: targets::HOST, error = %err, "hoverpane failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let args = parse(&["--ephemeral", "--data-dir", "/tmp/x"]).unwrap();
        assert!(args.ephemeral);
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/x")));

        assert!(parse(&["--data-dir"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(!parse(&[]).unwrap().ephemeral);
    }
}
