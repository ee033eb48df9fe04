//! Saved state survives a restart of the whole host.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use hoverpane::config::HostConfig;
use hoverpane::model::{FontColor, PositionPreset, WidgetKind, WidgetRecord};
use hoverpane::store::{JsonFileStore, PersistenceStore, STATE_FILE_NAME, SharedStore, StoreExt, StoreKey};
use hoverpane::window::{HeadlessHost, PanelEvent};
use hoverpane::{HostCommand, Point, Rect, WidgetHost};
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

fn open_host(dir: &Path) -> (WidgetHost, HeadlessHost) {
    let store: SharedStore = Arc::new(JsonFileStore::open(dir).unwrap());
    let panels = HeadlessHost::new(Rect::new(0.0, 0.0, 1920.0, 1080.0));
    let host = WidgetHost::open(
        HostConfig::default(),
        store,
        Box::new(panels.clone()),
        Some(HostConfig::photo_dir(dir)),
    )
    .unwrap();
    (host, panels)
}

fn add_clock(host: &mut WidgetHost, label: &str, timezone_id: &str) {
    host.execute(HostCommand::AddClock {
        label: label.into(),
        timezone_id: timezone_id.into(),
    });
}

fn clock_id(host: &WidgetHost, label: &str) -> hoverpane::model::WidgetId {
    host.clocks()
        .records()
        .iter()
        .find(|r| r.label == label)
        .map(|r| r.id())
        .unwrap()
}

#[test]
fn test_clocks_dock_state_and_open_windows_survive_restart() {
    let dir = TempDir::new().unwrap();

    {
        let (mut host, _) = open_host(dir.path());
        add_clock(&mut host, "Tokyo", "Asia/Tokyo");
        add_clock(&mut host, "Paris", "Europe/Paris");
        add_clock(&mut host, "Lima", "America/Lima");

        let paris = clock_id(&host, "Paris");
        let lima = clock_id(&host, "Lima");
        host.execute(HostCommand::Undock(paris));
        host.execute(HostCommand::ReorderClocks {
            dragged: lima,
            target: clock_id(&host, "Tokyo"),
        });

        let panel = host.clocks().panel_of(paris).unwrap();
        host.handle_panel_event(panel, PanelEvent::Moved(Point::new(900.0, 40.0)), Instant::now());
        host.shutdown();
    }

    let (host, panels) = open_host(dir.path());
    let labels: Vec<_> = host.clocks().records().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Lima", "Tokyo", "Paris"]);

    let docked: Vec<_> = host
        .clocks()
        .docked()
        .map(|r| (r.label.as_str(), r.dock.dock_order))
        .collect();
    assert_eq!(docked, vec![("Lima", 0), ("Tokyo", 1)]);
    assert_eq!(host.coordinator().docked_count(), 2);

    let paris = clock_id(&host, "Paris");
    let panel = host.clocks().panel_of(paris).unwrap();
    let frame = panels.panel(panel).unwrap().frame;
    assert_eq!((frame.left(), frame.top()), (900.0, 40.0));
    assert_eq!(panels.live_count(), 2);
}

#[test]
fn test_main_settings_and_primary_position_survive_restart() {
    let dir = TempDir::new().unwrap();

    {
        let (mut host, _) = open_host(dir.path());
        host.update_main_settings(|s| {
            s.font_color = FontColor::Orange;
            s.set_adjustable_black_opacity(0.2);
        });
        let primary = host.coordinator().primary().unwrap();
        host.handle_panel_event(primary, PanelEvent::Moved(Point::new(120.0, 640.0)), Instant::now());
    }

    let store = JsonFileStore::open(dir.path()).unwrap();
    assert_eq!(store.load_value::<PositionPreset>(StoreKey::PrimaryPreset), Some(PositionPreset::Custom));

    let (host, panels) = open_host(dir.path());
    assert_eq!(host.main_settings().font_color, FontColor::Orange);
    assert_eq!(host.main_settings().adjustable_black_opacity(), 0.4);

    let primary = host.coordinator().primary().unwrap();
    let frame = panels.panel(primary).unwrap().frame;
    assert_eq!((frame.left(), frame.top()), (120.0, 640.0));
}

#[test]
fn test_hidden_primary_stays_hidden_after_restart() {
    let dir = TempDir::new().unwrap();
    {
        let (mut host, _) = open_host(dir.path());
        let primary = host.coordinator().primary().unwrap();
        host.handle_panel_event(primary, PanelEvent::CloseRequested, Instant::now());
    }

    let (mut host, _) = open_host(dir.path());
    assert!(!hoverpane::window::WindowDriver::is_primary_visible(host.coordinator()));
    host.execute(HostCommand::ShowPrimary);
    assert!(hoverpane::window::WindowDriver::is_primary_visible(host.coordinator()));
}

#[test]
fn test_corrupt_state_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STATE_FILE_NAME), "{ not json").unwrap();

    let (mut host, panels) = open_host(dir.path());
    assert!(host.clocks().records().is_empty());
    assert_eq!(panels.live_count(), 1);

    add_clock(&mut host, "Tokyo", "Asia/Tokyo");
    let text = fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap();
    assert!(text.contains("Asia/Tokyo"));
}

#[test]
fn test_undecodable_clock_list_is_treated_as_empty() {
    let dir = TempDir::new().unwrap();
    {
        let store = JsonFileStore::open(dir.path()).unwrap();
        store
            .save_raw(StoreKey::ClockRecords, serde_json::json!({"not": "a list"}))
            .unwrap();
    }

    let (host, _) = open_host(dir.path());
    assert!(host.clocks().records().is_empty());
}

#[test]
fn test_photo_import_and_removal_round_trip() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("sunset.png");
    RgbaImage::from_pixel(30, 60, Rgba([255, 128, 0, 255]))
        .save(&source)
        .unwrap();

    let stored = {
        let (mut host, _) = open_host(dir.path());
        host.execute(HostCommand::AddPhoto(source.clone()));
        let photo = host.photos().records()[0].clone();
        assert_eq!(photo.label, "sunset");
        assert_eq!(photo.geometry.size(), hoverpane::Size::new(140.0, 280.0));
        host.photos().resource_path(photo.id()).unwrap()
    };
    assert!(stored.is_file());

    let (mut host, panels) = open_host(dir.path());
    let photo = host.photos().records()[0].clone();
    assert!(host.photos().is_open(photo.id()));
    assert_eq!(panels.live_count(), 2);

    host.execute(HostCommand::Remove(WidgetKind::Photo, photo.id()));
    assert!(!stored.exists());
    assert!(host.photos().records().is_empty());
    assert_eq!(panels.live_count(), 1);
}
