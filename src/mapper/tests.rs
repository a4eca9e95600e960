//! Tests for the input mapper

use super::*;
use crate::host::HeadlessWindow;
use crate::input::monitor::{Position, Size};
use crate::input::{GamepadEvent, SupportedKey};
use crate::rig::RecordingRig;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{timeout, Instant};

fn monitor(x: i32, y: i32, width: u32, height: u32) -> Monitor {
    Monitor {
        name: None,
        position: Position { x, y },
        size: Size { width, height },
        scale_factor: 1.0,
    }
}

fn make_rig() -> Arc<RecordingRig> {
    Arc::new(
        RecordingRig::new(800.0, 600.0)
            .with_default_ranges()
            .with_range(params::STICK_LX, -1.0, 1.0),
    )
}

fn keyboard(synthetic_release: bool) -> KeyboardConfig {
    KeyboardConfig {
        synthetic_release,
        ..KeyboardConfig::default()
    }
}

fn make_mapper(
    rig: Arc<RecordingRig>,
    monitors: Vec<Monitor>,
    synthetic_release: bool,
) -> (InputMapper, mpsc::UnboundedReceiver<ReleaseFired>) {
    let window = Arc::new(HeadlessWindow::new(800.0, 600.0, 1.0, vec![]));
    let (mut mapper, rx) = InputMapper::new(rig, window, keyboard(synthetic_release));
    mapper.monitors = monitors;
    (mapper, rx)
}

fn stores_with_keys(keys: &[(&str, Side)]) -> Stores {
    let mut stores = Stores::default();
    for (key, side) in keys {
        stores.model.supported_keys.insert(
            *key,
            SupportedKey {
                side: *side,
                image: PathBuf::from(side.resource_dir()).join(format!("{}.png", key)),
            },
        );
    }
    stores
}

// ===== Keyboard path =====

#[tokio::test(start_paused = true)]
async fn test_function_key_press_then_synthetic_release() {
    let rig = make_rig();
    let (mut mapper, mut fired_rx) = make_mapper(rig.clone(), vec![], true);
    let mut stores = stores_with_keys(&[("Fn", Side::Left)]);
    let start = Instant::now();

    mapper
        .handle_device_event(DeviceEvent::KeyboardPress("F5".into()), &mut stores)
        .await;

    assert!(stores.model.pressed_keys.contains_key("Fn"));
    assert_eq!(rig.last_value(params::LEFT_HAND_DOWN), Some(1.0));
    assert_eq!(mapper.pending_releases(), 1);

    let fired = timeout(Duration::from_secs(2), fired_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(500));

    mapper.handle_release_fired(fired, &mut stores.model);

    assert!(stores.model.pressed_keys.is_empty());
    assert_eq!(rig.writes_for(params::LEFT_HAND_DOWN), vec![1.0, 0.0]);
    assert_eq!(mapper.pending_releases(), 0);
}

#[tokio::test]
async fn test_press_and_release_without_synthetic_release() {
    let rig = make_rig();
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![], false);
    let mut stores = stores_with_keys(&[("KeyA", Side::Left), ("KeyL", Side::Right)]);

    mapper
        .handle_device_event(DeviceEvent::KeyboardPress("KeyL".into()), &mut stores)
        .await;
    assert_eq!(mapper.pending_releases(), 0);
    assert_eq!(rig.last_value(params::RIGHT_HAND_DOWN), Some(1.0));
    assert_eq!(rig.last_value(params::LEFT_HAND_DOWN), None);

    mapper
        .handle_device_event(DeviceEvent::KeyboardRelease("KeyL".into()), &mut stores)
        .await;
    assert_eq!(rig.last_value(params::RIGHT_HAND_DOWN), Some(0.0));
    assert!(stores.model.pressed_keys.is_empty());
}

#[tokio::test]
async fn test_hand_stays_down_while_any_key_on_side_is_held() {
    let rig = make_rig();
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![], false);
    let mut stores = stores_with_keys(&[("KeyA", Side::Left), ("KeyS", Side::Left)]);

    for key in ["KeyA", "KeyS"] {
        mapper
            .handle_device_event(DeviceEvent::KeyboardPress(key.into()), &mut stores)
            .await;
    }
    mapper
        .handle_device_event(DeviceEvent::KeyboardRelease("KeyA".into()), &mut stores)
        .await;
    assert_eq!(rig.last_value(params::LEFT_HAND_DOWN), Some(1.0));

    mapper
        .handle_device_event(DeviceEvent::KeyboardRelease("KeyS".into()), &mut stores)
        .await;
    assert_eq!(rig.last_value(params::LEFT_HAND_DOWN), Some(0.0));
}

#[tokio::test]
async fn test_modifier_collapses_to_family() {
    let rig = make_rig();
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![], false);
    let mut stores = stores_with_keys(&[("Shift", Side::Left)]);

    mapper
        .handle_device_event(DeviceEvent::KeyboardPress("ShiftRight".into()), &mut stores)
        .await;
    assert!(stores.model.pressed_keys.contains_key("Shift"));

    mapper
        .handle_device_event(DeviceEvent::KeyboardRelease("ShiftRight".into()), &mut stores)
        .await;
    assert!(stores.model.pressed_keys.is_empty());
}

#[tokio::test]
async fn test_unsupported_and_empty_keys_are_ignored() {
    let rig = make_rig();
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![], true);
    let mut stores = stores_with_keys(&[("KeyA", Side::Left)]);

    mapper
        .handle_device_event(DeviceEvent::KeyboardPress("KeyZ".into()), &mut stores)
        .await;
    mapper
        .handle_device_event(DeviceEvent::KeyboardPress(String::new()), &mut stores)
        .await;

    assert!(stores.model.pressed_keys.is_empty());
    assert_eq!(rig.write_count(), 0);
    // The unsupported key still got a timer; its release is a no-op
    assert_eq!(mapper.pending_releases(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_caps_lock_always_auto_releases() {
    let rig = make_rig();
    let (mut mapper, mut fired_rx) = make_mapper(rig.clone(), vec![], false);
    let mut stores = stores_with_keys(&[("CapsLock", Side::Left)]);
    let start = Instant::now();

    // The hook may report the toggle as a release
    mapper
        .handle_device_event(DeviceEvent::KeyboardRelease("CapsLock".into()), &mut stores)
        .await;
    assert!(stores.model.pressed_keys.contains_key("CapsLock"));

    let fired = timeout(Duration::from_secs(1), fired_rx.recv())
        .await
        .unwrap()
        .unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(500));

    mapper.handle_release_fired(fired, &mut stores.model);
    assert!(stores.model.pressed_keys.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_repeated_press_rearms_release() {
    let rig = make_rig();
    let (mut mapper, mut fired_rx) = make_mapper(rig.clone(), vec![], true);
    let mut stores = stores_with_keys(&[("KeyA", Side::Left)]);
    let start = Instant::now();

    mapper
        .handle_device_event(DeviceEvent::KeyboardPress("KeyA".into()), &mut stores)
        .await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    mapper
        .handle_device_event(DeviceEvent::KeyboardPress("KeyA".into()), &mut stores)
        .await;

    let fired = timeout(Duration::from_secs(2), fired_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(800));

    mapper.handle_release_fired(fired, &mut stores.model);
    assert!(stores.model.pressed_keys.is_empty());
    assert_eq!(rig.writes_for(params::LEFT_HAND_DOWN), vec![1.0, 1.0, 0.0]);
}

#[tokio::test]
async fn test_real_release_cancels_synthetic_release() {
    let rig = make_rig();
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![], true);
    let mut stores = stores_with_keys(&[("KeyA", Side::Left)]);

    mapper
        .handle_device_event(DeviceEvent::KeyboardPress("KeyA".into()), &mut stores)
        .await;
    assert_eq!(mapper.pending_releases(), 1);

    mapper
        .handle_device_event(DeviceEvent::KeyboardRelease("KeyA".into()), &mut stores)
        .await;
    assert_eq!(mapper.pending_releases(), 0);
}

// ===== Mouse path =====

#[tokio::test]
async fn test_mouse_buttons() {
    let rig = make_rig();
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![], false);
    let mut stores = Stores::default();

    mapper
        .handle_device_event(DeviceEvent::MousePress("Left".into()), &mut stores)
        .await;
    mapper
        .handle_device_event(DeviceEvent::MouseRelease("Right".into()), &mut stores)
        .await;
    mapper
        .handle_device_event(DeviceEvent::MousePress("Middle".into()), &mut stores)
        .await;

    assert_eq!(rig.last_value(params::MOUSE_LEFT_DOWN), Some(1.0));
    assert_eq!(rig.last_value(params::MOUSE_RIGHT_DOWN), Some(0.0));
    assert_eq!(rig.write_count(), 2);
}

#[tokio::test]
async fn test_mouse_move_maps_inverted_ratios() {
    let rig = make_rig();
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![monitor(0, 0, 1920, 1080)], false);
    let mut stores = Stores::default();

    mapper
        .handle_device_event(
            DeviceEvent::MouseMove(CursorPoint::new(480.2, 269.7)),
            &mut stores,
        )
        .await;

    assert_eq!(rig.last_value(params::MOUSE_X), Some(0.5));
    assert_eq!(rig.last_value(params::MOUSE_Y), Some(0.5));
    assert_eq!(rig.last_value(params::ANGLE_X), Some(15.0));
    assert_eq!(rig.last_value(params::ANGLE_Y), Some(15.0));
}

#[tokio::test]
async fn test_mouse_move_dedupes_rounded_points() {
    let rig = make_rig();
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![monitor(0, 0, 1920, 1080)], false);
    let mut stores = Stores::default();

    // Rounds to the initial point
    mapper
        .handle_device_event(DeviceEvent::MouseMove(CursorPoint::new(0.3, -0.2)), &mut stores)
        .await;
    assert_eq!(rig.write_count(), 0);

    mapper
        .handle_device_event(DeviceEvent::MouseMove(CursorPoint::new(100.4, 50.0)), &mut stores)
        .await;
    assert_eq!(rig.write_count(), 4);

    mapper
        .handle_device_event(DeviceEvent::MouseMove(CursorPoint::new(99.6, 49.9)), &mut stores)
        .await;
    assert_eq!(rig.write_count(), 4);

    mapper
        .handle_device_event(DeviceEvent::MouseMove(CursorPoint::new(101.0, 50.0)), &mut stores)
        .await;
    assert_eq!(rig.write_count(), 8);
}

#[tokio::test]
async fn test_long_mouse_session_keeps_bounded_history() {
    let rig = Arc::new(RecordingRig::new(800.0, 600.0).with_default_ranges().with_history(64));
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![monitor(0, 0, 1920, 1080)], false);
    let mut stores = Stores::default();

    for i in 0..10_000u32 {
        let point = CursorPoint::new(f64::from(i % 1900 + 1), f64::from(i / 1900 + 1));
        mapper
            .handle_device_event(DeviceEvent::MouseMove(point), &mut stores)
            .await;
    }

    assert_eq!(rig.write_count(), 64);
    assert!(rig.last_value(params::ANGLE_Y).is_some());
}

#[tokio::test]
async fn test_mouse_mirror_negates_horizontal_only() {
    let rig = make_rig();
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![monitor(0, 0, 1920, 1080)], false);
    let mut stores = Stores::default();
    stores.cat.mouse_mirror = true;

    mapper
        .handle_device_event(DeviceEvent::MouseMove(CursorPoint::new(480.0, 270.0)), &mut stores)
        .await;

    assert_eq!(rig.last_value(params::MOUSE_X), Some(-0.5));
    assert_eq!(rig.last_value(params::ANGLE_X), Some(-15.0));
    assert_eq!(rig.last_value(params::MOUSE_Y), Some(0.5));
    assert_eq!(rig.last_value(params::ANGLE_Y), Some(15.0));
}

#[tokio::test]
async fn test_mouse_move_resolves_monitor_among_many() {
    let rig = make_rig();
    let monitors = vec![monitor(0, 0, 1920, 1080), monitor(1920, 0, 2560, 1440)];
    let (mut mapper, _rx) = make_mapper(rig.clone(), monitors, false);
    let mut stores = Stores::default();

    mapper
        .handle_device_event(DeviceEvent::MouseMove(CursorPoint::new(2560.0, 720.0)), &mut stores)
        .await;
    assert_eq!(rig.last_value(params::MOUSE_X), Some(0.5));
    assert_eq!(rig.last_value(params::MOUSE_Y), Some(0.0));

    // Outside every monitor
    rig.clear_writes();
    mapper
        .handle_device_event(DeviceEvent::MouseMove(CursorPoint::new(-50.0, 5000.0)), &mut stores)
        .await;
    assert_eq!(rig.write_count(), 0);
}

#[tokio::test]
async fn test_mouse_move_skips_undefined_ranges() {
    let rig = Arc::new(RecordingRig::new(800.0, 600.0).with_range(params::ANGLE_X, -30.0, 30.0));
    let (mut mapper, _rx) = make_mapper(rig.clone(), vec![monitor(0, 0, 1000, 1000)], false);
    let mut stores = Stores::default();

    mapper
        .handle_device_event(DeviceEvent::MouseMove(CursorPoint::new(1000.0, 0.0)), &mut stores)
        .await;

    assert_eq!(rig.write_count(), 1);
    assert_eq!(rig.last_value(params::ANGLE_X), Some(-30.0));
}

#[tokio::test]
async fn test_refresh_monitors_from_window() {
    let rig = make_rig();
    let window = Arc::new(HeadlessWindow::new(
        800.0,
        600.0,
        1.0,
        vec![monitor(0, 0, 1920, 1080), monitor(1920, 0, 1920, 1080)],
    ));
    let (mut mapper, _rx) = InputMapper::new(rig, window, KeyboardConfig::default());

    mapper.refresh_monitors().await;
    assert_eq!(mapper.monitors.len(), 2);
}

// ===== Gamepad path =====

#[test]
fn test_stick_visibility_follows_axes_and_thumb() {
    let rig = make_rig();
    let window = Arc::new(HeadlessWindow::new(800.0, 600.0, 1.0, vec![]));
    let (mut mapper, _rx) = InputMapper::new(rig.clone(), window, KeyboardConfig::default());
    let mut model = ModelStore::default();

    mapper.handle_gamepad_event(&GamepadEvent::axis("LeftStickX", 0.5), &mut model);
    assert_eq!(rig.last_value(params::STICK_LX), Some(0.5));
    assert_eq!(rig.last_value(params::STICK_SHOW_LEFT_HAND), Some(1.0));
    assert!(mapper.sticks().left.moved);

    // Back to center hides the hand right away
    mapper.handle_gamepad_event(&GamepadEvent::axis("LeftStickX", 0.0), &mut model);
    assert_eq!(rig.last_value(params::STICK_SHOW_LEFT_HAND), Some(0.0));
    assert!(!mapper.sticks().get(Side::Left).moved);

    mapper.handle_gamepad_event(&GamepadEvent::button("LeftThumb", 1.0), &mut model);
    assert_eq!(rig.last_value(params::STICK_LEFT_DOWN), Some(1.0));
    assert_eq!(rig.last_value(params::STICK_SHOW_LEFT_HAND), Some(1.0));

    mapper.handle_gamepad_event(&GamepadEvent::button("LeftThumb", 0.0), &mut model);
    assert_eq!(rig.last_value(params::STICK_LEFT_DOWN), Some(0.0));
    assert_eq!(rig.last_value(params::STICK_SHOW_LEFT_HAND), Some(0.0));

    assert_eq!(rig.last_value(params::STICK_SHOW_RIGHT_HAND), None);
}

#[test]
fn test_right_stick_axes_pass_through() {
    let rig = make_rig();
    let window = Arc::new(HeadlessWindow::new(800.0, 600.0, 1.0, vec![]));
    let (mut mapper, _rx) = InputMapper::new(rig.clone(), window, KeyboardConfig::default());
    let mut model = ModelStore::default();

    mapper.handle_gamepad_event(&GamepadEvent::axis("RightStickY", -0.75), &mut model);
    assert_eq!(rig.last_value(params::STICK_RY), Some(-0.75));
    assert_eq!(rig.last_value(params::STICK_SHOW_RIGHT_HAND), Some(1.0));
    assert_eq!(mapper.sticks().right.y, -0.75);
}

#[test]
fn test_gamepad_buttons_act_as_keys() {
    let rig = make_rig();
    let window = Arc::new(HeadlessWindow::new(800.0, 600.0, 1.0, vec![]));
    let (mut mapper, _rx) = InputMapper::new(rig.clone(), window, keyboard(true));
    let mut stores = stores_with_keys(&[("South", Side::Right)]);

    mapper.handle_gamepad_event(&GamepadEvent::button("South", 1.0), &mut stores.model);
    assert!(stores.model.pressed_keys.contains_key("South"));
    assert_eq!(rig.last_value(params::RIGHT_HAND_DOWN), Some(1.0));
    // No synthetic release for gamepad buttons
    assert_eq!(mapper.pending_releases(), 0);

    mapper.handle_gamepad_event(&GamepadEvent::button("South", 0.0), &mut stores.model);
    assert_eq!(rig.last_value(params::RIGHT_HAND_DOWN), Some(0.0));

    // Unknown axes are ignored
    rig.clear_writes();
    mapper.handle_gamepad_event(&GamepadEvent::axis("LeftZ", 0.4), &mut stores.model);
    assert_eq!(rig.write_count(), 0);
}

#[test]
fn test_update_keyboard_config() {
    let rig = make_rig();
    let window = Arc::new(HeadlessWindow::new(800.0, 600.0, 1.0, vec![]));
    let (mut mapper, _rx) = InputMapper::new(rig, window, keyboard(false));

    mapper.update_keyboard_config(KeyboardConfig {
        synthetic_release: true,
        release_delay_ms: 250,
        caps_lock_release_ms: 100,
    });
    assert!(mapper.keyboard_config().synthetic_release);
    assert_eq!(mapper.keyboard_config().release_delay(), Duration::from_millis(250));
}
