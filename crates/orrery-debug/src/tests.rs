//! Unit tests for the overlay state and the debug API.

use crate::{
    CLEAR_COLOR_STEP, CameraInfo, DebugRequests, DebugServer, DebugState, FrameMetrics,
    ORBIT_SCALE_STEP, OverlayProperties, OverlayState, PropertiesPatch, PropertyNudge,
};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn start_server(state: Arc<Mutex<DebugState>>) -> (DebugServer, String) {
    let mut server = DebugServer::new(0); // port 0 = OS assigns
    server.start(state).unwrap();
    // Give server a moment to start
    thread::sleep(Duration::from_millis(100));
    let base = format!("http://localhost:{}", server.actual_port());
    (server, base)
}

fn post_json(url: &str, body: &str) -> Result<ureq::Response, ureq::Error> {
    ureq::post(url)
        .set("Content-Type", "application/json")
        .send_string(body)
}

fn body_json(resp: ureq::Response) -> serde_json::Value {
    serde_json::from_str(&resp.into_string().unwrap()).unwrap()
}

#[test]
fn test_properties_clamp_to_slider_ranges() {
    let props = OverlayProperties {
        sun_scale_modifier: 4.0,
        orbit_scale: 0.2,
        clear_color: [-1.0, 0.5, f32::NAN],
    }
    .clamped();
    assert_eq!(props.sun_scale_modifier, 1.0);
    assert_eq!(props.orbit_scale, 1.0);
    assert_eq!(props.clear_color, [0.0, 0.5, 0.0]);
}

#[test]
fn test_patch_only_touches_given_fields() {
    let patch = PropertiesPatch {
        orbit_scale: Some(2.5),
        ..Default::default()
    };
    let props = OverlayProperties::default().patched(&patch);
    assert_eq!(props.orbit_scale, 2.5);
    assert_eq!(props.sun_scale_modifier, 0.0);
    assert_eq!(props.clear_color, [0.0; 3]);
}

#[test]
fn test_nudges_step_and_clamp() {
    let props = OverlayProperties::default().nudged(PropertyNudge::OrbitScale(ORBIT_SCALE_STEP));
    assert!((props.orbit_scale - 1.1).abs() < 1e-6);
    assert_eq!(props.sun_scale_modifier, 0.0);

    let floor = OverlayProperties::default().nudged(PropertyNudge::OrbitScale(-ORBIT_SCALE_STEP));
    assert_eq!(floor.orbit_scale, 1.0);

    let ceiling = (0..30).fold(OverlayProperties::default(), |props, _| {
        props.nudged(PropertyNudge::SunScaleModifier(0.05))
    });
    assert_eq!(ceiling.sun_scale_modifier, 1.0);

    let brighter = OverlayProperties {
        clear_color: [0.0, 0.5, 1.0],
        ..OverlayProperties::default()
    }
    .nudged(PropertyNudge::Brightness(CLEAR_COLOR_STEP));
    assert!((brighter.clear_color[0] - 0.05).abs() < 1e-6);
    assert!((brighter.clear_color[1] - 0.55).abs() < 1e-6);
    assert_eq!(brighter.clear_color[2], 1.0);
}

#[test]
fn test_title_shows_hud_only_when_enabled() {
    let mut overlay = OverlayState::new(false, OverlayProperties::default());
    assert_eq!(overlay.title("Orrery"), "Orrery");

    overlay.toggle();
    overlay.camera = CameraInfo {
        position: [1.0, 2.0, 3.0],
        mouse_captured: true,
        ..CameraInfo::default()
    };
    let title = overlay.title("Orrery");
    assert!(title.starts_with("Orrery | "));
    assert!(title.contains("pos (1.0, 2.0, 3.0)"));
    assert!(title.contains("mouse look"));
    assert!(title.contains("orbit x1.00 sun +0.00"));
}

#[test]
fn test_fps_updates_once_per_second() {
    let mut overlay = OverlayState::new(true, OverlayProperties::default());
    let frame = Duration::from_millis(20);
    for i in 1..50 {
        overlay.record_frame(frame, frame * i);
    }
    assert_eq!(overlay.metrics.fps, 0.0);

    overlay.record_frame(frame, frame * 50);
    assert!((overlay.metrics.fps - 50.0).abs() < 1e-6);
    assert_eq!(overlay.metrics.frame_count, 50);
    assert!((overlay.metrics.frame_time_ms - 20.0).abs() < 1e-9);
    assert!((overlay.metrics.uptime_seconds - 1.0).abs() < 1e-9);
}

#[test]
fn test_sync_applies_pending_and_publishes_snapshot() {
    let shared = Mutex::new(DebugState {
        pending_properties: Some(OverlayProperties {
            orbit_scale: 2.0,
            ..OverlayProperties::default()
        }),
        toggle_overlay_requested: true,
        ..DebugState::default()
    });
    let mut overlay = OverlayState::new(true, OverlayProperties::default());
    overlay.metrics.frame_count = 7;

    let requests = overlay.sync(&shared);
    assert_eq!(
        requests,
        DebugRequests {
            quit: false,
            toggle_overlay: true
        }
    );
    assert_eq!(overlay.properties.orbit_scale, 2.0);

    let state = shared.lock().unwrap();
    assert!(state.pending_properties.is_none());
    assert!(!state.toggle_overlay_requested);
    assert_eq!(state.metrics.frame_count, 7);
    assert_eq!(state.properties.orbit_scale, 2.0);
    assert!(state.overlay_enabled);
}

#[test]
fn test_health_endpoint() {
    let state = Arc::new(Mutex::new(DebugState::default()));
    let (mut server, base) = start_server(state);

    let resp = ureq::get(&format!("{base}/health")).call().unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp)["status"], "ok");
    server.stop();
}

#[test]
fn test_metrics_endpoint_includes_camera() {
    let state = Arc::new(Mutex::new(DebugState {
        metrics: FrameMetrics {
            frame_count: 100,
            fps: 60.2,
            window_width: 1200,
            window_height: 800,
            ..FrameMetrics::default()
        },
        ..DebugState::default()
    }));
    let (mut server, base) = start_server(state);

    let body = body_json(ureq::get(&format!("{base}/metrics")).call().unwrap());
    assert_eq!(body["frame_count"], 100);
    assert!((body["fps"].as_f64().unwrap() - 60.2).abs() < 0.01);
    assert_eq!(body["window_width"], 1200);
    assert_eq!(body["camera"]["yaw"], -90.0);
    server.stop();
}

#[test]
fn test_post_properties_is_clamped_and_pending() {
    let state = Arc::new(Mutex::new(DebugState::default()));
    let (mut server, base) = start_server(state.clone());

    let resp = post_json(
        &format!("{base}/properties"),
        r#"{"orbit_scale": 9.0, "sun_scale_modifier": 0.5}"#,
    )
    .unwrap();
    let body = body_json(resp);
    assert_eq!(body["orbit_scale"], 3.0);
    assert_eq!(body["sun_scale_modifier"], 0.5);

    {
        let state = state.lock().unwrap();
        let pending = state.pending_properties.unwrap();
        assert_eq!(pending.orbit_scale, 3.0);
        // Not applied until the frame loop syncs.
        assert_eq!(state.properties.orbit_scale, 1.0);
    }

    let body = body_json(ureq::get(&format!("{base}/properties")).call().unwrap());
    assert_eq!(body["orbit_scale"], 1.0);
    server.stop();
}

#[test]
fn test_post_properties_rejects_bad_json() {
    let state = Arc::new(Mutex::new(DebugState::default()));
    let (mut server, base) = start_server(state.clone());

    let resp = post_json(&format!("{base}/properties"), r#"{"gravity": 1}"#);
    match resp {
        Err(ureq::Error::Status(code, _)) => assert_eq!(code, 400),
        other => panic!("expected 400, got {other:?}"),
    }
    assert!(state.lock().unwrap().pending_properties.is_none());
    server.stop();
}

#[test]
fn test_command_quit_and_toggle() {
    let state = Arc::new(Mutex::new(DebugState::default()));
    let (mut server, base) = start_server(state.clone());

    let body = body_json(post_json(&format!("{base}/command"), r#"{"command": "quit"}"#).unwrap());
    assert_eq!(body["executed"], true);
    assert_eq!(body["command"], "quit");

    let body = body_json(
        post_json(&format!("{base}/command"), r#"{"command": "toggle_overlay"}"#).unwrap(),
    );
    assert_eq!(body["executed"], true);

    let body = body_json(post_json(&format!("{base}/command"), r#"{"command": "warp"}"#).unwrap());
    assert_eq!(body["executed"], false);

    let debug_state = state.lock().unwrap();
    assert!(debug_state.quit_requested);
    assert!(debug_state.toggle_overlay_requested);
    drop(debug_state);
    server.stop();
}

#[test]
fn test_unknown_endpoint_returns_404() {
    let state = Arc::new(Mutex::new(DebugState::default()));
    let (mut server, base) = start_server(state);

    let resp = ureq::get(&format!("{base}/nonexistent")).call();
    if let Err(ureq::Error::Status(code, _)) = resp {
        assert_eq!(code, 404);
    } else {
        panic!("Expected 404 status error");
    }
    server.stop();
}
