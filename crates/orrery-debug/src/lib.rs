//! Debug overlay and local debug API.
//!
//! [`OverlayState`] is owned by the frame loop: it holds the tweakable scene
//! properties, frame metrics and camera info, and renders the window-title
//! HUD. [`DebugState`] is the `Mutex`-guarded snapshot shared with the HTTP
//! server, which only runs in debug builds.

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
pub mod server;

#[cfg(debug_assertions)]
pub use server::{DebugServer, DebugServerError};

#[cfg(test)]
mod tests;

/// Default port for the debug API.
pub const DEFAULT_DEBUG_PORT: u16 = 9999;

pub const SUN_SCALE_MODIFIER_RANGE: (f32, f32) = (0.0, 1.0);
pub const ORBIT_SCALE_RANGE: (f32, f32) = (1.0, 3.0);

/// Per-press steps of the property key bindings.
pub const ORBIT_SCALE_STEP: f32 = 0.1;
pub const SUN_SCALE_MODIFIER_STEP: f32 = 0.05;
pub const CLEAR_COLOR_STEP: f32 = 0.05;

/// One keyboard step on a property. Signed deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyNudge {
    OrbitScale(f32),
    SunScaleModifier(f32),
    /// Added to every clear colour component.
    Brightness(f32),
}

/// The "Properties" panel: values the user may change while running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayProperties {
    /// Added to the sun's draw scale.
    pub sun_scale_modifier: f32,
    /// Multiplies every orbit.
    pub orbit_scale: f32,
    /// Background clear colour, components in 0..=1.
    pub clear_color: [f32; 3],
}

impl Default for OverlayProperties {
    fn default() -> Self {
        Self {
            sun_scale_modifier: 0.0,
            orbit_scale: 1.0,
            clear_color: [0.0; 3],
        }
    }
}

impl OverlayProperties {
    /// Clamp every field to its slider range. NaN falls to the range minimum.
    pub fn clamped(self) -> Self {
        let clamp = |v: f32, (lo, hi): (f32, f32)| if v.is_nan() { lo } else { v.clamp(lo, hi) };
        Self {
            sun_scale_modifier: clamp(self.sun_scale_modifier, SUN_SCALE_MODIFIER_RANGE),
            orbit_scale: clamp(self.orbit_scale, ORBIT_SCALE_RANGE),
            clear_color: self.clear_color.map(|c| clamp(c, (0.0, 1.0))),
        }
    }

    /// Apply a keyboard step, then clamp.
    pub fn nudged(self, nudge: PropertyNudge) -> Self {
        let mut next = self;
        match nudge {
            PropertyNudge::OrbitScale(delta) => next.orbit_scale += delta,
            PropertyNudge::SunScaleModifier(delta) => next.sun_scale_modifier += delta,
            PropertyNudge::Brightness(delta) => {
                next.clear_color = next.clear_color.map(|c| c + delta);
            }
        }
        next.clamped()
    }

    /// Apply a partial update, then clamp.
    pub fn patched(self, patch: &PropertiesPatch) -> Self {
        Self {
            sun_scale_modifier: patch.sun_scale_modifier.unwrap_or(self.sun_scale_modifier),
            orbit_scale: patch.orbit_scale.unwrap_or(self.orbit_scale),
            clear_color: patch.clear_color.unwrap_or(self.clear_color),
        }
        .clamped()
    }
}

/// Partial JSON body accepted by `POST /properties`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertiesPatch {
    pub sun_scale_modifier: Option<f32>,
    pub orbit_scale: Option<f32>,
    pub clear_color: Option<[f32; 3]>,
}

/// The "Camera info" panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub front: [f32; 3],
    /// Mouse look is active and the cursor is locked.
    pub mouse_captured: bool,
}

impl Default for CameraInfo {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            yaw: -90.0,
            pitch: 0.0,
            front: [0.0, 0.0, -1.0],
            mouse_captured: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub frame_count: u64,
    pub frame_time_ms: f64,
    pub fps: f64,
    pub uptime_seconds: f64,
    pub window_width: u32,
    pub window_height: u32,
}

/// Snapshot shared between the frame loop and the debug server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugState {
    #[serde(flatten)]
    pub metrics: FrameMetrics,
    pub camera: CameraInfo,
    pub properties: OverlayProperties,
    pub overlay_enabled: bool,
    pub quit_requested: bool,
    /// Accepted by the server, applied by the frame loop next frame.
    #[serde(skip)]
    pub pending_properties: Option<OverlayProperties>,
    #[serde(skip)]
    pub toggle_overlay_requested: bool,
}

/// Requests picked up from the shared state during [`OverlayState::sync`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugRequests {
    pub quit: bool,
    pub toggle_overlay: bool,
}

/// Frame-loop side of the overlay.
#[derive(Debug, Clone)]
pub struct OverlayState {
    pub enabled: bool,
    pub properties: OverlayProperties,
    pub metrics: FrameMetrics,
    pub camera: CameraInfo,
    fps_window: Duration,
    fps_frames: u32,
}

impl OverlayState {
    pub fn new(enabled: bool, properties: OverlayProperties) -> Self {
        Self {
            enabled,
            properties: properties.clamped(),
            metrics: FrameMetrics::default(),
            camera: CameraInfo::default(),
            fps_window: Duration::ZERO,
            fps_frames: 0,
        }
    }

    /// Flip visibility and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        tracing::debug!("Overlay {}", if self.enabled { "enabled" } else { "disabled" });
        self.enabled
    }

    /// Record one frame. FPS is recomputed once per second of frame time.
    pub fn record_frame(&mut self, delta: Duration, uptime: Duration) {
        self.metrics.frame_count += 1;
        self.metrics.frame_time_ms = delta.as_secs_f64() * 1000.0;
        self.metrics.uptime_seconds = uptime.as_secs_f64();

        self.fps_frames += 1;
        self.fps_window += delta;
        if self.fps_window >= Duration::from_secs(1) {
            self.metrics.fps = self.fps_frames as f64 / self.fps_window.as_secs_f64();
            self.fps_frames = 0;
            self.fps_window = Duration::ZERO;
        }
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.metrics.window_width = width;
        self.metrics.window_height = height;
    }

    /// Window title: `base` alone while hidden, plus FPS and camera info while shown.
    pub fn title(&self, base: &str) -> String {
        if !self.enabled {
            return base.to_string();
        }
        let [x, y, z] = self.camera.position;
        format!(
            "{base} | {:.0} FPS | pos ({x:.1}, {y:.1}, {z:.1}) | yaw {:.1} pitch {:.1} | orbit x{:.2} sun +{:.2} | {}",
            self.metrics.fps,
            self.camera.yaw,
            self.camera.pitch,
            self.properties.orbit_scale,
            self.properties.sun_scale_modifier,
            if self.camera.mouse_captured {
                "mouse look"
            } else {
                "cursor free"
            }
        )
    }

    /// Exchange state with the debug server: take pending requests, then
    /// publish this frame's snapshot. A poisoned lock is recovered.
    pub fn sync(&mut self, shared: &Mutex<DebugState>) -> DebugRequests {
        let mut state = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(properties) = state.pending_properties.take() {
            tracing::info!("Debug API updated properties: {:?}", properties);
            self.properties = properties.clamped();
        }
        let requests = DebugRequests {
            quit: state.quit_requested,
            toggle_overlay: std::mem::take(&mut state.toggle_overlay_requested),
        };

        state.metrics = self.metrics;
        state.camera = self.camera;
        state.properties = self.properties;
        state.overlay_enabled = self.enabled;
        requests
    }
}

/// `ORRERY_DEBUG_PORT` if set and valid, else `configured`.
pub fn debug_port(configured: u16) -> u16 {
    std::env::var("ORRERY_DEBUG_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(configured)
}
