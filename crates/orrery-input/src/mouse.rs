//! Mouse-look and scroll accumulation.

use glam::Vec2;
use winit::event::MouseScrollDelta;
use winit::window::{CursorGrabMode, Window};

/// Pixels of a touchpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

/// Per-frame mouse input.
///
/// Look deltas are only collected while the cursor is captured.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    cursor: Option<Vec2>,
    look_delta: Vec2,
    scroll_lines: f32,
    captured: bool,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `WindowEvent::CursorMoved`.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        self.cursor = Some(position);
    }

    /// `DeviceEvent::MouseMotion`.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.look_delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// `WindowEvent::MouseWheel`.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll_lines += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    /// Look movement this frame, in pixels; `+y` is downward.
    #[must_use]
    pub fn look_delta(&self) -> Vec2 {
        self.look_delta
    }

    /// Wheel lines this frame; positive scrolls up.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll_lines
    }

    #[must_use]
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Record the capture state without touching a window.
    pub fn set_captured_flag(&mut self, captured: bool) {
        if captured != self.captured {
            self.look_delta = Vec2::ZERO;
        }
        self.captured = captured;
    }

    /// Grab and hide the cursor, or release it.
    pub fn set_captured(&mut self, window: &Window, captured: bool) {
        self.set_captured_flag(captured);
        if captured {
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err()
                && let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined)
            {
                tracing::warn!("Cursor grab unavailable: {e}");
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                tracing::warn!("Failed to release cursor: {e}");
            }
            window.set_cursor_visible(true);
        }
    }

    pub fn end_frame(&mut self) {
        self.look_delta = Vec2::ZERO;
        self.scroll_lines = 0.0;
    }
}
