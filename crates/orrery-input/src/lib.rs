//! Keyboard and mouse state, and the orrery's key bindings on top of them.

pub mod controls;
pub mod keyboard;
pub mod mouse;

pub use controls::{CaptureToggle, ControlAction, FrameControls, MoveDirection};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
