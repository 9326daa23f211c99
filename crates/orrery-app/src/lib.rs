//! The orrery application: window, frame loop, and scene rendering.

pub mod error;
pub mod frame_clock;
pub mod platform;
pub mod renderer;
pub mod scene_setup;
pub mod window;

pub use error::AppError;
pub use frame_clock::{FrameClock, FrameTime, MAX_FRAME_DELTA};
pub use platform::{PlatformDirs, PlatformError};
pub use renderer::SceneRenderer;
pub use window::{App, run, window_attributes_from_config};
