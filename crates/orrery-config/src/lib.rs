//! Configuration system for the orrery.
//!
//! Two persistence layers live here. [`Config`] holds engine settings as RON
//! with CLI overrides via clap and hot-reload detection. [`ProgramSettings`] is
//! the small flat key-value dump of user-adjusted state (clear colour, overlay
//! flag, camera pose) written on shutdown and read back on startup.

mod cli;
mod config;
mod error;
mod settings;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, BodyConfig, CONFIG_FILE_NAME, Config, DebugConfig, RenderConfig, SceneConfig,
    SunConfig, WindowConfig, default_config_dir,
};
pub use error::{ConfigError, SettingsError};
pub use settings::ProgramSettings;
