//! Opens the orrery window.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags,
//! e.g. `orrery --seed 7 --normalize-barycenter`.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::PlatformDirs;
use orrery_config::{CliArgs, Config, default_config_dir};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = PlatformDirs::resolve_with_override(args.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("{e}, falling back to {}", default_config_dir().display());
        PlatformDirs::with_config_dir(default_config_dir())
    });
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create {}: {e}", dirs.config_dir.display());
    }

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    match orrery_app::run(config, dirs.config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
