//! Command-line argument parsing for the orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Textured solar system with elliptical orbits")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Seed for orbit phase and speed jitter.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Latitude and longitude segment count of the body sphere.
    #[arg(long)]
    pub segments: Option<u32>,

    /// Divide the barycenter by total mass.
    #[arg(long)]
    pub normalize_barycenter: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(seed) = args.seed {
            self.scene.seed = Some(seed);
        }
        if let Some(segments) = args.segments {
            self.render.latitude_segments = segments;
            self.render.longitude_segments = segments;
        }
        if args.normalize_barycenter {
            self.scene.normalize_barycenter = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            seed: Some(7),
            segments: Some(32),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.scene.seed, Some(7));
        assert_eq!(config.render.latitude_segments, 32);
        assert_eq!(config.render.longitude_segments, 32);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 800);
        assert!(!config.scene.normalize_barycenter);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "orrery",
            "--seed",
            "99",
            "--normalize-barycenter",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.seed, Some(99));
        assert!(args.normalize_barycenter);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.width.is_none());
    }
}
