//! Flat settings file persisted between runs.
//!
//! Ten newline-separated values: clear colour r, g, b; overlay flag as `0`/`1`;
//! camera position x, y, z; camera front x, y, z.

use std::path::Path;

use crate::error::SettingsError;

const VALUE_COUNT: usize = 10;

/// State restored on startup and written back on clean shutdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgramSettings {
    pub clear_color: [f32; 3],
    pub overlay_enabled: bool,
    pub camera_position: [f32; 3],
    pub camera_front: [f32; 3],
}

impl Default for ProgramSettings {
    fn default() -> Self {
        Self {
            clear_color: [0.0; 3],
            overlay_enabled: true,
            camera_position: [0.0, 0.0, 3.0],
            camera_front: [0.0, 0.0, -1.0],
        }
    }
}

impl ProgramSettings {
    /// Parse the flat format. Whitespace of any kind separates values; trailing
    /// content past the tenth value is ignored.
    pub fn parse(contents: &str) -> Result<Self, SettingsError> {
        let tokens: Vec<&str> = contents.split_whitespace().take(VALUE_COUNT).collect();
        if tokens.len() < VALUE_COUNT {
            return Err(SettingsError::Truncated {
                expected: VALUE_COUNT,
                found: tokens.len(),
            });
        }

        let float = |line: usize| -> Result<f32, SettingsError> {
            tokens[line]
                .parse::<f32>()
                .map_err(|_| SettingsError::InvalidValue {
                    line: line + 1,
                    value: tokens[line].to_string(),
                    kind: "float",
                })
        };

        let overlay_enabled = match tokens[3] {
            "1" | "true" => true,
            "0" | "false" => false,
            other => {
                return Err(SettingsError::InvalidValue {
                    line: 4,
                    value: other.to_string(),
                    kind: "flag",
                });
            }
        };

        Ok(Self {
            clear_color: [float(0)?, float(1)?, float(2)?],
            overlay_enabled,
            camera_position: [float(4)?, float(5)?, float(6)?],
            camera_front: [float(7)?, float(8)?, float(9)?],
        })
    }

    /// Render the flat format, one value per line.
    pub fn to_flat_string(&self) -> String {
        let mut out = String::new();
        for value in self.clear_color {
            out.push_str(&format!("{value}\n"));
        }
        out.push_str(if self.overlay_enabled { "1\n" } else { "0\n" });
        for value in self.camera_position.iter().chain(self.camera_front.iter()) {
            out.push_str(&format!("{value}\n"));
        }
        out
    }

    /// Read settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(SettingsError::Io(e)),
        }
    }

    /// Like [`load`](Self::load), but logs failures and falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring settings file {}: {e}", path.display());
            Self::default()
        })
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_flat_string())?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }
}
