//! Persistent viewer settings
//!
//! Loads user preferences (window size, playback speeds, map image directory)
//! from viewer_settings.json in the config directory, writing defaults the
//! first time.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{FAST_SPEED, SETTINGS_FILE, SLOW_SPEED};

/// Settings that survive between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub window_width: u32,
    pub window_height: u32,
    /// Speed while the fast key is held
    pub fast_speed: f32,
    /// Speed while the slow key is held (wins when both are held)
    pub slow_speed: f32,
    pub name_font_size: f32,
    /// Directory holding `<map_name>.png` overview images
    pub maps_dir: String,
    pub start_paused: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            window_width: 1024,
            window_height: 1144,
            fast_speed: FAST_SPEED,
            slow_speed: SLOW_SPEED,
            name_font_size: 14.0,
            maps_dir: "maps".to_string(),
            start_paused: false,
        }
    }
}

impl ViewerSettings {
    /// Load settings from the default file
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    /// Load settings, or write and return defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No {} found, writing defaults", path.display());
            let settings = Self::default();
            if let Err(e) = settings.save_to(path) {
                warn!("Failed to write default settings: {}", e);
            }
            return settings;
        }

        let settings = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<ViewerSettings>(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        };
        settings.sanitized()
    }

    /// Save settings to a file
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, json)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Replace non-positive speeds and sizes with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !is_positive(self.fast_speed) {
            warn!("fast_speed must be positive, using {}", defaults.fast_speed);
            self.fast_speed = defaults.fast_speed;
        }
        if !is_positive(self.slow_speed) {
            warn!("slow_speed must be positive, using {}", defaults.slow_speed);
            self.slow_speed = defaults.slow_speed;
        }
        if self.window_width == 0 || self.window_height == 0 {
            self.window_width = defaults.window_width;
            self.window_height = defaults.window_height;
        }
        if !is_positive(self.name_font_size) {
            self.name_font_size = defaults.name_font_size;
        }
        self
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Resource holding the settings the viewer was started with
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentSettings {
    pub settings: ViewerSettings,
}
