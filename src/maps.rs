//! Map overview calibrations
//!
//! Each map's radar image is 1024x1024 pixels. A calibration gives the game
//! coordinates of the image's top-left corner and the game units per pixel.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::constants::{MAPS_FILE, RADAR_SIZE};
use crate::demo::DemoError;

/// Radar calibration for one map
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapOverview {
    #[serde(skip)]
    pub name: String,
    pub pos_x: f32,
    pub pos_y: f32,
    pub scale: f32,
}

impl MapOverview {
    /// Game coordinates to radar pixels (origin top-left, y down)
    pub fn translate_scale(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new((x - self.pos_x) / self.scale, (self.pos_y - y) / self.scale)
    }

    /// Game coordinates to world coordinates with the radar centred on the origin
    pub fn to_viewport(&self, x: f32, y: f32) -> Vec2 {
        let radar = self.translate_scale(x, y);
        Vec2::new(radar.x - RADAR_SIZE / 2.0, RADAR_SIZE / 2.0 - radar.y)
    }
}

/// (name, pos_x, pos_y, scale) for the competitive map pool
const BUILTIN_MAPS: &[(&str, f32, f32, f32)] = &[
    ("de_dust2", -2476.0, 3239.0, 4.4),
    ("de_mirage", -3230.0, 1713.0, 5.0),
    ("de_inferno", -2087.0, 3870.0, 4.9),
    ("de_nuke", -3453.0, 2887.0, 7.0),
    ("de_overpass", -4831.0, 1781.0, 5.2),
    ("de_train", -2477.0, 2392.0, 4.7),
    ("de_cache", -2000.0, 3250.0, 5.5),
    ("de_vertigo", -3168.0, 1762.0, 4.0),
    ("de_ancient", -2953.0, 2164.0, 5.0),
];

#[derive(Debug, Default, Deserialize)]
struct MapsFile {
    #[serde(default)]
    maps: HashMap<String, MapOverview>,
}

/// Known map calibrations, keyed by map name
#[derive(Debug, Clone)]
pub struct MapCatalog {
    maps: HashMap<String, MapOverview>,
}

impl MapCatalog {
    pub fn builtin() -> Self {
        let maps = BUILTIN_MAPS
            .iter()
            .map(|&(name, pos_x, pos_y, scale)| {
                (
                    name.to_string(),
                    MapOverview {
                        name: name.to_string(),
                        pos_x,
                        pos_y,
                        scale,
                    },
                )
            })
            .collect();
        Self { maps }
    }

    /// Built-in calibrations plus overrides from the default maps file
    pub fn load() -> Self {
        let mut catalog = Self::builtin();
        let path = Path::new(MAPS_FILE);
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => {
                    if let Err(e) = catalog.apply_overrides(&content) {
                        warn!("Failed to parse {}: {}", MAPS_FILE, e);
                    }
                }
                Err(e) => warn!("Failed to read {}: {}", MAPS_FILE, e),
            }
        }
        catalog
    }

    /// Merge `[maps.<name>]` tables over the current entries.
    /// Entries with a non-positive scale are ignored.
    pub fn apply_overrides(&mut self, content: &str) -> Result<usize, toml::de::Error> {
        let file: MapsFile = toml::from_str(content)?;
        let mut applied = 0;
        for (name, mut overview) in file.maps {
            if !(overview.scale.is_finite() && overview.scale > 0.0) {
                warn!("Ignoring map {} with scale {}", name, overview.scale);
                continue;
            }
            overview.name = name.clone();
            self.maps.insert(name, overview);
            applied += 1;
        }
        debug!("Applied {} map calibration overrides", applied);
        Ok(applied)
    }

    pub fn get(&self, name: &str) -> Result<&MapOverview, DemoError> {
        self.maps
            .get(name)
            .ok_or_else(|| DemoError::UnknownMap(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_scale() {
        let catalog = MapCatalog::builtin();
        let dust2 = catalog.get("de_dust2").unwrap();

        let corner = dust2.translate_scale(-2476.0, 3239.0);
        assert_eq!(corner, Vec2::ZERO);

        let p = dust2.translate_scale(-2476.0 + 440.0, 3239.0 - 880.0);
        assert!((p.x - 100.0).abs() < 1e-3);
        assert!((p.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_to_viewport_centres_radar() {
        let catalog = MapCatalog::builtin();
        let nuke = catalog.get("de_nuke").unwrap();
        let centre = nuke.to_viewport(-3453.0 + 512.0 * 7.0, 2887.0 - 512.0 * 7.0);
        assert!(centre.length() < 1e-2);

        let top_left = nuke.to_viewport(-3453.0, 2887.0);
        assert_eq!(top_left, Vec2::new(-512.0, 512.0));
    }

    #[test]
    fn test_unknown_map() {
        let catalog = MapCatalog::builtin();
        assert!(matches!(
            catalog.get("de_nowhere"),
            Err(DemoError::UnknownMap(name)) if name == "de_nowhere"
        ));
    }

    #[test]
    fn test_overrides() {
        let mut catalog = MapCatalog::builtin();
        let before = catalog.len();
        let content = r#"
[maps.de_dust2]
pos_x = -2500.0
pos_y = 3200.0
scale = 4.0

[maps.cs_office]
pos_x = -1838.0
pos_y = 1858.0
scale = 4.1

[maps.broken]
pos_x = 0.0
pos_y = 0.0
scale = 0.0
"#;
        assert_eq!(catalog.apply_overrides(content).unwrap(), 2);
        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.get("de_dust2").unwrap().scale, 4.0);
        assert_eq!(catalog.get("cs_office").unwrap().name, "cs_office");
        assert!(catalog.get("broken").is_err());

        assert!(catalog.apply_overrides("[maps.x]\npos_x = \"a\"").is_err());
    }
}
