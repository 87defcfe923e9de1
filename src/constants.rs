//! Tunable constants for demoview
//!
//! Playback timing, effect lifetimes and overview drawing values live here.

use bevy::prelude::*;

// =============================================================================
// PLAYBACK
// =============================================================================

pub const STEP_SHORT_SECS: usize = 10; // A / D
pub const STEP_LONG_SECS: usize = 30; // Shift+A / Shift+D
pub const DEFAULT_SPEED: f32 = 1.0;
pub const FAST_SPEED: f32 = 5.0; // While W is held
pub const SLOW_SPEED: f32 = 0.5; // While S is held
pub const MAX_ADVANCES_PER_UPDATE: usize = 16; // Caps catch-up after a long stall

// =============================================================================
// EFFECT LIFETIMES
// =============================================================================

pub const FLASH_EFFECT_FRAMES: usize = 10;
pub const HE_EFFECT_FRAMES: usize = 10;
pub const SMOKE_EFFECT_SECS: f64 = 18.0; // Multiplied by the frame rate, truncated
pub const SMOKE_OUTLINE_FRACTION: f32 = 15.0 / 18.0; // Outline drawn until the smoke starts fading

// =============================================================================
// OVERVIEW GEOMETRY (radar pixels)
// =============================================================================

pub const RADAR_SIZE: f32 = 1024.0;
pub const PLAYER_RADIUS: f32 = 10.0;
pub const SMOKE_RADIUS: f32 = 25.0;
pub const SMOKE_BAR_SIZE: Vec2 = Vec2::new(20.0, 3.0);
pub const GRENADE_SIZE: Vec2 = Vec2::new(4.0, 6.0);
pub const BOMB_SIZE: Vec2 = Vec2::new(6.0, 4.0);
pub const NAME_OFFSET: Vec2 = Vec2::new(10.0, -10.0);

// =============================================================================
// OVERVIEW COLORS
// =============================================================================

pub const COLOR_TERRORISTS: Color = Color::srgb(0.988, 0.69, 0.047);
pub const COLOR_COUNTER_TERRORISTS: Color = Color::srgb(0.349, 0.808, 0.784);
pub const COLOR_VIEW_MARKER: Color = Color::srgb(0.784, 0.784, 0.784);
pub const COLOR_FLASHED: Color = Color::srgba(0.784, 0.784, 0.784, 0.784);
pub const COLOR_BOMB: Color = Color::srgb(1.0, 0.0, 0.0);
pub const COLOR_DECOY: Color = Color::srgb(0.4, 0.133, 0.0);
pub const COLOR_FIRE: Color = Color::srgb(1.0, 0.6, 0.0);
pub const COLOR_FLASH: Color = Color::srgb(0.502, 0.667, 1.0);
pub const COLOR_SMOKE: Color = Color::srgb(0.6, 0.6, 0.6);
pub const COLOR_HE: Color = Color::srgb(0.333, 0.588, 0.0);
pub const DEAD_ALPHA: f32 = 150.0 / 255.0;
pub const DEFUSE_ALPHA: f32 = 200.0 / 255.0;
pub const SMOKE_FILL_ALPHA: f32 = 100.0 / 255.0;
pub const FIRE_ALPHA: f32 = 100.0 / 255.0;

// =============================================================================
// TEXT/UI COLORS
// =============================================================================

pub const BACKGROUND_COLOR: Color = Color::srgb(0.08, 0.08, 0.09);
pub const TEXT_PRIMARY: Color = Color::srgb(0.95, 0.9, 0.8);
pub const TEXT_SECONDARY: Color = Color::srgb(0.7, 0.65, 0.55);
pub const TEXT_ACCENT: Color = Color::srgb(0.9, 0.75, 0.4);
pub const TIMELINE_COLOR: Color = Color::srgba(0.2, 0.2, 0.2, 0.8);
pub const TIMELINE_PROGRESS_COLOR: Color = Color::srgb(0.4, 0.6, 0.9);
pub const ROUND_MARKER_COLOR: Color = Color::srgb(0.7, 0.65, 0.55);
pub const HALF_MARKER_COLOR: Color = Color::srgb(0.9, 0.75, 0.4);

// =============================================================================
// HUD LAYOUT (world units, camera shows RADAR_SIZE + HUD_HEIGHT vertically)
// =============================================================================

pub const HUD_HEIGHT: f32 = 120.0;
pub const TIMELINE_WIDTH: f32 = 900.0;
pub const TIMELINE_HEIGHT: f32 = 12.0;
pub const TIMELINE_Y: f32 = -RADAR_SIZE / 2.0 - 30.0;

// =============================================================================
// CONFIG FILES
// =============================================================================

pub const SETTINGS_FILE: &str = "config/viewer_settings.json";
pub const MAPS_FILE: &str = "config/maps.toml";
