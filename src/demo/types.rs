//! Raw record types as they appear in a recording

use serde::{Deserialize, Serialize};

/// Session metadata from the `HD` header record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHeader {
    /// Frames per second of the recording (may be fractional)
    pub frame_rate: f64,
    /// Map identifier, e.g. `de_dust2`
    pub map_name: String,
}

impl SessionHeader {
    /// Frame rate rounded to the nearest whole frame count
    pub fn frame_rate_rounded(&self) -> usize {
        self.frame_rate.round().max(0.0) as usize
    }
}

/// Team assignment of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "NONE")]
    Unassigned,
    #[serde(rename = "SPEC")]
    Spectators,
    #[serde(rename = "T")]
    Terrorists,
    #[serde(rename = "CT")]
    CounterTerrorists,
}

impl Team {
    /// Whether this team takes part in rounds
    pub fn is_playing(self) -> bool {
        matches!(self, Team::Terrorists | Team::CounterTerrorists)
    }
}

/// Equipment types the overview cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Weapon {
    Bomb,
    Knife,
    Pistol,
    Smg,
    Rifle,
    Sniper,
    Shotgun,
    Heavy,
    Zeus,
    Flash,
    He,
    Smoke,
    Molotov,
    Incendiary,
    Decoy,
    Other,
}

impl Weapon {
    pub fn as_str(self) -> &'static str {
        match self {
            Weapon::Bomb => "bomb",
            Weapon::Knife => "knife",
            Weapon::Pistol => "pistol",
            Weapon::Smg => "smg",
            Weapon::Rifle => "rifle",
            Weapon::Sniper => "sniper",
            Weapon::Shotgun => "shotgun",
            Weapon::Heavy => "heavy",
            Weapon::Zeus => "zeus",
            Weapon::Flash => "flash",
            Weapon::He => "he",
            Weapon::Smoke => "smoke",
            Weapon::Molotov => "molotov",
            Weapon::Incendiary => "incendiary",
            Weapon::Decoy => "decoy",
            Weapon::Other => "other",
        }
    }
}

// Unknown equipment names decode to `Other` instead of failing the frame
impl From<String> for Weapon {
    fn from(name: String) -> Self {
        match name.as_str() {
            "bomb" | "c4" => Weapon::Bomb,
            "knife" => Weapon::Knife,
            "pistol" => Weapon::Pistol,
            "smg" => Weapon::Smg,
            "rifle" => Weapon::Rifle,
            "sniper" => Weapon::Sniper,
            "shotgun" => Weapon::Shotgun,
            "heavy" => Weapon::Heavy,
            "zeus" => Weapon::Zeus,
            "flash" => Weapon::Flash,
            "he" => Weapon::He,
            "smoke" => Weapon::Smoke,
            "molotov" => Weapon::Molotov,
            "incendiary" => Weapon::Incendiary,
            "decoy" => Weapon::Decoy,
            _ => Weapon::Other,
        }
    }
}

impl From<Weapon> for String {
    fn from(weapon: Weapon) -> Self {
        weapon.as_str().to_string()
    }
}

/// One piece of equipment owned by a participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Weapon,
    #[serde(default)]
    pub ammo: u32,
}

/// A participant as recorded in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParticipant {
    pub name: String,
    pub team: Team,
    #[serde(default = "default_connected")]
    pub connected: bool,
    pub hp: i32,
    pub position: (f32, f32, f32),
    #[serde(default)]
    pub last_alive_position: Option<(f32, f32, f32)>,
    /// Horizontal view angle in degrees
    #[serde(default)]
    pub view_x: f32,
    /// Total duration of the last flash, not the time remaining
    #[serde(default)]
    pub flash_duration: f32,
    #[serde(default)]
    pub is_defusing: bool,
    #[serde(default)]
    pub weapons: Vec<Equipment>,
}

fn default_connected() -> bool {
    true
}

impl RawParticipant {
    /// Playing participants are connected and on a side
    pub fn is_playing(&self) -> bool {
        self.connected && self.team.is_playing()
    }
}

/// A grenade in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGrenade {
    pub weapon: Weapon,
    pub position: (f32, f32, f32),
}

/// A burning fire area, as individual fire points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInferno {
    pub fires: Vec<(f32, f32)>,
}

/// Bomb position and carrier name (if carried)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawBomb {
    pub position: (f32, f32, f32),
    #[serde(default)]
    pub carrier: Option<String>,
}

/// Aggregate team state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTeam {
    pub score: u32,
    #[serde(default)]
    pub clan: String,
}

/// One frame of game state, as exported
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFrame {
    pub tick: i32,
    #[serde(default)]
    pub participants: Vec<RawParticipant>,
    #[serde(default)]
    pub grenades: Vec<RawGrenade>,
    #[serde(default)]
    pub infernos: Vec<RawInferno>,
    #[serde(default)]
    pub bomb: RawBomb,
    #[serde(default)]
    pub ct: RawTeam,
    #[serde(default)]
    pub t: RawTeam,
}
