//! Domain events emitted by a recording

use serde::{Deserialize, Serialize};

/// Kind of short-lived grenade effect drawn on the overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Flash,
    He,
    Smoke,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Flash, EffectKind::He, EffectKind::Smoke];

    pub fn label(self) -> &'static str {
        match self {
            EffectKind::Flash => "flash",
            EffectKind::He => "he",
            EffectKind::Smoke => "smoke",
        }
    }
}

/// Where a grenade went off, and who threw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrenadeDetonation {
    pub position: (f32, f32, f32),
    pub thrower: Option<String>,
}

/// The event payload, without its frame stamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    RoundStart,
    MatchStart,
    HalfEnded,
    SideSwitch,
    FlashExplode(GrenadeDetonation),
    HeExplode(GrenadeDetonation),
    SmokeStart(GrenadeDetonation),
    /// Win panel announcement at the end of the match
    MatchEnd,
}

impl EventKind {
    /// Compact type code used in recordings
    pub fn type_code(&self) -> &'static str {
        match self {
            EventKind::RoundStart => "RS",
            EventKind::MatchStart => "MS",
            EventKind::HalfEnded => "GH",
            EventKind::SideSwitch => "SW",
            EventKind::FlashExplode(_) => "FX",
            EventKind::HeExplode(_) => "HX",
            EventKind::SmokeStart(_) => "SK",
            EventKind::MatchEnd => "WP",
        }
    }

    /// Effect kind and detonation for grenade events
    pub fn effect(&self) -> Option<(EffectKind, &GrenadeDetonation)> {
        match self {
            EventKind::FlashExplode(d) => Some((EffectKind::Flash, d)),
            EventKind::HeExplode(d) => Some((EffectKind::He, d)),
            EventKind::SmokeStart(d) => Some((EffectKind::Smoke, d)),
            _ => None,
        }
    }

    /// Round and half transitions (the events that feed navigation)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EventKind::RoundStart
                | EventKind::MatchStart
                | EventKind::HalfEnded
                | EventKind::SideSwitch
        )
    }
}

/// An event stamped with the timeline frame it occurred on
#[derive(Debug, Clone, PartialEq)]
pub struct DomainEvent {
    pub frame: usize,
    pub kind: EventKind,
}
