//! Timeline builder: one immutable snapshot per decoded frame

use bevy::prelude::*;

use crate::demo::{RawFrame, RawInferno, RawParticipant, RecordError};

use super::data::{BombState, FrameSnapshot, GrenadeProjectile, InfernoHull, PlayerState, TeamState};

/// Random-access sequence of frame snapshots, indexed densely by decoded frame
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    frames: Vec<FrameSnapshot>,
    skipped: usize,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FrameSnapshot> {
        self.frames.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Frames dropped because their record failed to decode
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameSnapshot> {
        self.frames.iter()
    }
}

/// Consume a frame pass, skipping frames that failed to decode.
///
/// Timeline indices count decoded frames only. Event frame stamps line up
/// with them because the event pass counts frames under the same policy.
pub fn build_timeline<I>(frames: I) -> Timeline
where
    I: IntoIterator<Item = Result<RawFrame, RecordError>>,
{
    let mut timeline = Timeline::default();

    for frame in frames {
        match frame {
            Ok(raw) => timeline.frames.push(snapshot_from_raw(raw)),
            Err(e) => {
                warn!("Skipping frame: {}", e);
                timeline.skipped += 1;
            }
        }
    }

    timeline
}

/// Build a snapshot from a raw frame, keeping only playing participants
pub fn snapshot_from_raw(raw: RawFrame) -> FrameSnapshot {
    let players = raw
        .participants
        .into_iter()
        .filter(RawParticipant::is_playing)
        .map(player_from_raw)
        .collect();

    let grenades = raw
        .grenades
        .into_iter()
        .map(|g| GrenadeProjectile {
            weapon: g.weapon,
            position: vec3(g.position),
        })
        .collect();

    let infernos = raw.infernos.iter().map(inferno_hull).collect();

    FrameSnapshot {
        tick: raw.tick,
        players,
        grenades,
        infernos,
        bomb: BombState {
            position: vec3(raw.bomb.position),
            carrier: raw.bomb.carrier,
        },
        counter_terrorists: TeamState {
            score: raw.ct.score,
            clan_name: raw.ct.clan,
        },
        terrorists: TeamState {
            score: raw.t.score,
            clan_name: raw.t.clan,
        },
    }
}

fn player_from_raw(p: RawParticipant) -> PlayerState {
    let position = vec3(p.position);
    PlayerState {
        name: p.name,
        team: p.team,
        hp: p.hp,
        position,
        last_alive_position: p.last_alive_position.map(vec3).unwrap_or(position),
        view_direction: p.view_x,
        flash_duration: p.flash_duration,
        is_defusing: p.is_defusing,
        weapons: p.weapons,
    }
}

fn vec3(p: (f32, f32, f32)) -> Vec3 {
    Vec3::new(p.0, p.1, p.2)
}

fn inferno_hull(inferno: &RawInferno) -> InfernoHull {
    let points: Vec<Vec2> = inferno.fires.iter().map(|f| Vec2::new(f.0, f.1)).collect();
    InfernoHull {
        points: convex_hull(points),
    }
}

/// 2D convex hull (monotone chain), counter-clockwise, no repeated endpoint
pub fn convex_hull(mut points: Vec<Vec2>) -> Vec<Vec2> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let cross = |o: Vec2, a: Vec2, b: Vec2| (a - o).perp_dot(b - o);

    let mut lower: Vec<Vec2> = Vec::new();
    for &p in &points {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Vec2> = Vec::new();
    for &p in points.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
