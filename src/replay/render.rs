//! Render projection: snapshot + effects -> shapes and labels in world space
//!
//! Pure; the overview systems turn a [`FrameView`] into entities and gizmos.
//! Sizes are radar pixels, positions are world coordinates with the radar
//! centred on the origin.

use bevy::prelude::*;

use crate::constants::*;
use crate::demo::{EffectKind, Team, Weapon};
use crate::maps::MapOverview;

use super::data::{FrameSnapshot, PlayerState};
use super::effects::EffectInstance;

/// One primitive of the overview
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled circle
    Disc { center: Vec2, radius: f32, color: Color },
    /// Circle outline
    Ring { center: Vec2, radius: f32, color: Color },
    /// Circle outline segment centred on `facing` (radians, counter-clockwise from +x)
    Arc {
        center: Vec2,
        radius: f32,
        facing: f32,
        sweep: f32,
        color: Color,
    },
    /// Filled axis-aligned rectangle
    Rect { center: Vec2, size: Vec2, color: Color },
    /// Filled convex polygon with an outline
    Polygon { points: Vec<Vec2>, color: Color },
}

/// Text drawn on the overview
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Vec2,
    pub text: String,
    pub color: Color,
}

/// Everything painted for one frame, in draw order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameView {
    pub shapes: Vec<Shape>,
    pub labels: Vec<Label>,
}

pub fn team_color(team: Team) -> Color {
    match team {
        Team::Terrorists => COLOR_TERRORISTS,
        _ => COLOR_COUNTER_TERRORISTS,
    }
}

pub fn grenade_color(weapon: Weapon) -> Color {
    match weapon {
        Weapon::Decoy => COLOR_DECOY,
        Weapon::Molotov | Weapon::Incendiary => COLOR_FIRE,
        Weapon::Flash => COLOR_FLASH,
        Weapon::Smoke => COLOR_SMOKE,
        Weapon::He => COLOR_HE,
        _ => Color::BLACK,
    }
}

pub fn effect_color(kind: EffectKind) -> Color {
    match kind {
        EffectKind::Flash => COLOR_FLASH,
        EffectKind::He => COLOR_HE,
        EffectKind::Smoke => COLOR_SMOKE,
    }
}

/// Paint one frame: fire areas, players, grenade effects, projectiles, then
/// the bomb when it lies on the ground.
pub fn compose_frame(snapshot: &FrameSnapshot, effects: &[EffectInstance], map: &MapOverview) -> FrameView {
    let mut view = FrameView::default();

    for inferno in &snapshot.infernos {
        let points: Vec<Vec2> = inferno.points.iter().map(|p| map.to_viewport(p.x, p.y)).collect();
        if points.is_empty() {
            continue;
        }
        view.shapes.push(Shape::Polygon {
            points,
            color: COLOR_FIRE.with_alpha(FIRE_ALPHA),
        });
    }

    for player in &snapshot.players {
        compose_player(&mut view, player, map);
    }

    for effect in effects {
        compose_effect(&mut view, effect, map);
    }

    for grenade in &snapshot.grenades {
        view.shapes.push(Shape::Rect {
            center: map.to_viewport(grenade.position.x, grenade.position.y),
            size: GRENADE_SIZE,
            color: grenade_color(grenade.weapon),
        });
    }

    if snapshot.bomb.is_dropped() {
        view.shapes.push(Shape::Rect {
            center: map.to_viewport(snapshot.bomb.position.x, snapshot.bomb.position.y),
            size: BOMB_SIZE,
            color: COLOR_BOMB,
        });
    }

    view
}

fn compose_player(view: &mut FrameView, player: &PlayerState, map: &MapOverview) {
    let center = map.to_viewport(player.last_alive_position.x, player.last_alive_position.y);
    let color = team_color(player.team);

    if !player.is_alive() {
        view.labels.push(Label {
            position: center,
            text: "X".to_string(),
            color: color.with_alpha(DEAD_ALPHA),
        });
        return;
    }

    view.shapes.push(Shape::Ring {
        center,
        radius: PLAYER_RADIUS,
        color,
    });

    // Three stacked arcs, narrowing outwards
    let facing = player.view_direction.to_radians();
    for (extra, half_degrees) in [(1.0_f32, 20.0_f32), (2.0, 10.0), (3.0, 5.0)] {
        view.shapes.push(Shape::Arc {
            center,
            radius: PLAYER_RADIUS + extra,
            facing,
            sweep: (2.0 * half_degrees).to_radians(),
            color: COLOR_VIEW_MARKER,
        });
    }

    if player.is_flashed() {
        view.shapes.push(Shape::Disc {
            center,
            radius: PLAYER_RADIUS - 5.0,
            color: COLOR_FLASHED,
        });
    }

    if player.carries_bomb() {
        for inset in [1.0_f32, 2.0] {
            view.shapes.push(Shape::Ring {
                center,
                radius: PLAYER_RADIUS - inset,
                color: COLOR_BOMB,
            });
        }
    }

    if player.is_defusing {
        view.labels.push(Label {
            position: center,
            text: "D".to_string(),
            color: color.with_alpha(DEFUSE_ALPHA),
        });
    }

    view.labels.push(Label {
        position: center + NAME_OFFSET,
        text: player.name.clone(),
        color,
    });
}

fn compose_effect(view: &mut FrameView, effect: &EffectInstance, map: &MapOverview) {
    let position = effect.position();
    let center = map.to_viewport(position.x, position.y);
    let color = effect_color(effect.kind);

    match effect.kind {
        // Expanding blast ring
        EffectKind::Flash | EffectKind::He => {
            view.shapes.push(Shape::Ring {
                center,
                radius: (effect.lifetime as f32).max(1.0),
                color,
            });
        }
        EffectKind::Smoke => {
            view.shapes.push(Shape::Disc {
                center,
                radius: SMOKE_RADIUS,
                color: color.with_alpha(SMOKE_FILL_ALPHA),
            });
            if effect.progress() < SMOKE_OUTLINE_FRACTION {
                view.shapes.push(Shape::Ring {
                    center,
                    radius: SMOKE_RADIUS,
                    color,
                });
            }
            let remaining = 1.0 - effect.progress();
            let width = SMOKE_BAR_SIZE.x * remaining;
            view.shapes.push(Shape::Rect {
                center: center + Vec2::new((width - SMOKE_BAR_SIZE.x) / 2.0, -SMOKE_RADIUS - 4.0),
                size: Vec2::new(width, SMOKE_BAR_SIZE.y),
                color,
            });
        }
    }
}

/// Outline points of a polygon's edges, closed
pub fn closed_outline(points: &[Vec2]) -> Vec<Vec2> {
    let mut outline = points.to_vec();
    if let Some(&first) = points.first() {
        outline.push(first);
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{Equipment, GrenadeDetonation};
    use crate::maps::MapCatalog;
    use crate::replay::data::{BombState, GrenadeProjectile, InfernoHull};

    fn map() -> MapOverview {
        MapCatalog::builtin().get("de_dust2").unwrap().clone()
    }

    fn player(name: &str, team: Team, hp: i32) -> PlayerState {
        PlayerState {
            name: name.to_string(),
            team,
            hp,
            position: Vec3::new(0.0, 0.0, 0.0),
            last_alive_position: Vec3::new(0.0, 0.0, 0.0),
            view_direction: 90.0,
            flash_duration: 0.0,
            is_defusing: false,
            weapons: Vec::new(),
        }
    }

    fn rings(view: &FrameView) -> usize {
        view.shapes.iter().filter(|s| matches!(s, Shape::Ring { .. })).count()
    }

    #[test]
    fn test_alive_player() {
        let mut p = player("apEX", Team::Terrorists, 100);
        p.flash_duration = 2.5;
        p.weapons.push(Equipment {
            weapon: Weapon::Bomb,
            ammo: 0,
        });
        let snapshot = FrameSnapshot {
            players: vec![p],
            bomb: BombState {
                position: Vec3::ZERO,
                carrier: Some("apEX".to_string()),
            },
            ..Default::default()
        };

        let view = compose_frame(&snapshot, &[], &map());

        // Body ring plus two bomb carrier rings
        assert_eq!(rings(&view), 3);
        let arcs = view.shapes.iter().filter(|s| matches!(s, Shape::Arc { .. })).count();
        assert_eq!(arcs, 3);
        assert!(view.shapes.iter().any(|s| matches!(s, Shape::Disc { .. })));
        // Carried bomb is not drawn on the ground
        assert!(!view.shapes.iter().any(|s| matches!(s, Shape::Rect { .. })));

        assert_eq!(view.labels.len(), 1);
        assert_eq!(view.labels[0].text, "apEX");
        assert_eq!(view.labels[0].color, COLOR_TERRORISTS);
    }

    #[test]
    fn test_dead_player_and_defuser() {
        let mut defuser = player("b", Team::CounterTerrorists, 40);
        defuser.is_defusing = true;
        let mut dead = player("c", Team::Terrorists, 0);
        dead.last_alive_position = Vec3::new(-2476.0, 3239.0, 0.0);

        let snapshot = FrameSnapshot {
            players: vec![defuser, dead],
            ..Default::default()
        };
        let view = compose_frame(&snapshot, &[], &map());

        let texts: Vec<&str> = view.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["D", "b", "X"]);
        // Dead players are marked where they were last alive
        assert_eq!(view.labels[2].position, Vec2::new(-512.0, 512.0));
        assert_eq!(rings(&view), 1);
    }

    #[test]
    fn test_effects() {
        let detonation = GrenadeDetonation {
            position: (0.0, 0.0, 0.0),
            thrower: None,
        };
        let fresh_smoke = EffectInstance {
            kind: EffectKind::Smoke,
            detonation: detonation.clone(),
            origin_frame: 0,
            frame: 0,
            lifetime: 0,
            duration: 1152,
        };
        let fading_smoke = EffectInstance {
            lifetime: 1100,
            frame: 1100,
            ..fresh_smoke.clone()
        };
        let flash = EffectInstance {
            kind: EffectKind::Flash,
            detonation,
            origin_frame: 0,
            frame: 4,
            lifetime: 4,
            duration: 10,
        };

        let view = compose_frame(&FrameSnapshot::default(), &[fresh_smoke], &map());
        assert_eq!(rings(&view), 1);

        let view = compose_frame(&FrameSnapshot::default(), &[fading_smoke], &map());
        assert_eq!(rings(&view), 0);
        let Some(Shape::Rect { size, .. }) = view.shapes.last() else {
            panic!("Expected remaining-time bar");
        };
        assert!(size.x < SMOKE_BAR_SIZE.x * 0.1);

        let view = compose_frame(&FrameSnapshot::default(), &[flash], &map());
        assert!(matches!(view.shapes[0], Shape::Ring { radius, .. } if radius == 4.0));
    }

    #[test]
    fn test_grenades_infernos_and_dropped_bomb() {
        let snapshot = FrameSnapshot {
            grenades: vec![GrenadeProjectile {
                weapon: Weapon::Molotov,
                position: Vec3::ZERO,
            }],
            infernos: vec![InfernoHull {
                points: vec![Vec2::ZERO, Vec2::new(100.0, 0.0), Vec2::new(0.0, 100.0)],
            }],
            bomb: BombState {
                position: Vec3::ZERO,
                carrier: None,
            },
            ..Default::default()
        };
        let view = compose_frame(&snapshot, &[], &map());

        assert!(matches!(&view.shapes[0], Shape::Polygon { points, .. } if points.len() == 3));
        assert!(matches!(view.shapes[1], Shape::Rect { color, .. } if color == COLOR_FIRE));
        assert!(matches!(view.shapes[2], Shape::Rect { color, .. } if color == COLOR_BOMB));
    }

    #[test]
    fn test_closed_outline() {
        let outline = closed_outline(&[Vec2::ZERO, Vec2::X, Vec2::Y]);
        assert_eq!(outline.len(), 4);
        assert_eq!(outline[3], Vec2::ZERO);
        assert!(closed_outline(&[]).is_empty());
    }
}
