//! Replay playback systems

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use bevy::camera::ScalingMode;
use bevy::prelude::*;

use crate::constants::*;
use crate::maps::MapOverview;
use crate::settings::CurrentSettings;

use super::ReplayData;
use super::boundaries::BoundaryKind;
use super::render::{FrameView, Shape, closed_outline, compose_frame};
use super::state::{Granularity, ReplayCommand, ReplayState, playback_speed};

/// Calibration of the map being replayed
#[derive(Resource, Debug, Clone)]
pub struct ActiveMap(pub MapOverview);

/// Overview background image
#[derive(Component)]
pub struct MapBackground;

/// Entity spawned for the currently shown frame; replaced when the frame changes
#[derive(Component)]
pub struct OverviewElement;

/// The frame currently painted, and its view (outlines are redrawn from it every update)
#[derive(Resource, Default)]
pub struct RenderedFrame {
    pub frame: Option<usize>,
    pub view: FrameView,
}

/// Shared mesh and color materials for filled circles
#[derive(Resource)]
pub struct OverviewAssets {
    disc: Handle<Mesh>,
    materials: HashMap<[u8; 4], Handle<ColorMaterial>>,
}

impl OverviewAssets {
    fn material(&mut self, color: Color, materials: &mut Assets<ColorMaterial>) -> Handle<ColorMaterial> {
        let c = color.to_srgba();
        let key = [c.red, c.green, c.blue, c.alpha].map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
        self.materials
            .entry(key)
            .or_insert_with(|| materials.add(color))
            .clone()
    }
}

/// Setup system for replay mode - camera, map background, shared assets
pub fn replay_setup(
    mut commands: Commands,
    replay_data: Res<ReplayData>,
    settings: Res<CurrentSettings>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    info!(
        "Setting up replay: map {}, {} frames",
        replay_data.header.map_name,
        replay_data.timeline.len()
    );

    // Camera - orthographic, shows the radar plus the HUD strip below it
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, -HUD_HEIGHT / 2.0, 0.0),
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: RADAR_SIZE + HUD_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
    ));

    // Radar image; a missing file leaves the background clear
    let image_path = format!("{}/{}.png", settings.settings.maps_dir, replay_data.header.map_name);
    commands.spawn((
        Sprite {
            image: asset_server.load(image_path),
            custom_size: Some(Vec2::splat(RADAR_SIZE)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 0.0),
        MapBackground,
    ));

    commands.insert_resource(OverviewAssets {
        disc: meshes.add(Circle::new(1.0)),
        materials: HashMap::new(),
    });
}

/// Map this update's key presses to playback commands
pub fn replay_commands(keyboard: &ButtonInput<KeyCode>) -> Vec<ReplayCommand> {
    let shift = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let granularity = if shift { Granularity::Long } else { Granularity::Short };
    let boundary = if shift { BoundaryKind::Half } else { BoundaryKind::Round };

    let mut commands = Vec::new();
    if keyboard.just_pressed(KeyCode::Space) {
        commands.push(ReplayCommand::TogglePause);
    }
    if keyboard.just_pressed(KeyCode::KeyA) {
        commands.push(ReplayCommand::StepBack(granularity));
    }
    if keyboard.just_pressed(KeyCode::KeyD) {
        commands.push(ReplayCommand::StepForward(granularity));
    }
    if keyboard.just_pressed(KeyCode::KeyQ) {
        commands.push(ReplayCommand::JumpPrevious(boundary));
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        commands.push(ReplayCommand::JumpNext(boundary));
    }
    commands
}

/// Input handler for replay controls
pub fn replay_input_handler(
    keyboard: Res<ButtonInput<KeyCode>>,
    replay_data: Res<ReplayData>,
    settings: Res<CurrentSettings>,
    mut state: ResMut<ReplayState>,
    mut exit: MessageWriter<AppExit>,
) {
    // Escape: quit before anything else moves
    if keyboard.just_pressed(KeyCode::Escape) {
        state.request_quit();
        exit.write(AppExit::Success);
        return;
    }

    for command in replay_commands(&keyboard) {
        debug!("Replay command: {:?}", command);
        state
            .cursor
            .apply(command, &replay_data.clock, &replay_data.boundaries);
    }

    // Hold W / S: speed is re-read every update
    let speed = playback_speed(
        keyboard.pressed(KeyCode::KeyW),
        keyboard.pressed(KeyCode::KeyS),
        settings.settings.fast_speed,
        settings.settings.slow_speed,
    );
    state.cursor.set_speed(speed);
}

/// Main playback system - advances the cursor by the elapsed frame budget
pub fn replay_playback(time: Res<Time>, replay_data: Res<ReplayData>, mut state: ResMut<ReplayState>) {
    state.advance(&replay_data.clock, time.delta());
}

/// Repaint the overview entities when the shown frame changes
pub fn render_overview(
    mut commands: Commands,
    replay_data: Res<ReplayData>,
    state: Res<ReplayState>,
    active_map: Res<ActiveMap>,
    settings: Res<CurrentSettings>,
    mut rendered: ResMut<RenderedFrame>,
    mut assets: ResMut<OverviewAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut meshes: ResMut<Assets<Mesh>>,
    elements: Query<Entity, With<OverviewElement>>,
) {
    let frame = state.cursor.current_frame;
    if rendered.frame == Some(frame) {
        return;
    }
    let Some(snapshot) = replay_data.snapshot(frame) else {
        return;
    };

    for entity in &elements {
        commands.entity(entity).despawn();
    }

    let view = compose_frame(snapshot, replay_data.effects_at(frame), &active_map.0);

    for (i, shape) in view.shapes.iter().enumerate() {
        let z = 1.0 + i as f32 * 0.001;
        match shape {
            Shape::Disc { center, radius, color } => {
                commands.spawn((
                    Mesh2d(assets.disc.clone()),
                    MeshMaterial2d(assets.material(*color, &mut materials)),
                    Transform::from_xyz(center.x, center.y, z).with_scale(Vec3::new(*radius, *radius, 1.0)),
                    OverviewElement,
                ));
            }
            Shape::Rect { center, size, color } => {
                commands.spawn((
                    Sprite {
                        color: *color,
                        custom_size: Some(*size),
                        ..default()
                    },
                    Transform::from_xyz(center.x, center.y, z),
                    OverviewElement,
                ));
            }
            Shape::Polygon { points, color } => {
                // Hulls are convex, so a fan from the first point fills them
                let material = assets.material(*color, &mut materials);
                for pair in points.windows(2).skip(1) {
                    let triangle = Triangle2d::new(points[0], pair[0], pair[1]);
                    commands.spawn((
                        Mesh2d(meshes.add(triangle)),
                        MeshMaterial2d(material.clone()),
                        Transform::from_xyz(0.0, 0.0, z),
                        OverviewElement,
                    ));
                }
            }
            // Outlines are drawn by draw_overview_outlines
            Shape::Ring { .. } | Shape::Arc { .. } => {}
        }
    }

    for label in &view.labels {
        commands.spawn((
            Text2d::new(label.text.clone()),
            TextFont {
                font_size: settings.settings.name_font_size,
                ..default()
            },
            TextColor(label.color),
            Transform::from_xyz(label.position.x, label.position.y, 5.0),
            OverviewElement,
        ));
    }

    rendered.frame = Some(frame);
    rendered.view = view;
}

/// Immediate-mode outlines (rings, view arcs, fire hull edges) for the shown frame
pub fn draw_overview_outlines(mut gizmos: Gizmos, rendered: Res<RenderedFrame>) {
    for shape in &rendered.view.shapes {
        match shape {
            Shape::Ring { center, radius, color } => {
                gizmos.circle_2d(*center, *radius, *color);
            }
            Shape::Arc {
                center,
                radius,
                facing,
                sweep,
                color,
            } => {
                // Arcs are laid out around the isometry's +y axis
                let isometry = Isometry2d::new(*center, Rot2::radians(*facing - FRAC_PI_2));
                gizmos.arc_2d(isometry, *sweep, *radius, *color);
            }
            Shape::Polygon { points, color } => {
                gizmos.linestrip_2d(closed_outline(points), *color);
            }
            Shape::Disc { .. } | Shape::Rect { .. } => {}
        }
    }
}
