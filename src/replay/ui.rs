//! Replay HUD components and systems

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::*;

use super::ReplayData;
use super::data::FrameSnapshot;
use super::state::ReplayState;

/// Timeline bar below the overview
#[derive(Component)]
pub struct ReplayTimeline;

/// Timeline progress indicator
#[derive(Component)]
pub struct ReplayTimelineProgress;

/// Round and time display (current / total)
#[derive(Component)]
pub struct ReplayTimeDisplay;

/// Speed display
#[derive(Component)]
pub struct ReplaySpeedDisplay;

/// Boundary marker on the timeline
#[derive(Component)]
pub struct ReplayBoundaryMarker {
    pub frame: usize,
    pub marker_type: BoundaryMarkerType,
}

/// Type of boundary marker for coloring
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryMarkerType {
    Round,
    Half,
}

impl BoundaryMarkerType {
    pub fn color(&self) -> Color {
        match self {
            BoundaryMarkerType::Round => ROUND_MARKER_COLOR,
            BoundaryMarkerType::Half => HALF_MARKER_COLOR,
        }
    }

    fn height(&self) -> f32 {
        match self {
            BoundaryMarkerType::Round => TIMELINE_HEIGHT + 4.0,
            BoundaryMarkerType::Half => TIMELINE_HEIGHT + 12.0,
        }
    }
}

/// Controls help text
#[derive(Component)]
pub struct ReplayControlsText;

const CONTROLS_HELP: &str =
    "SPACE: pause | A/D: -/+10s (SHIFT: 30s) | Q/E: round (SHIFT: half) | hold W/S: fast/slow | ESC: quit";

/// Horizontal timeline position of a frame
fn timeline_x(frame: usize, last_index: usize) -> f32 {
    let ratio = if last_index > 0 {
        frame as f32 / last_index as f32
    } else {
        0.0
    };
    ratio * TIMELINE_WIDTH - TIMELINE_WIDTH / 2.0
}

/// Window title in the form `<CT clan>  [ct:t]  <T clan>`
pub fn scoreboard_title(snapshot: &FrameSnapshot) -> String {
    let cts = &snapshot.counter_terrorists;
    let ts = &snapshot.terrorists;
    let ct_name = if cts.clan_name.is_empty() {
        "Counter Terrorists"
    } else {
        cts.clan_name.as_str()
    };
    let t_name = if ts.clan_name.is_empty() {
        "Terrorists"
    } else {
        ts.clan_name.as_str()
    };
    format!("{}  [{}:{}]  {}", ct_name, cts.score, ts.score, t_name)
}

/// Setup the replay HUD (called once when replay starts)
pub fn setup_replay_ui(mut commands: Commands, replay_data: Res<ReplayData>) {
    // Timeline background (dark bar)
    commands.spawn((
        Sprite {
            color: TIMELINE_COLOR,
            custom_size: Some(Vec2::new(TIMELINE_WIDTH, TIMELINE_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(0.0, TIMELINE_Y, 10.0),
        ReplayTimeline,
    ));

    // Timeline progress (colored, width scales with position)
    commands.spawn((
        Sprite {
            color: TIMELINE_PROGRESS_COLOR,
            custom_size: Some(Vec2::new(0.0, TIMELINE_HEIGHT - 4.0)),
            ..default()
        },
        Transform::from_xyz(-TIMELINE_WIDTH / 2.0, TIMELINE_Y, 11.0),
        ReplayTimelineProgress,
    ));

    // Round and half markers
    let last_index = replay_data.clock.last_index();
    let markers = replay_data
        .boundaries
        .round_starts()
        .iter()
        .map(|&frame| (frame, BoundaryMarkerType::Round))
        .chain(
            replay_data
                .boundaries
                .half_starts()
                .iter()
                .map(|&frame| (frame, BoundaryMarkerType::Half)),
        );
    for (frame, marker_type) in markers {
        commands.spawn((
            Sprite {
                color: marker_type.color(),
                custom_size: Some(Vec2::new(2.0, marker_type.height())),
                ..default()
            },
            Transform::from_xyz(timeline_x(frame, last_index), TIMELINE_Y, 12.0),
            ReplayBoundaryMarker { frame, marker_type },
        ));
    }

    // Round / time display (left, under the timeline)
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextLayout::new_with_justify(Justify::Left),
        TextColor(TEXT_PRIMARY),
        Transform::from_xyz(-TIMELINE_WIDTH / 2.0 + 110.0, TIMELINE_Y - 28.0, 10.0),
        ReplayTimeDisplay,
    ));

    // Speed display (right, under the timeline)
    commands.spawn((
        Text2d::new("1.0x"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(TEXT_ACCENT),
        Transform::from_xyz(TIMELINE_WIDTH / 2.0 - 40.0, TIMELINE_Y - 28.0, 10.0),
        ReplaySpeedDisplay,
    ));

    // Controls help text
    commands.spawn((
        Text2d::new(CONTROLS_HELP),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(TEXT_SECONDARY),
        Transform::from_xyz(0.0, TIMELINE_Y - 60.0, 10.0),
        ReplayControlsText,
    ));
}

/// Update the replay HUD each frame
pub fn update_replay_ui(
    state: Res<ReplayState>,
    replay_data: Res<ReplayData>,
    mut time_display: Query<&mut Text2d, (With<ReplayTimeDisplay>, Without<ReplaySpeedDisplay>)>,
    mut speed_display: Query<&mut Text2d, (With<ReplaySpeedDisplay>, Without<ReplayTimeDisplay>)>,
    mut progress: Query<(&mut Transform, &mut Sprite), With<ReplayTimelineProgress>>,
    mut window: Query<&mut Window, With<PrimaryWindow>>,
) {
    let frame = state.cursor.current_frame;
    let round = replay_data.round_number(frame);

    for mut text in &mut time_display {
        **text = state.time_string(&replay_data.clock, round);
    }

    for mut text in &mut speed_display {
        **text = state.speed_string();
    }

    // Progress bar, anchored at the left edge
    let last_index = replay_data.clock.last_index();
    let new_width = timeline_x(frame, last_index) + TIMELINE_WIDTH / 2.0;
    for (mut transform, mut sprite) in &mut progress {
        sprite.custom_size = Some(Vec2::new(new_width, TIMELINE_HEIGHT - 4.0));
        transform.translation.x = -TIMELINE_WIDTH / 2.0 + new_width / 2.0;
    }

    // Scoreboard in the window title, only touched when it changes
    if let Some(snapshot) = replay_data.snapshot(frame)
        && let Ok(mut window) = window.single_mut()
    {
        let title = scoreboard_title(snapshot);
        if window.title != title {
            window.title = title;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::data::TeamState;

    #[test]
    fn test_scoreboard_title() {
        let mut snapshot = FrameSnapshot::default();
        assert_eq!(scoreboard_title(&snapshot), "Counter Terrorists  [0:0]  Terrorists");

        snapshot.counter_terrorists = TeamState {
            score: 9,
            clan_name: "FaZe".to_string(),
        };
        snapshot.terrorists = TeamState {
            score: 6,
            clan_name: "NAVI".to_string(),
        };
        assert_eq!(scoreboard_title(&snapshot), "FaZe  [9:6]  NAVI");
    }

    #[test]
    fn test_timeline_x() {
        assert_eq!(timeline_x(0, 999), -TIMELINE_WIDTH / 2.0);
        assert_eq!(timeline_x(999, 999), TIMELINE_WIDTH / 2.0);
        assert_eq!(timeline_x(0, 0), -TIMELINE_WIDTH / 2.0);
    }
}
