//! Replay system for viewing recorded matches on the map overview.
//!
//! A recording is read twice: the event pass collects round/half boundaries
//! and schedules grenade effects, the frame pass builds the timeline. The
//! playback cursor then walks the timeline at a user-controlled speed.

mod boundaries;
mod data;
mod effects;
mod event_index;
mod loader;
mod render;
mod state;
mod systems;
mod timeline;
mod ui;

pub use boundaries::{BoundaryIndex, BoundaryKind};
pub use data::{
    BombState, FLASHED_THRESHOLD, FrameSnapshot, GrenadeProjectile, InfernoHull, LoadStats,
    PlayerState, ReplayData, TeamState,
};
pub use effects::{EffectDurations, EffectInstance, EffectSchedule};
pub use event_index::{EventIndex, build_event_index};
pub use loader::load_replay;
pub use render::{FrameView, Label, Shape, compose_frame};
pub use state::{
    Granularity, PlaybackClock, PlaybackCursor, ReplayCommand, ReplayState, clock_time,
    playback_speed,
};
pub use systems::{
    ActiveMap, MapBackground, OverviewElement, RenderedFrame, draw_overview_outlines,
    render_overview, replay_commands, replay_input_handler, replay_playback, replay_setup,
};
pub use timeline::{Timeline, build_timeline, convex_hull};
pub use ui::{
    BoundaryMarkerType, ReplayBoundaryMarker, ReplayControlsText, ReplaySpeedDisplay,
    ReplayTimeDisplay, ReplayTimeline, ReplayTimelineProgress, scoreboard_title, setup_replay_ui,
    update_replay_ui,
};
