//! Demoview - a 2D map overview replay viewer for recorded matches, built with Bevy
//!
//! This crate provides the recording reader, the replay model (timeline,
//! boundaries, effect schedule, playback cursor) and the viewer systems.

pub mod constants;
pub mod demo;
pub mod logging;
pub mod maps;
pub mod replay;
pub mod settings;

// Re-export commonly used types for convenience
pub use constants::*;
pub use demo::{DemoError, DemoSource, DomainEvent, EffectKind, EventKind, RecordError};
pub use maps::{MapCatalog, MapOverview};
pub use replay::{
    ActiveMap, BoundaryIndex, BoundaryKind, EffectSchedule, FrameSnapshot, PlaybackClock,
    PlaybackCursor, RenderedFrame, ReplayCommand, ReplayData, ReplayState, Timeline,
    draw_overview_outlines, load_replay, render_overview, replay_input_handler, replay_playback,
    replay_setup, setup_replay_ui, update_replay_ui,
};
pub use settings::{CurrentSettings, ViewerSettings};
