//! Demoview - map overview replay viewer
//!
//! Main entry point: loads everything the replay needs, then opens the window.

use std::process::ExitCode;

use bevy::prelude::*;
use demoview::{
    ActiveMap, CurrentSettings, DemoError, DemoSource, MapCatalog, RenderedFrame, ReplayData,
    ReplayState, ViewerSettings, constants::*, logging, replay,
};

/// Everything loaded before the window opens
struct Session {
    settings: ViewerSettings,
    map: ActiveMap,
    replay: ReplayData,
}

fn load_session(path: &str) -> Result<Session, DemoError> {
    let settings = ViewerSettings::load();
    let catalog = MapCatalog::load();

    let source = DemoSource::open(path)?;
    let map = catalog.get(&source.header().map_name)?.clone();
    let replay = replay::load_replay(&source)?;

    Ok(Session {
        settings,
        map: ActiveMap(map),
        replay,
    })
}

fn main() -> ExitCode {
    logging::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let Some(recording) = args.get(1) else {
        eprintln!("Usage: demoview <recording.dlog>");
        return ExitCode::FAILURE;
    };

    // Setup failures are fatal before any window opens
    let session = match load_session(recording) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to load '{}': {}", recording, e);
            return ExitCode::FAILURE;
        }
    };

    let Session {
        settings,
        map,
        replay: replay_data,
    } = session;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        // Set scale_factor_override to 1.0 for consistent behavior on HiDPI displays
                        resolution: bevy::window::WindowResolution::new(
                            settings.window_width,
                            settings.window_height,
                        )
                        .with_scale_factor_override(1.0),
                        title: "demoview".into(),
                        ..default()
                    }),
                    ..default()
                })
                // The subscriber is already installed for loading
                .disable::<bevy::log::LogPlugin>(),
        )
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(ReplayState::new(settings.start_paused))
        .insert_resource(CurrentSettings { settings })
        .insert_resource(map)
        .insert_resource(replay_data)
        .init_resource::<RenderedFrame>()
        .add_systems(Startup, (replay::replay_setup, replay::setup_replay_ui))
        // Input, then time, then paint
        .add_systems(
            Update,
            (
                replay::replay_input_handler,
                replay::replay_playback,
                replay::render_overview,
                replay::draw_overview_outlines,
                replay::update_replay_ui,
            )
                .chain(),
        )
        .run();

    ExitCode::SUCCESS
}
