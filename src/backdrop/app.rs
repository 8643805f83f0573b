//! Backdrop application setup and execution
//!
//! Assembles the headless Bevy app and runs it on a background thread.

use bevy::{
    app::{App, ScheduleRunnerPlugin},
    prelude::*,
    window::ExitCondition,
};
use std::thread;
use std::time::Duration;
use tracing::info;

use crate::backdrop::plugins::FrameCopyPlugin;
use crate::backdrop::resources::{
    FrameBufferRes, FrameCount, FrameRateLimiter, FrameTimings, PreRollFrames, RenderStatsRes,
    ResizeRequestRes, ScrollInputRes, SurfaceSize, SurfaceSizeRes,
};
use crate::backdrop::systems::{
    advance_spin, apply_scroll, apply_surface_resize, publish_frames, setup_scene, sync_rotations,
};
use crate::bridge::BridgeState;
use crate::config::{PRE_ROLL_FRAMES, TARGET_FPS};

/// Create and configure the backdrop application.
pub fn create_app(state: BridgeState) -> App {
    let mut app = App::new();

    // DefaultPlugins configured for headless operation: no window, render
    // into the offscreen target only
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: None,
                exit_condition: ExitCondition::DontExit,
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    );

    // Fixed-rate tick loop standing in for the display refresh
    app.add_plugins(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
        1.0 / TARGET_FPS,
    )));

    app.add_plugins(FrameCopyPlugin);

    app.add_systems(Startup, setup_scene);
    // Mutators first, transform sync once they are done
    app.add_systems(
        Update,
        (apply_surface_resize, advance_spin, apply_scroll, sync_rotations).chain(),
    );
    app.add_systems(Last, publish_frames);

    app.insert_resource(FrameBufferRes(state.frames));
    app.insert_resource(ScrollInputRes(state.scroll));
    app.insert_resource(ResizeRequestRes(state.resize));
    app.insert_resource(SurfaceSizeRes(state.surface));
    app.insert_resource(RenderStatsRes(state.stats));
    app.insert_resource(SurfaceSize::default());
    app.insert_resource(FrameCount::default());
    app.insert_resource(PreRollFrames(PRE_ROLL_FRAMES));
    app.insert_resource(FrameTimings::default());
    app.insert_resource(FrameRateLimiter::default());

    info!("backdrop app configured");
    app
}

/// Run the backdrop on a background thread.
pub fn start_backdrop(state: BridgeState) {
    thread::spawn(move || {
        info!("backdrop thread started");
        let mut app = create_app(state);
        app.run();
    });
}
