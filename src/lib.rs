//! Scroll-driven 3D backdrop
//!
//! A Tauri shell hosts a scrollable page whose background is a live 3D
//! scene (a torus, a textured avatar cube, and a moon) rendered
//! headlessly by Bevy in a background thread. Frames reach the page over
//! a custom binary protocol; the page pushes its scroll offset and size
//! back over IPC, which drive the camera and a little extra spin on the
//! scene objects.
//!
//! # Module Structure
//!
//! - `config`: constants for surface defaults, pacing, motion coefficients
//! - `bridge`: everything crossing the webview/render boundary
//!   - `shared_state`: thread-safe cells shared by the two halves
//!   - `commands`: IPC command handlers
//!   - `protocol`: `frame://` protocol handlers
//!   - `error`: typed bridge errors
//! - `backdrop`: the Bevy side
//!   - `components`, `resources`: scene state
//!   - `systems`: scene setup, scroll mapping, idle spin, resize, capture
//!   - `plugins`: GPU-to-CPU frame copy
//!   - `app`: application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod backdrop;
mod bridge;
mod config;

use std::{thread, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bridge::BridgeState;

/// Main entry point for the Tauri application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("starting");

    let state = BridgeState::default();

    // Bevy renders in a background thread; the shell owns the webview
    backdrop::start_backdrop(state.clone());

    // Give the render app a moment to initialize before the page asks
    // for frames
    thread::sleep(Duration::from_millis(1000));

    let protocol_state = state.clone();

    tauri::Builder::default()
        .manage(state.frames.clone())
        .manage(state.scroll.clone())
        .manage(state.resize.clone())
        .manage(state.surface.clone())
        .manage(state.stats.clone())
        // `frame://` serves binary frames directly, bypassing IPC JSON
        // serialization
        .register_asynchronous_uri_scheme_protocol("frame", move |_ctx, request, responder| {
            let state = protocol_state.clone();

            // Handled off the protocol thread to avoid blocking it
            std::thread::spawn(move || {
                let path = request.uri().path().to_owned();
                let response =
                    bridge::protocol::handle_frame_protocol(&path, &state.frames, &state.stats);
                responder.respond(response);
            });
        })
        .invoke_handler(tauri::generate_handler![
            bridge::commands::get_frame,
            bridge::commands::get_surface_size,
            bridge::commands::get_render_stats,
            bridge::commands::push_scroll_offset,
            bridge::commands::push_surface_resize
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
