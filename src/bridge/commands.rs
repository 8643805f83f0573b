//! Tauri command handlers
//!
//! The IPC surface invoked from the page: frame fetch, surface queries,
//! and the scroll/resize signals that drive the backdrop.

use base64::{engine::general_purpose::STANDARD, Engine};
use tauri::State;

use super::error::BridgeError;
use super::shared_state::{
    FrameResponse, RenderStats, SharedFrameBuffer, SharedRenderStats, SharedResizeRequest,
    SharedScrollInput, SharedSurfaceSize,
};

/// Get the current rendered frame as Base64-encoded RGBA data
#[tauri::command]
pub fn get_frame(
    state: State<SharedFrameBuffer>,
    stats: State<SharedRenderStats>,
) -> Result<FrameResponse, BridgeError> {
    let cmd_start = std::time::Instant::now();

    let guard = state.0.lock().map_err(|_| BridgeError::LockPoisoned)?;
    let frame = guard.as_ref().ok_or(BridgeError::FrameNotReady)?;
    let fetch_ms = cmd_start.elapsed().as_secs_f64() * 1000.0;

    let encode_start = std::time::Instant::now();
    let data = STANDARD.encode(&frame.data);
    let encode_ms = encode_start.elapsed().as_secs_f64() * 1000.0;

    if let Ok(mut stats) = stats.0.lock() {
        stats.ipc_fetch_ms = fetch_ms;
        stats.ipc_encode_ms = encode_ms;
    }

    Ok(FrameResponse {
        data,
        width: frame.width,
        height: frame.height,
    })
}

/// Get the current surface size
#[tauri::command]
pub fn get_surface_size(state: State<SharedSurfaceSize>) -> Result<(u32, u32), BridgeError> {
    let guard = state.0.lock().map_err(|_| BridgeError::LockPoisoned)?;
    Ok(*guard)
}

/// Get render-loop statistics
#[tauri::command]
pub fn get_render_stats(state: State<SharedRenderStats>) -> Result<RenderStats, BridgeError> {
    let guard = state.0.lock().map_err(|_| BridgeError::LockPoisoned)?;
    Ok(guard.clone())
}

/// Record a scroll event from the page
///
/// `offset` is the page layout offset (0 at the top, negative scrolled
/// down). Events queue until the backdrop consumes them on its next tick.
#[tauri::command]
pub fn push_scroll_offset(
    state: State<SharedScrollInput>,
    offset: f32,
) -> Result<(), BridgeError> {
    let mut guard = state.0.lock().map_err(|_| BridgeError::LockPoisoned)?;
    guard.record(offset);
    Ok(())
}

/// Request a new surface size from the page
///
/// Applied by the backdrop on its next tick: the camera aspect becomes
/// width/height and the render target is recreated at the new size.
#[tauri::command]
pub fn push_surface_resize(
    state: State<SharedResizeRequest>,
    width: u32,
    height: u32,
) -> Result<(), BridgeError> {
    if width == 0 || height == 0 {
        return Err(BridgeError::InvalidSize { width, height });
    }
    let mut guard = state.0.lock().map_err(|_| BridgeError::LockPoisoned)?;
    *guard = Some((width, height));
    Ok(())
}
