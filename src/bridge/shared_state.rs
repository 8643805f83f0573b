//! Shared state crossing the Tauri/Bevy boundary
//!
//! Thread-safe cells written on one side of the bridge and read on the
//! other. The webview pushes scroll offsets and resize requests; the
//! backdrop publishes frames and render statistics. All cells are
//! `Arc<Mutex<_>>`: both sides touch them briefly and never hold a lock
//! across a frame.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::config;

// =============================================================================
// Frame Buffer
// =============================================================================

/// One published frame: tightly packed RGBA8 plus the dimensions it was
/// rendered at. Dimensions travel with the pixels so a resize mid-stream
/// can never mislabel a frame.
#[derive(Clone)]
pub struct FramePixels {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Thread-safe frame buffer holding the most recently published frame.
#[derive(Clone, Default)]
pub struct SharedFrameBuffer(pub Arc<Mutex<Option<FramePixels>>>);

/// Frame response containing Base64-encoded RGBA pixel data
#[derive(Serialize, Deserialize)]
pub struct FrameResponse {
    /// Base64-encoded RGBA pixel data (avoids slow JSON array serialization)
    pub data: String,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Scroll Input
// =============================================================================

/// Scroll state received from the page.
///
/// `offset` is the page layout offset: 0 with the page at the top,
/// increasingly negative as the user scrolls down. `pending` counts scroll
/// events not yet consumed by the backdrop; consuming applies the per-event
/// rotation steps once per counted event and the camera pose from the
/// latest offset, so coalescing between ticks is invisible.
#[derive(Debug, Clone, Copy)]
pub struct ScrollInput {
    pub offset: f32,
    pub pending: u32,
}

impl Default for ScrollInput {
    /// One event is already queued at offset 0: the first tick establishes
    /// the initial camera placement before any scroll arrives.
    fn default() -> Self {
        Self {
            offset: 0.0,
            pending: 1,
        }
    }
}

impl ScrollInput {
    /// Record one scroll event at the given offset.
    pub fn record(&mut self, offset: f32) {
        self.offset = offset;
        self.pending = self.pending.saturating_add(1);
    }

    /// Take the queued events, keeping the latest offset.
    pub fn drain(&mut self) -> (f32, u32) {
        let events = self.pending;
        self.pending = 0;
        (self.offset, events)
    }
}

/// Thread-safe scroll input shared between Tauri and Bevy.
#[derive(Clone, Default)]
pub struct SharedScrollInput(pub Arc<Mutex<ScrollInput>>);

// =============================================================================
// Surface Size
// =============================================================================

/// Pending resize request, consumed by the backdrop on its next tick.
#[derive(Clone, Default)]
pub struct SharedResizeRequest(pub Arc<Mutex<Option<(u32, u32)>>>);

/// Current surface size as the bridge sees it. Updated by the backdrop
/// after a resize lands.
#[derive(Clone)]
pub struct SharedSurfaceSize(pub Arc<Mutex<(u32, u32)>>);

impl Default for SharedSurfaceSize {
    fn default() -> Self {
        Self(Arc::new(Mutex::new((
            config::SURFACE_WIDTH,
            config::SURFACE_HEIGHT,
        ))))
    }
}

// =============================================================================
// Render Statistics
// =============================================================================

/// Render-loop statistics for debugging and monitoring
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct RenderStats {
    // Backdrop (Bevy) timings
    pub copy_ms: f64,
    pub unpad_ms: f64,
    pub publish_ms: f64,
    pub backdrop_fps: f64,
    pub frame_count: u32,
    pub frame_kb: f64,
    // IPC command timings
    pub ipc_fetch_ms: f64,
    pub ipc_encode_ms: f64,
}

/// Thread-safe render statistics.
#[derive(Clone, Default)]
pub struct SharedRenderStats(pub Arc<Mutex<RenderStats>>);

// =============================================================================
// Bundle
// =============================================================================

/// Every shared cell the two halves of the app need. One instance is
/// created at startup; clones are handed to the backdrop thread and to
/// Tauri's managed state.
#[derive(Clone, Default)]
pub struct BridgeState {
    pub frames: SharedFrameBuffer,
    pub scroll: SharedScrollInput,
    pub resize: SharedResizeRequest,
    pub surface: SharedSurfaceSize,
    pub stats: SharedRenderStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scroll_has_one_pending_event() {
        let mut input = ScrollInput::default();
        let (offset, events) = input.drain();
        assert_eq!(offset, 0.0);
        assert_eq!(events, 1);
        assert_eq!(input.pending, 0);
    }

    #[test]
    fn test_scroll_events_accumulate() {
        let mut input = ScrollInput::default();
        input.drain();

        input.record(-120.0);
        input.record(-250.0);
        input.record(-300.0);

        let (offset, events) = input.drain();
        assert_eq!(offset, -300.0);
        assert_eq!(events, 3);

        // nothing left after draining
        let (offset, events) = input.drain();
        assert_eq!(offset, -300.0);
        assert_eq!(events, 0);
    }

    #[test]
    fn test_frame_buffer_publish_and_read() {
        let buffer = SharedFrameBuffer::default();
        assert!(buffer.0.lock().unwrap().is_none());

        *buffer.0.lock().unwrap() = Some(FramePixels {
            data: vec![0u8; 16],
            width: 2,
            height: 2,
        });

        let guard = buffer.0.lock().unwrap();
        let frame = guard.as_ref().unwrap();
        assert_eq!((frame.width, frame.height), (2, 2));
        assert_eq!(frame.data.len(), 16);
    }

    #[test]
    fn test_default_surface_size_matches_config() {
        let size = SharedSurfaceSize::default();
        assert_eq!(
            *size.0.lock().unwrap(),
            (config::SURFACE_WIDTH, config::SURFACE_HEIGHT)
        );
    }
}
