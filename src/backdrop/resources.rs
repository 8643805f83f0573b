//! Backdrop resource definitions
//!
//! Global resources used by the backdrop systems: wrappers around the
//! bridge's shared cells, the current surface size, and frame pacing
//! state.

use bevy::prelude::*;
use std::time::Duration;

use crate::bridge::shared_state::{
    SharedFrameBuffer, SharedRenderStats, SharedResizeRequest, SharedScrollInput,
    SharedSurfaceSize,
};
use crate::config;

// =============================================================================
// Bridge Handles
// =============================================================================

/// Frame buffer the backdrop publishes into.
#[derive(Resource, Clone)]
pub struct FrameBufferRes(pub SharedFrameBuffer);

/// Scroll input queued by the page.
#[derive(Resource)]
pub struct ScrollInputRes(pub SharedScrollInput);

/// Pending resize request from the page.
#[derive(Resource)]
pub struct ResizeRequestRes(pub SharedResizeRequest);

/// Surface size as published back to the bridge.
#[derive(Resource)]
pub struct SurfaceSizeRes(pub SharedSurfaceSize);

/// Render statistics published to the bridge.
#[derive(Resource)]
pub struct RenderStatsRes(pub SharedRenderStats);

// =============================================================================
// Surface
// =============================================================================

/// Current offscreen surface size.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self {
            width: config::SURFACE_WIDTH,
            height: config::SURFACE_HEIGHT,
        }
    }
}

/// Handle to the offscreen render target texture.
#[derive(Resource)]
pub struct RenderTargetHandle(pub Handle<Image>);

// =============================================================================
// Frame Management
// =============================================================================

/// Counter for total frames published.
#[derive(Resource, Default)]
pub struct FrameCount(pub u32);

/// Number of pre-roll frames to skip before starting output.
#[derive(Resource, Default)]
pub struct PreRollFrames(pub u32);

/// Frame rate limiter to control output FPS.
#[derive(Resource)]
pub struct FrameRateLimiter {
    pub last_frame_time: std::time::Instant,
    pub min_frame_interval: Duration,
}

impl FrameRateLimiter {
    pub fn new(target_fps: f64) -> Self {
        Self {
            last_frame_time: std::time::Instant::now(),
            min_frame_interval: Duration::from_secs_f64(1.0 / target_fps),
        }
    }

    /// True once the minimum interval has elapsed; arms the next one.
    pub fn ready(&mut self) -> bool {
        let now = std::time::Instant::now();
        if now.duration_since(self.last_frame_time) < self.min_frame_interval {
            return false;
        }
        self.last_frame_time = now;
        true
    }
}

impl Default for FrameRateLimiter {
    fn default() -> Self {
        Self::new(config::TARGET_FPS)
    }
}

/// Rolling frame timings for the stats log.
#[derive(Resource, Default)]
pub struct FrameTimings {
    pub last_log_time: f64,
    pub frame_times: Vec<f64>,
}

// =============================================================================
// Channel Communication (Main World <-> Render World)
// =============================================================================

use crossbeam_channel::{Receiver, Sender};

/// Receives copied frame bytes from the render world.
#[derive(Resource, Deref)]
pub struct MainWorldReceiver(pub Receiver<Vec<u8>>);

/// Sends copied frame bytes to the main world.
#[derive(Resource, Deref)]
pub struct RenderWorldSender(pub Sender<Vec<u8>>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        let surface = SurfaceSize {
            width: 800,
            height: 600,
        };
        assert_eq!(surface.aspect(), 800.0 / 600.0);
    }

    #[test]
    fn test_limiter_blocks_within_interval() {
        let mut limiter = FrameRateLimiter::new(1.0);
        // armed at construction; a second call inside the 1s window must block
        assert!(!limiter.ready());
    }
}
