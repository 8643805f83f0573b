//! Frame capture and publishing
//!
//! Drains frame bytes copied out of the render world, strips the GPU row
//! padding, and publishes the result into the shared frame buffer for the
//! bridge to serve. Output is paced to the target FPS and skipped during
//! the pre-roll window while the scene stabilizes.

use bevy::{prelude::*, render::renderer::RenderDevice, time::Time};
use std::time::Instant;
use tracing::debug;

use crate::backdrop::resources::{
    FrameBufferRes, FrameCount, FrameRateLimiter, FrameTimings, MainWorldReceiver, PreRollFrames,
    RenderStatsRes, SurfaceSize,
};
use crate::bridge::shared_state::FramePixels;
use crate::config::stats::{FRAME_TIMING_SAMPLES, LOG_INTERVAL};

/// Publish the latest rendered frame to the bridge.
pub fn publish_frames(
    receiver: Res<MainWorldReceiver>,
    buffer: Option<Res<FrameBufferRes>>,
    stats: Option<Res<RenderStatsRes>>,
    surface: Res<SurfaceSize>,
    mut count: ResMut<FrameCount>,
    mut pre_roll: ResMut<PreRollFrames>,
    mut timings: ResMut<FrameTimings>,
    mut limiter: ResMut<FrameRateLimiter>,
    time: Res<Time>,
) {
    let Some(buffer) = buffer else { return };

    // Let the scene settle before publishing anything
    if pre_roll.0 > 0 {
        while receiver.try_recv().is_ok() {}
        pre_roll.0 -= 1;
        return;
    }

    if !limiter.ready() {
        while receiver.try_recv().is_ok() {}
        return;
    }

    let frame_start = Instant::now();

    // Keep only the newest frame if several queued up
    let mut raw = Vec::new();
    while let Ok(data) = receiver.try_recv() {
        raw = data;
    }
    let copy_ms = frame_start.elapsed().as_secs_f64() * 1000.0;

    if raw.is_empty() {
        return;
    }

    let unpad_start = Instant::now();
    let Some(rgba) = strip_row_padding(&raw, surface.width, surface.height) else {
        // a frame that crossed the channel mid-resize; its size no longer
        // matches the surface, so it cannot be labeled correctly
        debug!(len = raw.len(), "dropping frame with stale dimensions");
        return;
    };
    let unpad_ms = unpad_start.elapsed().as_secs_f64() * 1000.0;
    let frame_kb = rgba.len() as f64 / 1024.0;

    let publish_start = Instant::now();
    if let Ok(mut guard) = buffer.0 .0.lock() {
        *guard = Some(FramePixels {
            data: rgba,
            width: surface.width,
            height: surface.height,
        });
        count.0 += 1;
    }
    let publish_ms = publish_start.elapsed().as_secs_f64() * 1000.0;
    let total_ms = frame_start.elapsed().as_secs_f64() * 1000.0;

    timings.frame_times.push(total_ms);
    if timings.frame_times.len() > FRAME_TIMING_SAMPLES {
        timings.frame_times.remove(0);
    }
    let avg_ms =
        timings.frame_times.iter().sum::<f64>() / timings.frame_times.len() as f64;

    if let Some(stats) = &stats {
        if let Ok(mut stats) = stats.0 .0.lock() {
            stats.copy_ms = copy_ms;
            stats.unpad_ms = unpad_ms;
            stats.publish_ms = publish_ms;
            stats.frame_count = count.0;
            stats.frame_kb = frame_kb;
            stats.backdrop_fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };
        }
    }

    let now = time.elapsed_secs_f64();
    if now - timings.last_log_time >= LOG_INTERVAL {
        debug!(
            frame = count.0,
            copy_ms, unpad_ms, publish_ms, avg_ms, frame_kb, "frame published"
        );
        timings.last_log_time = now;
    }
}

/// Remove GPU copy-buffer row padding, returning tightly packed RGBA.
///
/// Returns `None` when `data` does not match the padded size implied by
/// the dimensions, which happens for frames produced just before a resize
/// landed.
pub fn strip_row_padding(data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    if data.is_empty() {
        return None;
    }

    let row_bytes = width as usize * 4;
    let aligned_row_bytes = RenderDevice::align_copy_bytes_per_row(row_bytes);
    if data.len() != aligned_row_bytes * height as usize {
        return None;
    }

    if row_bytes == aligned_row_bytes {
        return Some(data.to_vec());
    }

    Some(
        data.chunks(aligned_row_bytes)
            .flat_map(|row| &row[..row_bytes])
            .copied()
            .collect(),
    )
}
