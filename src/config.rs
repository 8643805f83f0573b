//! Configuration constants for the backdrop
//!
//! Surface defaults, loop pacing, and the scroll/spin coefficients that
//! define the backdrop's motion.

use bevy::math::Vec3;

/// Width of the offscreen render target in pixels, until the first resize
pub const SURFACE_WIDTH: u32 = 1280;

/// Height of the offscreen render target in pixels, until the first resize
pub const SURFACE_HEIGHT: u32 = 800;

/// Target ticks per second for the Bevy render loop
pub const TARGET_FPS: f64 = 60.0;

/// Number of pre-roll frames to skip before starting output
/// This allows the scene to fully load and stabilize
pub const PRE_ROLL_FRAMES: u32 = 30;

/// Scroll-to-camera mapping
pub mod scroll {
    use super::Vec3;

    /// Camera distance along +Z when the page is at the top
    pub const CAMERA_HOME_Z: f32 = 15.0;

    /// Camera dolly per pixel of scroll offset (applied to Z)
    pub const DOLLY_PER_PIXEL: f32 = -0.01;

    /// Sideways drift and yaw per pixel of scroll offset
    pub const DRIFT_PER_PIXEL: f32 = -0.0002;

    /// Moon rotation step per scroll event (radians, XYZ)
    pub const MOON_STEP: Vec3 = Vec3::new(0.05, 0.075, 0.05);

    /// Avatar rotation step per scroll event (radians, XYZ)
    pub const AVATAR_STEP: Vec3 = Vec3::new(0.0, 0.01, 0.01);
}

/// Per-tick idle animation
pub mod spin {
    use super::Vec3;

    /// Torus rotation step per tick (radians, XYZ)
    pub const TORUS_STEP: Vec3 = Vec3::new(0.01, 0.005, 0.01);

    /// Moon rotation step per tick (radians, XYZ)
    pub const MOON_STEP: Vec3 = Vec3::new(0.005, 0.0, 0.0);
}

/// Camera projection settings
pub mod camera {
    /// Vertical field of view (degrees)
    pub const FOV_DEGREES: f32 = 75.0;

    /// Near clipping plane
    pub const NEAR: f32 = 0.1;

    /// Far clipping plane
    pub const FAR: f32 = 1000.0;
}

/// Performance monitoring settings
pub mod stats {
    /// Interval between render-stats log lines (seconds)
    pub const LOG_INTERVAL: f64 = 2.0;

    /// Number of frame timing samples to keep for averaging
    pub const FRAME_TIMING_SAMPLES: usize = 60;
}

/// Image compression settings
pub mod compression {
    /// JPEG quality level (0-100, higher = better quality but larger size)
    pub const JPEG_QUALITY: u8 = 85;
}
