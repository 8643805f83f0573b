//! Backdrop component definitions

use bevy::prelude::*;

/// Unbounded Euler-angle orientation in radians, XYZ order.
///
/// Rotation state is kept as additive Euler angles rather than a
/// quaternion: every update is a plain vector add, and the angles grow
/// without wrapping. A sync system writes the equivalent quaternion into
/// the entity's `Transform` after all mutators have run.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct EulerAngles(pub Vec3);

/// Rotation step applied every tick.
#[derive(Component)]
pub struct FrameSpin(pub Vec3);

/// Rotation step applied once per scroll event.
#[derive(Component)]
pub struct ScrollSpin(pub Vec3);

/// Marker for the camera whose pose follows the page scroll offset.
#[derive(Component)]
pub struct ScrollCamera;
