//! Euler-to-transform sync
//!
//! Writes the accumulated Euler state into entity transforms once per
//! tick, after every mutator has run. The renderer only ever sees the
//! quaternion; the unbounded angles stay in `EulerAngles`.

use bevy::math::EulerRot;
use bevy::prelude::*;

use crate::backdrop::components::EulerAngles;

/// Convert Euler state (radians, XYZ order) into the entity `Transform`.
pub fn sync_rotations(mut query: Query<(&EulerAngles, &mut Transform), Changed<EulerAngles>>) {
    for (euler, mut transform) in query.iter_mut() {
        transform.rotation = Quat::from_euler(EulerRot::XYZ, euler.0.x, euler.0.y, euler.0.z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_uses_xyz_order() {
        let mut app = App::new();
        app.add_systems(Update, sync_rotations);

        let entity = app
            .world_mut()
            .spawn((EulerAngles(Vec3::new(0.3, -1.2, 7.0)), Transform::default()))
            .id();

        app.update();

        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(
            transform.rotation,
            Quat::from_euler(EulerRot::XYZ, 0.3, -1.2, 7.0)
        );
    }

    #[test]
    fn test_unchanged_angles_are_skipped() {
        let mut app = App::new();
        app.add_systems(Update, sync_rotations);

        let entity = app
            .world_mut()
            .spawn((EulerAngles(Vec3::X), Transform::default()))
            .id();

        app.update();

        // overwrite the transform out of band; with no Euler change the
        // sync system must not touch it again
        app.world_mut()
            .get_mut::<Transform>(entity)
            .unwrap()
            .rotation = Quat::IDENTITY;
        app.update();

        let transform = app.world().get::<Transform>(entity).unwrap();
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }
}
