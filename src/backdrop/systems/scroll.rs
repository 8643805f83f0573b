//! Scroll-driven camera and rotation updates
//!
//! Consumes the scroll events queued by the page and maps them onto the
//! scene: the camera dollies back and drifts sideways as a function of the
//! absolute page offset, while the moon and avatar pick up a fixed
//! rotation step per event.

use bevy::prelude::*;

use crate::backdrop::components::{EulerAngles, ScrollCamera, ScrollSpin};
use crate::backdrop::resources::ScrollInputRes;
use crate::config::scroll::{CAMERA_HOME_Z, DOLLY_PER_PIXEL, DRIFT_PER_PIXEL};

/// Camera placement derived from a page offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
}

/// Map a page offset to the camera placement.
///
/// Absolute and deterministic: the same offset always produces the same
/// pose. At offset 0 the camera sits at its home distance on +Z.
pub fn camera_pose(offset: f32) -> CameraPose {
    CameraPose {
        position: Vec3::new(
            offset * DRIFT_PER_PIXEL,
            0.0,
            CAMERA_HOME_Z + offset * DOLLY_PER_PIXEL,
        ),
        yaw: offset * DRIFT_PER_PIXEL,
    }
}

/// Consume queued scroll events.
///
/// Rotation steps apply once per queued event; the camera pose is an
/// idempotent set from the latest offset. Events coalesced between ticks
/// therefore land exactly as if each had been handled synchronously.
pub fn apply_scroll(
    scroll: Option<Res<ScrollInputRes>>,
    mut spinners: Query<(&mut EulerAngles, &ScrollSpin)>,
    mut cameras: Query<&mut Transform, With<ScrollCamera>>,
) {
    let Some(scroll) = scroll else { return };

    let (offset, events) = {
        let Ok(mut guard) = scroll.0 .0.lock() else {
            return;
        };
        guard.drain()
    };
    if events == 0 {
        return;
    }

    for (mut euler, spin) in spinners.iter_mut() {
        for _ in 0..events {
            euler.0 += spin.0;
        }
    }

    let pose = camera_pose(offset);
    for mut transform in cameras.iter_mut() {
        transform.translation = pose.position;
        transform.rotation = Quat::from_rotation_y(pose.yaw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::shared_state::{ScrollInput, SharedScrollInput};
    use crate::config::scroll::{AVATAR_STEP, MOON_STEP};

    fn scroll_app(input: ScrollInput) -> (App, SharedScrollInput) {
        let shared = SharedScrollInput::default();
        *shared.0.lock().unwrap() = input;

        let mut app = App::new();
        app.add_systems(Update, apply_scroll);
        app.insert_resource(ScrollInputRes(shared.clone()));
        (app, shared)
    }

    #[test]
    fn test_camera_pose_tracks_offset() {
        for t in [0.0_f32, -1.0, -250.0, -1000.0, 500.0] {
            let pose = camera_pose(t);
            assert_eq!(pose.position.z, CAMERA_HOME_Z + t * DOLLY_PER_PIXEL);
            assert_eq!(pose.position.x, t * DRIFT_PER_PIXEL);
            assert_eq!(pose.position.y, 0.0);
            assert_eq!(pose.yaw, t * DRIFT_PER_PIXEL);
        }
    }

    #[test]
    fn test_camera_pose_deep_scroll() {
        // t = -1000: dollied back to 25, drifted to 0.2, yawed by 0.2
        let pose = camera_pose(-1000.0);
        assert_eq!(pose.position.z, 25.0);
        assert!((pose.position.x - 0.2).abs() < 1e-6);
        assert!((pose.yaw - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_camera_pose_is_idempotent() {
        assert_eq!(camera_pose(-321.5), camera_pose(-321.5));
    }

    #[test]
    fn test_two_events_accumulate_rotation() {
        let (mut app, shared) = scroll_app(ScrollInput {
            offset: 0.0,
            pending: 0,
        });
        let moon = app
            .world_mut()
            .spawn((EulerAngles::default(), ScrollSpin(MOON_STEP)))
            .id();

        shared.0.lock().unwrap().record(0.0);
        app.update();
        shared.0.lock().unwrap().record(0.0);
        app.update();

        let euler = app.world().get::<EulerAngles>(moon).unwrap();
        assert_eq!(euler.0.x, 0.1);
        assert_eq!(euler.0.y, 0.15);
        assert_eq!(euler.0.z, 0.1);
    }

    #[test]
    fn test_coalesced_events_apply_per_event() {
        let (mut app, shared) = scroll_app(ScrollInput {
            offset: 0.0,
            pending: 0,
        });
        let avatar = app
            .world_mut()
            .spawn((EulerAngles::default(), ScrollSpin(AVATAR_STEP)))
            .id();
        let camera = app
            .world_mut()
            .spawn((Transform::default(), ScrollCamera))
            .id();

        // three events land between ticks; the last offset wins
        {
            let mut guard = shared.0.lock().unwrap();
            guard.record(-100.0);
            guard.record(-200.0);
            guard.record(-1000.0);
        }
        app.update();

        let euler = app.world().get::<EulerAngles>(avatar).unwrap();
        assert_eq!(euler.0.y, 0.01 + 0.01 + 0.01);
        assert_eq!(euler.0.z, 0.01 + 0.01 + 0.01);

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert_eq!(transform.translation.z, 25.0);
        assert_eq!(
            transform.rotation,
            Quat::from_rotation_y(camera_pose(-1000.0).yaw)
        );
    }

    #[test]
    fn test_startup_event_places_camera_home() {
        // the default scroll input carries one queued event at offset 0
        let (mut app, _shared) = scroll_app(ScrollInput::default());
        let camera = app
            .world_mut()
            .spawn((Transform::default(), ScrollCamera))
            .id();

        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert_eq!(transform.translation, Vec3::new(0.0, 0.0, CAMERA_HOME_Z));
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_no_pending_events_leaves_scene_alone() {
        let (mut app, _shared) = scroll_app(ScrollInput {
            offset: -500.0,
            pending: 0,
        });
        let camera = app
            .world_mut()
            .spawn((Transform::from_xyz(1.0, 2.0, 3.0), ScrollCamera))
            .id();

        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
    }
}
