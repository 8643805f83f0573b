//! Idle animation
//!
//! Advances every spinning object by its per-tick rotation step. Steps are
//! fixed per tick rather than time-scaled; the schedule runner's loop
//! interval bounds the tick rate.

use bevy::prelude::*;

use crate::backdrop::components::{EulerAngles, FrameSpin};

/// Advance the per-tick rotations.
pub fn advance_spin(mut query: Query<(&mut EulerAngles, &FrameSpin)>) {
    for (mut euler, spin) in query.iter_mut() {
        euler.0 += spin.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::spin::{MOON_STEP, TORUS_STEP};

    fn spin_app() -> App {
        let mut app = App::new();
        app.add_systems(Update, advance_spin);
        app
    }

    #[test]
    fn test_one_tick_advances_by_exact_steps() {
        let mut app = spin_app();
        let torus = app
            .world_mut()
            .spawn((EulerAngles::default(), FrameSpin(TORUS_STEP)))
            .id();
        let moon = app
            .world_mut()
            .spawn((EulerAngles::default(), FrameSpin(MOON_STEP)))
            .id();

        app.update();

        let torus_euler = app.world().get::<EulerAngles>(torus).unwrap();
        assert_eq!(torus_euler.0.x, 0.01);
        assert_eq!(torus_euler.0.y, 0.005);
        assert_eq!(torus_euler.0.z, 0.01);

        let moon_euler = app.world().get::<EulerAngles>(moon).unwrap();
        assert_eq!(moon_euler.0.x, 0.005);
        assert_eq!(moon_euler.0.y, 0.0);
        assert_eq!(moon_euler.0.z, 0.0);
    }

    #[test]
    fn test_ticks_accumulate() {
        let mut app = spin_app();
        let torus = app
            .world_mut()
            .spawn((EulerAngles::default(), FrameSpin(TORUS_STEP)))
            .id();

        app.update();
        app.update();

        let euler = app.world().get::<EulerAngles>(torus).unwrap();
        assert_eq!(euler.0.x, 0.02);
        assert_eq!(euler.0.y, 0.01);
        assert_eq!(euler.0.z, 0.02);
    }

    #[test]
    fn test_objects_without_spin_stay_put() {
        let mut app = spin_app();
        let fixed = app.world_mut().spawn(EulerAngles::default()).id();

        app.update();

        let euler = app.world().get::<EulerAngles>(fixed).unwrap();
        assert_eq!(euler.0, Vec3::ZERO);
    }
}
