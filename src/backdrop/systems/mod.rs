//! Backdrop systems

pub mod animation;
pub mod capture;
pub mod resize;
pub mod scene;
pub mod scroll;
pub mod sync;

pub use animation::advance_spin;
pub use capture::publish_frames;
pub use resize::apply_surface_resize;
pub use scene::setup_scene;
pub use scroll::apply_scroll;
pub use sync::sync_rotations;
