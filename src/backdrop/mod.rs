//! Headless Bevy backdrop
//!
//! The 3D scene behind the page: components, resources, systems, the
//! GPU-to-CPU frame copy plugin, and application setup.

pub mod app;
pub mod components;
pub mod plugins;
pub mod resources;
pub mod systems;

pub use app::start_backdrop;
