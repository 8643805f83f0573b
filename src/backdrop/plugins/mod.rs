//! Backdrop plugins

pub mod frame_copy;

pub use frame_copy::FrameCopyPlugin;
