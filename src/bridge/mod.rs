//! Bridge layer between the Tauri shell and the Bevy backdrop
//!
//! Everything that crosses the webview/render boundary lives here: the
//! shared state cells, the IPC command handlers, and the `frame://`
//! protocol that ships frames to the page.

pub mod commands;
pub mod error;
pub mod protocol;
pub mod shared_state;

pub use error::BridgeError;
pub use shared_state::BridgeState;
