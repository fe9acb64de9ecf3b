//! Bevy host for the skyhop scene.
//!
//! Runs the scene tick in `FixedUpdate` and mirrors scene state into
//! sprites and the camera transform.

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(all(target_arch = "wasm32", feature = "windowed"))]
pub mod wasm_entry;

#[cfg(all(target_arch = "wasm32", feature = "windowed"))]
pub use wasm_entry::*;

pub use components::*;
pub use events::*;
pub use plugin::{SkyhopHeadlessPlugin, SkyhopPlugin};
pub use resources::*;
