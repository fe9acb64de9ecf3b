//! Systems for the skyhop scene.
//!
//! Organized by functionality:
//! - scene: Scene creation and the fixed-step tick
//! - camera: Follow camera mirroring
//! - rendering: Sprite and HUD sync

pub mod camera;
pub mod rendering;
pub mod scene;

pub use camera::*;
pub use rendering::*;
pub use scene::*;
