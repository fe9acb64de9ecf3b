//! Skyhop Core Library
//!
//! Gameplay logic for a small platformer: a player with a charged
//! multi-jump, falling collectibles and a camera that reframes itself from
//! the player's motion. Physics runs on `Rapier2D`; the [`bevy`] module
//! hosts the scene inside a Bevy app.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod body;
pub mod camera;
pub mod collectible;
pub mod config;
pub mod frame;
pub mod physics;
pub mod player;
pub mod scene;
pub mod tween;

// Bevy integration
pub mod bevy;

pub use body::{Body, RapierBody};
pub use camera::{CameraReactivity, CameraState, FollowCamera, MotionX, MotionY};
pub use collectible::Collectible;
pub use config::{ConfigError, SceneConfig, WorldConfig};
pub use frame::{FrameTime, InputState};
pub use physics::{PHYSICS_DT, PhysicsWorld};
pub use player::{Player, PlayerOptions, PlayerSnapshot};
pub use scene::{Scene, SceneCommand, SceneHandle, SceneStatus};
pub use tween::{EasingType, Tween};
