//! ECS Messages for the skyhop scene.
//!
//! Note: In Bevy 0.18+, buffered events use Message trait instead of Event.

use bevy::prelude::*;

use crate::scene::SceneHandle;

/// Message fired once the scene has been built.
#[derive(Message, Debug, Clone)]
pub struct SceneReadyEvent {
    /// Handle for spawning collectibles and reading diagnostics.
    pub handle: SceneHandle,
}
