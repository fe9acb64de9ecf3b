//! ECS Resources for the skyhop scene.

use std::sync::Arc;

use bevy::prelude::*;

use crate::config::SceneConfig;
use crate::frame::InputState;
use crate::scene::{Scene, SceneHandle};

/// Configuration the scene is built from at startup.
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneSettings(pub SceneConfig);

/// The running scene. Absent until startup succeeds.
#[derive(Resource, Debug)]
pub struct ActiveScene(pub Scene);

/// Callback invoked with the scene handle once the scene is ready.
pub type ReadyCallback = Arc<dyn Fn(SceneHandle) + Send + Sync>;

/// Optional shell hook run when the scene becomes ready.
#[derive(Resource, Clone)]
pub struct ReadyHook(pub ReadyCallback);

/// Keys mapped to each player action.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![KeyCode::ArrowLeft, KeyCode::KeyA],
            right: vec![KeyCode::ArrowRight, KeyCode::KeyD],
            jump: vec![KeyCode::ArrowUp, KeyCode::KeyW, KeyCode::Space],
        }
    }
}

impl KeyBindings {
    /// Held state of every action.
    pub fn read(&self, keys: &ButtonInput<KeyCode>) -> InputState {
        InputState {
            left: keys.any_pressed(self.left.iter().copied()),
            right: keys.any_pressed(self.right.iter().copied()),
            jump: keys.any_pressed(self.jump.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings_read_held_keys() {
        let bindings = KeyBindings::default();
        let mut keys = ButtonInput::<KeyCode>::default();
        assert_eq!(bindings.read(&keys), InputState::NONE);

        keys.press(KeyCode::KeyA);
        keys.press(KeyCode::Space);

        assert_eq!(bindings.read(&keys), InputState::left().with_jump(true));
    }
}
