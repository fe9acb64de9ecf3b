//! ECS Components for the skyhop scene.

use bevy::prelude::*;
use uuid::Uuid;

/// Marker component for the main camera.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MainCamera;

/// Game camera component mirroring the scene's follow camera.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct GameCamera {
    /// Current view centre in scene coordinates (y down).
    pub center: Vec2,
    /// Offset applied by the reactive framing.
    pub offset: Vec2,
}

/// Marker for the player sprite.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerSprite;

/// Sprite of one collectible, keyed by the collectible's id.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectibleSprite {
    pub id: Uuid,
}

/// Marker for the static platform sprite.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlatformSprite;

/// Marker for the diagnostics text.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct HudText;

/// Converts scene coordinates (y down) to Bevy world coordinates (y up).
pub fn to_world(position: Vec2, z: f32) -> Vec3 {
    Vec3::new(position.x, -position.y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_world_flips_y() {
        assert_eq!(to_world(Vec2::new(10.0, 20.0), 1.0), Vec3::new(10.0, -20.0, 1.0));
    }
}
