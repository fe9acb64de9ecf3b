//! Camera systems.
//!
//! The scene owns the follow camera; these systems mirror it into the
//! `GameCamera` component and from there into the camera transform.

use bevy::prelude::*;

use crate::bevy::components::to_world;
use crate::bevy::resources::ActiveScene;
use crate::bevy::{GameCamera, MainCamera};

/// System to copy the scene's follow camera into `GameCamera`.
pub fn update_game_camera(
    scene: Option<Res<ActiveScene>>,
    mut cameras: Query<&mut GameCamera, With<MainCamera>>,
) {
    let Some(scene) = scene else {
        return;
    };

    for mut game_camera in &mut cameras {
        game_camera.center = scene.0.camera_center();
        game_camera.offset = scene.0.camera().offset();
    }
}

/// System to apply the `GameCamera` centre to the camera transform.
pub fn apply_camera_transform(
    mut cameras: Query<(&GameCamera, &mut Transform), With<MainCamera>>,
) {
    for (game_camera, mut transform) in &mut cameras {
        let z = transform.translation.z;
        transform.translation = to_world(game_camera.center, z);
    }
}
