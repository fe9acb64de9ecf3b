//! Sprite and HUD rendering systems.
//!
//! Sprites are spawned and despawned to mirror the scene each frame.
//! Positions go through [`to_world`] since the scene's y axis points down.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::bevy::components::{
    CollectibleSprite, GameCamera, HudText, MainCamera, PlatformSprite, PlayerSprite, to_world,
};
use crate::bevy::resources::ActiveScene;
use crate::collectible::COLLECTIBLE_RADIUS;
use crate::scene::PLAYER_RADIUS;

/// Texture key for collectibles.
pub const COLLECTIBLE_TEXTURE: &str = "star";

const PLATFORM_Z: f32 = 0.0;
const COLLECTIBLE_Z: f32 = 1.0;
const PLAYER_Z: f32 = 2.0;
const HUD_Z: f32 = 10.0;
const HUD_MARGIN: Vec2 = Vec2::new(160.0, 24.0);

/// Image path for a texture key.
pub fn texture_path(key: &str) -> String {
    format!("{key}.png")
}

/// Image sprite drawn at the diameter of a circular collider.
fn round_sprite(image: Handle<Image>, radius: f32) -> Sprite {
    let mut sprite = Sprite::from_image(image);
    sprite.custom_size = Some(Vec2::splat(radius * 2.0));
    sprite
}

pub fn setup_game_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera, GameCamera::default()));
    tracing::info!("[render] game camera spawned");
}

/// Spawns the platform, player and HUD sprites once the scene exists.
pub fn spawn_scene_sprites(
    mut commands: Commands,
    scene: Option<Res<ActiveScene>>,
    asset_server: Res<AssetServer>,
) {
    let Some(scene) = scene else {
        return;
    };
    let scene = &scene.0;

    let platform = scene.platform();
    commands.spawn((
        PlatformSprite,
        Sprite::from_color(Color::srgb(0.35, 0.3, 0.45), platform.size),
        Transform::from_translation(to_world(platform.center, PLATFORM_Z)),
    ));

    if let (Some(player), Some(position)) = (scene.player(), scene.player_position()) {
        let image = asset_server.load(texture_path(player.texture()));
        commands.spawn((
            PlayerSprite,
            round_sprite(image, PLAYER_RADIUS),
            Transform::from_translation(to_world(position, PLAYER_Z)),
        ));
    }

    commands.spawn((
        HudText,
        Text2d::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_xyz(0.0, 0.0, HUD_Z),
    ));

    tracing::info!("[render] scene sprites spawned");
}

pub fn sync_player_sprite(
    scene: Option<Res<ActiveScene>>,
    mut sprites: Query<&mut Transform, With<PlayerSprite>>,
) {
    let Some(scene) = scene else {
        return;
    };
    let (Some(player), Some(position)) = (scene.0.player(), scene.0.player_position()) else {
        return;
    };

    for mut transform in &mut sprites {
        transform.translation = to_world(position, PLAYER_Z);
        transform.rotation = Quat::from_rotation_z(-player.rotation());
    }
}

/// Spawns sprites for new collectibles, moves existing ones and despawns
/// sprites whose collectible is gone.
pub fn sync_collectible_sprites(
    mut commands: Commands,
    scene: Option<Res<ActiveScene>>,
    asset_server: Res<AssetServer>,
    mut sprites: Query<(Entity, &CollectibleSprite, &mut Transform)>,
) {
    let Some(scene) = scene else {
        return;
    };

    let mut pending: Vec<_> = scene.0.collectibles().collect();
    let mut seen = HashSet::with_capacity(pending.len());

    for (entity, marker, mut transform) in &mut sprites {
        if let Some(view) = pending.iter().find(|view| view.id == marker.id) {
            transform.translation = to_world(view.position, COLLECTIBLE_Z);
            transform.rotation = Quat::from_rotation_z(-view.rotation);
            seen.insert(marker.id);
        } else {
            commands.entity(entity).despawn();
        }
    }

    pending.retain(|view| !seen.contains(&view.id));
    for view in pending {
        commands.spawn((
            CollectibleSprite { id: view.id },
            round_sprite(
                asset_server.load(texture_path(COLLECTIBLE_TEXTURE)),
                COLLECTIBLE_RADIUS,
            ),
            Transform::from_translation(to_world(view.position, COLLECTIBLE_Z)),
        ));
    }
}

/// Writes player diagnostics into the HUD and pins it to the view corner.
pub fn update_hud(
    scene: Option<Res<ActiveScene>>,
    cameras: Query<&GameCamera, With<MainCamera>>,
    mut hud: Query<(&mut Text2d, &mut Transform), With<HudText>>,
) {
    let Some(scene) = scene else {
        return;
    };
    let Ok(camera) = cameras.single() else {
        return;
    };

    let world = scene.0.config().world;
    let corner = camera.center - Vec2::new(world.width, world.height) / 2.0 + HUD_MARGIN;
    let status = scene.0.handle().status();

    let line = match status.player {
        Some(player) => format!(
            "jumps {}/{}  charge {:.2}  {}\ncamera {:?}/{:?}  collectibles {}",
            player.jump_count,
            player.max_jumps,
            player.charge_level,
            if player.grounded { "grounded" } else { "airborne" },
            status.camera.x,
            status.camera.y,
            status.collectibles,
        ),
        None => String::new(),
    };

    for (mut text, mut transform) in &mut hud {
        **text = line.clone();
        transform.translation = to_world(corner, HUD_Z);
    }
}
