//! Scene lifecycle and fixed-step simulation systems.

use bevy::prelude::*;

use crate::bevy::events::SceneReadyEvent;
use crate::bevy::resources::{ActiveScene, KeyBindings, ReadyHook, SceneSettings};
use crate::frame::FrameTime;
use crate::scene::Scene;

/// Builds the scene from [`SceneSettings`] and announces it.
///
/// On invalid configuration the error is logged and no scene is inserted;
/// the remaining systems then do nothing.
pub fn setup_scene(
    mut commands: Commands,
    settings: Res<SceneSettings>,
    hook: Option<Res<ReadyHook>>,
    mut ready: MessageWriter<SceneReadyEvent>,
) {
    let result = Scene::create(settings.0.clone(), |handle| {
        if let Some(hook) = &hook {
            (hook.0)(handle.clone());
        }
        ready.write(SceneReadyEvent { handle });
    });

    match result {
        Ok(scene) => {
            tracing::info!("[scene] scene inserted");
            commands.insert_resource(ActiveScene(scene));
        }
        Err(e) => {
            tracing::error!("[scene] failed to create scene: {}", e);
        }
    }
}

/// Advances the scene by one fixed tick.
///
/// Without keyboard input available the player skips its update.
pub fn tick_scene(
    scene: Option<ResMut<ActiveScene>>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<KeyBindings>,
    time: Res<Time<Fixed>>,
) {
    let Some(mut scene) = scene else {
        return;
    };

    let input = keys.map(|keys| bindings.read(&keys));
    let frame = FrameTime::new(time.elapsed_secs_f64(), time.delta_secs());
    scene.0.tick(input, frame);
}
