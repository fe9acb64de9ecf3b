//! Bevy plugins for the skyhop scene.
//!
//! Provides:
//! - `SkyhopHeadlessPlugin`: Logic-only plugin (no rendering/window dependencies) for
//!   headless testing
//! - `SkyhopPlugin`: Full plugin including `SkyhopHeadlessPlugin` + rendering systems

use bevy::prelude::*;

use crate::bevy::events::SceneReadyEvent;
use crate::bevy::resources::{KeyBindings, ReadyCallback, ReadyHook, SceneSettings};
use crate::bevy::systems;
use crate::config::SceneConfig;
use crate::physics::PHYSICS_DT;

// ============================================================================
// Headless Plugin (logic only, no rendering/window dependencies)
// ============================================================================

/// Headless plugin containing the scene logic without rendering or window dependencies.
///
/// Use this plugin in tests with `MinimalPlugins` to run the scene
/// without requiring a windowing or rendering backend.
///
/// Excluded systems (rendering-dependent):
/// - Camera2d spawning (setup_game_camera)
/// - Sprite and HUD sync (needs `AssetServer`)
/// - Camera transform application
#[derive(Default)]
pub struct SkyhopHeadlessPlugin {
    pub config: SceneConfig,
    pub on_ready: Option<ReadyCallback>,
}

impl Plugin for SkyhopHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Fixed timestep
        // ====================================================================
        app.insert_resource(Time::<Fixed>::from_seconds(f64::from(PHYSICS_DT)));

        // ====================================================================
        // Resources
        // ====================================================================
        app.insert_resource(SceneSettings(self.config.clone()))
            .init_resource::<KeyBindings>();

        if let Some(on_ready) = &self.on_ready {
            app.insert_resource(ReadyHook(on_ready.clone()));
        }

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<SceneReadyEvent>();

        // ====================================================================
        // Scene lifecycle and simulation
        // ====================================================================
        app.add_systems(Startup, systems::setup_scene);
        app.add_systems(FixedUpdate, systems::tick_scene);

        // Camera logic (no Window/Projection dependency)
        app.add_systems(Update, systems::update_game_camera);

        // WASM exit system
        #[cfg(all(target_arch = "wasm32", feature = "windowed"))]
        app.add_systems(Update, crate::bevy::wasm_entry::check_exit_system);
    }
}

// ============================================================================
// Full Plugin (headless + rendering)
// ============================================================================

/// Full plugin: `SkyhopHeadlessPlugin` plus sprites, HUD and the camera transform.
#[derive(Default)]
pub struct SkyhopPlugin {
    pub config: SceneConfig,
    pub on_ready: Option<ReadyCallback>,
}

impl SkyhopPlugin {
    pub fn new(config: SceneConfig, on_ready: ReadyCallback) -> Self {
        Self {
            config,
            on_ready: Some(on_ready),
        }
    }
}

impl Plugin for SkyhopPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Headless logic
        // ====================================================================
        app.add_plugins(SkyhopHeadlessPlugin {
            config: self.config.clone(),
            on_ready: self.on_ready.clone(),
        });

        // ====================================================================
        // Startup rendering (needs Camera2d/AssetServer)
        // ====================================================================
        app.add_systems(
            Startup,
            (systems::setup_game_camera, systems::spawn_scene_sprites)
                .chain()
                .after(systems::setup_scene),
        );

        // ====================================================================
        // Per-frame rendering
        // ====================================================================
        app.add_systems(
            Update,
            (
                systems::sync_player_sprite,
                systems::sync_collectible_sprites,
                systems::apply_camera_transform.after(systems::update_game_camera),
                systems::update_hud.after(systems::update_game_camera),
            ),
        );
    }
}
