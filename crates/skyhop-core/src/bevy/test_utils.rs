//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `SkyhopHeadlessPlugin` for testing the scene
//! without a rendering or windowing backend.

use bevy::prelude::*;

use crate::bevy::plugin::SkyhopHeadlessPlugin;
use crate::bevy::resources::{ActiveScene, ReadyCallback};
use crate::config::SceneConfig;
use crate::physics::PHYSICS_DT;
use crate::scene::SceneHandle;

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Create a new test app with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default(), None)
    }

    /// Create a new test app with a specific configuration and ready hook.
    pub fn with_config(config: SceneConfig, on_ready: Option<ReadyCallback>) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::input::InputPlugin);
        app.add_plugins(SkyhopHeadlessPlugin { config, on_ready });
        // Pause virtual time so that only explicit advance_by calls
        // advance the simulation.
        app.world_mut()
            .resource_mut::<Time<Virtual>>()
            .pause();
        // Run one update to run startup systems
        app.update();
        Self { app }
    }

    /// Advance the simulation by exactly `n` fixed timesteps.
    ///
    /// Uses `Time<Fixed>::accumulate_overstep` to feed time directly into
    /// the fixed-timestep accumulator, bypassing virtual time.
    pub fn step_physics(&mut self, n: usize) {
        let dt = std::time::Duration::from_secs_f32(PHYSICS_DT);
        for _ in 0..n {
            self.app
                .world_mut()
                .resource_mut::<Time<Fixed>>()
                .accumulate_overstep(dt);
            self.app.update();
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        self.app
            .world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.app
            .world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .release(key);
    }

    /// Handle of the running scene.
    pub fn handle(&self) -> SceneHandle {
        self.scene().0.handle()
    }

    pub fn scene(&self) -> &ActiveScene {
        self.app.world().resource::<ActiveScene>()
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
