//! The platformer scene: world geometry, entities and per-tick orchestration.

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::math::Vec2;
use parking_lot::{Mutex, RwLock};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::body::{Body, RapierBody};
use crate::camera::{CameraReactivity, CameraState, FollowCamera};
use crate::collectible::Collectible;
use crate::config::{ConfigError, SceneConfig};
use crate::frame::{FrameTime, InputState};
use crate::physics::{CollisionRules, PhysicsWorld, groups};
use crate::player::{Player, PlayerOptions, PlayerSnapshot};

/// Fraction of the world width covered by the platform.
pub const PLATFORM_WIDTH_RATIO: f32 = 0.8;
pub const PLATFORM_HEIGHT: f32 = 32.0;
/// Distance from the bottom of the world to the platform's top edge.
pub const PLATFORM_TOP_INSET: f32 = 64.0;
/// Radius of the player's circular collider.
pub const PLAYER_RADIUS: f32 = 16.0;
/// Margin kept free of random collectible spawns.
pub const SPAWN_MARGIN: f32 = 64.0;

const PLAYER_RESTITUTION: f32 = 0.1;

/// Commands queued from outside the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneCommand {
    SpawnCollectible { x: f32, y: f32 },
    SpawnRandomCollectible,
}

/// State published after every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneStatus {
    pub player: Option<PlayerSnapshot>,
    pub collectibles: usize,
    pub camera: CameraState,
}

/// Thread-safe handle to a running scene.
///
/// Commands are applied at the start of the next tick.
#[derive(Debug, Clone, Default)]
pub struct SceneHandle {
    commands: Arc<Mutex<VecDeque<SceneCommand>>>,
    status: Arc<RwLock<SceneStatus>>,
}

impl SceneHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: SceneCommand) {
        self.commands.lock().push_back(command);
    }

    pub fn spawn_collectible(&self, x: f32, y: f32) {
        self.push(SceneCommand::SpawnCollectible { x, y });
    }

    pub fn spawn_random_collectible(&self) {
        self.push(SceneCommand::SpawnRandomCollectible);
    }

    /// Latest player diagnostics, `None` before the first tick or after teardown.
    pub fn player(&self) -> Option<PlayerSnapshot> {
        self.status.read().player
    }

    pub fn collectible_count(&self) -> usize {
        self.status.read().collectibles
    }

    pub fn status(&self) -> SceneStatus {
        self.status.read().clone()
    }

    fn drain(&self) -> Vec<SceneCommand> {
        self.commands.lock().drain(..).collect()
    }

    fn publish(&self, status: SceneStatus) {
        *self.status.write() = status;
    }
}

/// Render-facing view of a collectible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectibleView {
    pub id: Uuid,
    pub position: Vec2,
    pub rotation: f32,
}

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

struct PlayerEntity {
    player: Player,
    handle: RigidBodyHandle,
}

pub struct Scene {
    config: SceneConfig,
    world: PhysicsWorld,
    rules: CollisionRules,
    platform: Rect,
    player: Option<PlayerEntity>,
    collectibles: Vec<Collectible>,
    camera: CameraReactivity,
    follow: FollowCamera,
    rng: ChaCha8Rng,
    handle: SceneHandle,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("world", &self.world)
            .field("collectibles", &self.collectibles.len())
            .field("camera", &self.camera.state())
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Builds the scene: platform, player, collision pairs and camera.
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = PhysicsWorld::with_gravity(config.world.gravity);

        let mut rules = CollisionRules::new();
        rules.register(groups::PLAYER, groups::PLATFORM);
        rules.register(groups::COLLECTIBLE, groups::PLATFORM);
        rules.register(groups::COLLECTIBLE, groups::COLLECTIBLE);
        rules.register(groups::PLAYER, groups::COLLECTIBLE);

        let platform = add_platform(&mut world, &rules, config.world.width, config.world.height);

        let spawn = Vec2::new(config.world.width / 2.0, config.world.height / 2.0);
        let player = Player::new(PlayerOptions {
            texture: config.texture.clone(),
            triple_jump: config.triple_jump,
        });
        let handle = add_player_body(&mut world, &rules, spawn);

        tracing::info!(
            "[scene] created {}x{} world, gravity {}",
            config.world.width,
            config.world.height,
            config.world.gravity
        );

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            world,
            rules,
            platform,
            player: Some(PlayerEntity { player, handle }),
            collectibles: Vec::new(),
            camera: CameraReactivity::new(),
            follow: FollowCamera::new(spawn),
            handle: SceneHandle::new(),
        })
    }

    /// Builds the scene and hands its [`SceneHandle`] to `on_ready` once.
    pub fn create(
        config: SceneConfig,
        on_ready: impl FnOnce(SceneHandle),
    ) -> Result<Self, ConfigError> {
        let scene = Self::new(config)?;
        tracing::info!("[scene] ready");
        on_ready(scene.handle());
        Ok(scene)
    }

    /// Advances the scene by one tick.
    ///
    /// `input` is `None` when no keyboard is available; the player then
    /// skips its update but the rest of the scene keeps running.
    pub fn tick(&mut self, input: Option<InputState>, time: FrameTime) {
        for command in self.handle.drain() {
            self.apply(command);
        }

        if let Some(entity) = &mut self.player
            && let Some(mut body) = RapierBody::attach(&mut self.world, entity.handle)
        {
            entity.player.update(&mut body, input, time);
        }

        for collectible in &mut self.collectibles {
            if let Some(mut body) = collectible.body(&mut self.world) {
                collectible.update(&mut body, time.delta);
            }
        }

        self.world.step();
        self.cull_collectibles();

        if let Some(entity) = &self.player
            && let Some(body) = RapierBody::attach(&mut self.world, entity.handle)
        {
            let offset = self.camera.update(body.velocity(), time.delta);
            self.follow.set_follow_offset(offset);
            self.follow.follow(body.position());
        }

        self.publish();
    }

    fn apply(&mut self, command: SceneCommand) {
        tracing::debug!("[scene] applying {:?}", command);
        match command {
            SceneCommand::SpawnCollectible { x, y } => {
                self.add_collectible(Vec2::new(x, y));
            }
            SceneCommand::SpawnRandomCollectible => {
                self.spawn_random_collectible();
            }
        }
    }

    /// Adds a collectible at a world position and returns its id.
    ///
    /// Non-finite positions are rejected and return `None`.
    pub fn add_collectible(&mut self, position: Vec2) -> Option<Uuid> {
        if !position.is_finite() {
            tracing::warn!("[scene] ignoring collectible at non-finite position {}", position);
            return None;
        }

        let collectible = Collectible::spawn(&mut self.world, &self.rules, position);
        let id = collectible.id();
        self.collectibles.push(collectible);
        Some(id)
    }

    /// Adds a collectible at a random position inside the spawn margins.
    pub fn spawn_random_collectible(&mut self) -> Option<Uuid> {
        let x = random_in(&mut self.rng, self.config.world.width);
        let y = random_in(&mut self.rng, self.config.world.height);
        self.add_collectible(Vec2::new(x, y))
    }

    fn cull_collectibles(&mut self) {
        let height = self.config.world.height;
        let (off_screen, on_screen): (Vec<_>, Vec<_>) = std::mem::take(&mut self.collectibles)
            .into_iter()
            .partition(|c| c.is_off_screen(&self.world, height));
        self.collectibles = on_screen;

        for collectible in off_screen {
            collectible.destroy(&mut self.world);
        }
    }

    fn publish(&mut self) {
        let player = self.player.as_ref().and_then(|entity| {
            RapierBody::attach(&mut self.world, entity.handle)
                .map(|body| PlayerSnapshot::capture(&entity.player, &body))
        });

        self.handle.publish(SceneStatus {
            player,
            collectibles: self.collectibles.len(),
            camera: self.camera.state(),
        });
    }

    /// Destroys the player and every collectible.
    pub fn teardown(&mut self) {
        if let Some(entity) = self.player.take() {
            entity.player.destroy();
            self.world.remove_rigid_body(entity.handle);
        }

        for collectible in self.collectibles.drain(..) {
            collectible.destroy(&mut self.world);
        }

        self.handle.publish(SceneStatus::default());
    }

    pub fn handle(&self) -> SceneHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref().map(|entity| &entity.player)
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.player.as_ref().and_then(|entity| {
            let body = self.world.get_rigid_body(entity.handle)?;
            let p = body.translation();
            Some(Vec2::new(p.x, p.y))
        })
    }

    pub fn collectibles(&self) -> impl Iterator<Item = CollectibleView> + '_ {
        self.collectibles.iter().filter_map(|c| {
            let body = self.world.get_rigid_body(c.handle())?;
            let p = body.translation();
            Some(CollectibleView {
                id: c.id(),
                position: Vec2::new(p.x, p.y),
                rotation: c.rotation(),
            })
        })
    }

    pub fn collectible_count(&self) -> usize {
        self.collectibles.len()
    }

    pub fn platform(&self) -> Rect {
        self.platform
    }

    pub fn camera(&self) -> &CameraReactivity {
        &self.camera
    }

    pub fn camera_center(&self) -> Vec2 {
        self.follow.center
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn add_platform(
    world: &mut PhysicsWorld,
    rules: &CollisionRules,
    width: f32,
    height: f32,
) -> Rect {
    let rect = Rect {
        center: Vec2::new(
            width / 2.0,
            height - PLATFORM_TOP_INSET + PLATFORM_HEIGHT / 2.0,
        ),
        size: Vec2::new(width * PLATFORM_WIDTH_RATIO, PLATFORM_HEIGHT),
    };

    let body = world.add_rigid_body(
        RigidBodyBuilder::fixed()
            .translation(Vector::new(rect.center.x, rect.center.y))
            .build(),
    );
    world.add_collider(
        ColliderBuilder::cuboid(rect.size.x / 2.0, rect.size.y / 2.0)
            .collision_groups(rules.groups_for(groups::PLATFORM))
            .build(),
        body,
    );

    rect
}

fn add_player_body(
    world: &mut PhysicsWorld,
    rules: &CollisionRules,
    at: Vec2,
) -> RigidBodyHandle {
    let handle = world.add_rigid_body(
        RigidBodyBuilder::dynamic()
            .translation(Vector::new(at.x, at.y))
            .lock_rotations()
            .build(),
    );
    world.add_collider(
        ColliderBuilder::ball(PLAYER_RADIUS)
            .restitution(PLAYER_RESTITUTION)
            .friction(0.0)
            .collision_groups(rules.groups_for(groups::PLAYER))
            .build(),
        handle,
    );
    handle
}

/// Uniform coordinate in `[SPAWN_MARGIN, extent - SPAWN_MARGIN]`, or the
/// middle when the extent leaves no room.
fn random_in(rng: &mut ChaCha8Rng, extent: f32) -> f32 {
    let (lo, hi) = (SPAWN_MARGIN, extent - SPAWN_MARGIN);
    if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        extent / 2.0
    }
}
