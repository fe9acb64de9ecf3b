//! Physics world wrapper around `Rapier2D`.
//!
//! World coordinates are screen-like: +x right, +y down. Negative vertical
//! velocity moves a body upward.

use rapier2d::prelude::*;
use std::fmt;

/// Fixed timestep for physics simulation (60Hz).
pub const PHYSICS_DT: f32 = 1.0 / 60.0;

/// Default gravity (downward, in pixels/s²).
pub const DEFAULT_GRAVITY: f32 = 300.0;

/// Minimum downward component of a contact normal for it to count as floor.
const FLOOR_NORMAL_MIN: f32 = 0.5;

/// A body rising faster than this (px/s) is never considered grounded.
const GROUNDED_MAX_RISE_SPEED: f32 = 5.0;

/// Collision groups used by the scene.
pub mod groups {
    use rapier2d::prelude::Group;

    pub const PLATFORM: Group = Group::GROUP_1;
    pub const PLAYER: Group = Group::GROUP_2;
    pub const COLLECTIBLE: Group = Group::GROUP_3;
}

/// Symmetric table of which collision groups interact.
///
/// Registering a pair makes each side's filter include the other side's
/// membership, so colliders built afterwards collide with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionRules {
    rules: [(Group, Group); 3],
}

impl CollisionRules {
    pub fn new() -> Self {
        Self {
            rules: [
                (groups::PLATFORM, Group::empty()),
                (groups::PLAYER, Group::empty()),
                (groups::COLLECTIBLE, Group::empty()),
            ],
        }
    }

    /// Registers a collision pair between two groups.
    pub fn register(&mut self, a: Group, b: Group) {
        for (membership, filter) in &mut self.rules {
            if *membership == a {
                *filter |= b;
            }
            if *membership == b {
                *filter |= a;
            }
        }
    }

    /// Returns whether two groups were registered as a pair.
    pub fn collides(&self, a: Group, b: Group) -> bool {
        self.filter_for(a).contains(b)
    }

    /// Interaction groups for a collider belonging to `membership`.
    pub fn groups_for(&self, membership: Group) -> InteractionGroups {
        InteractionGroups::all()
            .with_memberships(membership)
            .with_filter(self.filter_for(membership))
    }

    fn filter_for(&self, membership: Group) -> Group {
        self.rules
            .iter()
            .find(|(m, _)| *m == membership)
            .map_or(Group::empty(), |(_, filter)| *filter)
    }
}

impl Default for CollisionRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Physics world containing all `Rapier2D` components.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub gravity: f32,
    pub frame: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("frame", &self.frame)
            .field("rigid_body_count", &self.rigid_body_set.len())
            .field("collider_count", &self.collider_set.len())
            .field("gravity", &self.gravity)
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    /// Creates a new physics world with default gravity.
    pub fn new() -> Self {
        Self::with_gravity(DEFAULT_GRAVITY)
    }

    /// Creates a new physics world with custom downward gravity.
    pub fn with_gravity(gravity: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: PHYSICS_DT,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity,
            frame: 0,
        }
    }

    /// Advances the physics simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            Vector::new(0.0, self.gravity),
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
        self.frame += 1;
    }

    /// Advances the physics simulation by multiple steps.
    pub fn step_n(&mut self, n: u32) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Adds a rigid body to the world and returns its handle.
    pub fn add_rigid_body(&mut self, rigid_body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(rigid_body)
    }

    /// Adds a collider attached to a rigid body.
    pub fn add_collider(&mut self, collider: Collider, parent: RigidBodyHandle) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set)
    }

    /// Removes a rigid body and its attached colliders.
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Gets an immutable reference to a rigid body.
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Gets a mutable reference to a rigid body.
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Returns true if the body rests on a supporting surface.
    ///
    /// A body is grounded when one of its colliders has an active contact
    /// whose normal points from the body down into the other collider, and
    /// the body is not moving upward faster than a small tolerance.
    pub fn is_grounded(&self, handle: RigidBodyHandle) -> bool {
        let Some(body) = self.rigid_body_set.get(handle) else {
            return false;
        };
        if body.linvel().y < -GROUNDED_MAX_RISE_SPEED {
            return false;
        }

        body.colliders().iter().any(|&collider| {
            self.narrow_phase.contact_pairs_with(collider).any(|pair| {
                if !pair.has_any_active_contact() {
                    return false;
                }
                // Manifold normals point from collider1 towards collider2.
                let sign = if pair.collider1 == collider { 1.0 } else { -1.0 };
                pair.manifolds
                    .iter()
                    .any(|manifold| manifold.data.normal.y * sign > FLOOR_NORMAL_MIN)
            })
        })
    }

    /// Returns the current simulation frame number.
    pub fn current_frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_floor() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        let floor = world.add_rigid_body(
            RigidBodyBuilder::fixed()
                .translation(Vector::new(0.0, 200.0))
                .build(),
        );
        world.add_collider(ColliderBuilder::cuboid(500.0, 10.0).build(), floor);
        world
    }

    #[test]
    fn test_physics_world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.frame, 0);
        assert_eq!(world.integration_parameters.dt, PHYSICS_DT);
        assert_eq!(world.gravity, DEFAULT_GRAVITY);
    }

    #[test]
    fn test_step_advances_frame() {
        let mut world = PhysicsWorld::new();
        assert_eq!(world.current_frame(), 0);

        world.step();
        assert_eq!(world.current_frame(), 1);

        world.step_n(10);
        assert_eq!(world.current_frame(), 11);
    }

    #[test]
    fn test_add_and_remove_body() {
        let mut world = PhysicsWorld::new();

        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(50.0, 50.0))
            .build();
        let handle = world.add_rigid_body(body);

        assert!(world.get_rigid_body(handle).is_some());

        world.remove_rigid_body(handle);
        assert!(world.get_rigid_body(handle).is_none());
        assert!(!world.is_grounded(handle));
    }

    #[test]
    fn test_gravity_pulls_downward() {
        let mut world = PhysicsWorld::new();
        let handle = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, 0.0))
                .build(),
        );
        world.add_collider(ColliderBuilder::ball(10.0).build(), handle);

        world.step_n(30);

        let body = world.get_rigid_body(handle).unwrap();
        assert!(body.translation().y > 0.0);
        assert!(body.linvel().y > 0.0);
    }

    #[test]
    fn test_resting_ball_is_grounded() {
        let mut world = world_with_floor();
        let ball = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, 150.0))
                .lock_rotations()
                .build(),
        );
        world.add_collider(ColliderBuilder::ball(10.0).build(), ball);

        assert!(!world.is_grounded(ball));
        world.step_n(240);
        assert!(world.is_grounded(ball));
    }

    #[test]
    fn test_falling_ball_is_not_grounded() {
        let mut world = world_with_floor();
        let ball = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, -400.0))
                .build(),
        );
        world.add_collider(ColliderBuilder::ball(10.0).build(), ball);

        world.step_n(5);
        assert!(!world.is_grounded(ball));
    }

    #[test]
    fn test_collision_rules_are_symmetric() {
        let mut rules = CollisionRules::new();
        assert!(!rules.collides(groups::PLAYER, groups::PLATFORM));

        rules.register(groups::PLAYER, groups::PLATFORM);

        assert!(rules.collides(groups::PLAYER, groups::PLATFORM));
        assert!(rules.collides(groups::PLATFORM, groups::PLAYER));
        assert!(!rules.collides(groups::COLLECTIBLE, groups::PLATFORM));
    }

    #[test]
    fn test_collision_rules_self_pair() {
        let mut rules = CollisionRules::new();
        rules.register(groups::COLLECTIBLE, groups::COLLECTIBLE);

        assert!(rules.collides(groups::COLLECTIBLE, groups::COLLECTIBLE));
        assert!(!rules.collides(groups::PLAYER, groups::COLLECTIBLE));
    }
}
