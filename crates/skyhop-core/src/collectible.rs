//! Falling, bouncing collectibles.

use bevy::math::Vec2;
use rapier2d::prelude::*;
use uuid::Uuid;

use crate::body::{Body, RapierBody};
use crate::physics::{CollisionRules, PhysicsWorld, groups};

/// Visual and collider radius in pixels.
pub const COLLECTIBLE_RADIUS: f32 = 12.0;
/// Additional downward acceleration on top of world gravity (px/s²).
pub const EXTRA_GRAVITY: f32 = 300.0;
/// Horizontal drag in px/s².
pub const DRAG: f32 = 20.0;
pub const RESTITUTION: f32 = 1.0;
pub const FRICTION: f32 = 0.5;
const SPIN_FACTOR: f32 = 0.0005;

/// A collectible sprite backed by a dynamic rigid body.
#[derive(Debug, Clone)]
pub struct Collectible {
    id: Uuid,
    handle: RigidBodyHandle,
    rotation: f32,
}

impl Collectible {
    /// Inserts a collectible body at `position` and returns it.
    pub fn spawn(world: &mut PhysicsWorld, rules: &CollisionRules, position: Vec2) -> Self {
        let gravity_scale = if world.gravity == 0.0 {
            1.0
        } else {
            (world.gravity + EXTRA_GRAVITY) / world.gravity
        };

        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(position.x, position.y))
            .gravity_scale(gravity_scale)
            .lock_rotations()
            .build();
        let handle = world.add_rigid_body(body);

        let collider = ColliderBuilder::ball(COLLECTIBLE_RADIUS)
            .restitution(RESTITUTION)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction(FRICTION)
            .collision_groups(rules.groups_for(groups::COLLECTIBLE))
            .build();
        world.add_collider(collider, handle);

        let id = Uuid::new_v4();
        tracing::debug!(
            "[collectible] spawned {} at ({:.1}, {:.1})",
            id,
            position.x,
            position.y
        );

        Self {
            id,
            handle,
            rotation: 0.0,
        }
    }

    /// Per-frame update run before the physics step: spin and horizontal drag.
    pub fn update(&mut self, body: &mut impl Body, dt: f32) {
        let vx = body.velocity().x;
        self.rotation += vx * SPIN_FACTOR;

        let slowed = (vx.abs() - DRAG * dt).max(0.0);
        body.set_velocity_x(slowed.copysign(vx));
    }

    /// Whether the collectible has fallen below the visible world.
    ///
    /// A body whose height is no longer finite counts as off screen.
    pub fn is_off_screen(&self, world: &PhysicsWorld, world_height: f32) -> bool {
        world.get_rigid_body(self.handle).is_none_or(|body| {
            let y = body.translation().y;
            !y.is_finite() || y > world_height
        })
    }

    /// Removes the collectible's body from the world.
    pub fn destroy(self, world: &mut PhysicsWorld) {
        world.remove_rigid_body(self.handle);
        tracing::debug!("[collectible] destroyed {}", self.id);
    }

    /// Borrows the world as a [`Body`] for this collectible.
    pub fn body<'w>(&self, world: &'w mut PhysicsWorld) -> Option<RapierBody<'w>> {
        RapierBody::attach(world, self.handle)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::TestBody;

    fn rules() -> CollisionRules {
        let mut rules = CollisionRules::new();
        rules.register(groups::COLLECTIBLE, groups::PLATFORM);
        rules.register(groups::COLLECTIBLE, groups::COLLECTIBLE);
        rules
    }

    #[test]
    fn test_spawn_inserts_body_with_extra_gravity() {
        let mut world = PhysicsWorld::new();
        let collectible = Collectible::spawn(&mut world, &rules(), Vec2::new(100.0, 50.0));

        let body = world.get_rigid_body(collectible.handle()).unwrap();
        assert_eq!(body.gravity_scale(), 2.0);
        assert_eq!(body.translation().x, 100.0);
        assert_eq!(body.colliders().len(), 1);

        let collider = &world.collider_set[body.colliders()[0]];
        assert_eq!(collider.restitution(), RESTITUTION);
        assert_eq!(collider.friction(), FRICTION);
    }

    #[test]
    fn test_falls_faster_than_plain_gravity() {
        let mut world = PhysicsWorld::new();
        let collectible = Collectible::spawn(&mut world, &rules(), Vec2::ZERO);
        let plain = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(200.0, 0.0))
                .build(),
        );
        world.add_collider(ColliderBuilder::ball(COLLECTIBLE_RADIUS).build(), plain);

        world.step_n(30);

        let fast = world.get_rigid_body(collectible.handle()).unwrap().linvel().y;
        let slow = world.get_rigid_body(plain).unwrap().linvel().y;
        assert!(fast > slow * 1.5);
    }

    #[test]
    fn test_drag_does_not_cross_zero() {
        let mut collectible = Collectible {
            id: Uuid::new_v4(),
            handle: RigidBodyHandle::invalid(),
            rotation: 0.0,
        };
        let mut body = TestBody::airborne(Vec2::new(0.2, 0.0));

        collectible.update(&mut body, 1.0 / 60.0);
        assert_eq!(body.velocity.x, 0.0);

        body.velocity.x = -60.0;
        collectible.update(&mut body, 0.5);
        assert_eq!(body.velocity.x, -50.0);
        assert!(collectible.rotation() < 0.0);
    }

    #[test]
    fn test_off_screen_after_falling() {
        let mut world = PhysicsWorld::new();
        let collectible = Collectible::spawn(&mut world, &rules(), Vec2::new(0.0, 590.0));

        assert!(!collectible.is_off_screen(&world, 600.0));
        world.step_n(30);
        assert!(collectible.is_off_screen(&world, 600.0));

        let handle = collectible.handle();
        collectible.destroy(&mut world);
        assert!(world.get_rigid_body(handle).is_none());
    }

    #[test]
    fn test_non_finite_height_is_off_screen() {
        let mut world = PhysicsWorld::new();
        let collectible = Collectible::spawn(&mut world, &rules(), Vec2::new(0.0, 100.0));

        world
            .get_rigid_body_mut(collectible.handle())
            .unwrap()
            .set_translation(Vector::new(0.0, f32::NAN), false);

        assert!(collectible.is_off_screen(&world, 600.0));
    }
}
