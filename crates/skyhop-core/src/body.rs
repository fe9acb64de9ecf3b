//! Physics body capability used by the gameplay logic.
//!
//! Player and collectible logic never touch `Rapier2D` types directly; they
//! drive whatever implements [`Body`].

use bevy::math::Vec2;
use rapier2d::prelude::*;

use crate::physics::PhysicsWorld;

/// The subset of a physics body the gameplay logic needs.
pub trait Body {
    /// Current linear velocity in px/s.
    fn velocity(&self) -> Vec2;

    /// Overwrites the linear velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Current centre position in world coordinates.
    fn position(&self) -> Vec2;

    /// Whether the body rests on a supporting surface.
    fn is_grounded(&self) -> bool;

    fn set_velocity_x(&mut self, x: f32) {
        let v = self.velocity();
        self.set_velocity(Vec2::new(x, v.y));
    }

    fn set_velocity_y(&mut self, y: f32) {
        let v = self.velocity();
        self.set_velocity(Vec2::new(v.x, y));
    }
}

/// A [`Body`] view onto one rigid body of a [`PhysicsWorld`].
///
/// Only constructible through [`RapierBody::attach`], which checks that the
/// handle is live; the exclusive borrow keeps it live for the view's lifetime.
pub struct RapierBody<'w> {
    world: &'w mut PhysicsWorld,
    handle: RigidBodyHandle,
}

impl<'w> RapierBody<'w> {
    /// Returns a view onto `handle`, or `None` if the body is gone.
    pub fn attach(world: &'w mut PhysicsWorld, handle: RigidBodyHandle) -> Option<Self> {
        world.get_rigid_body(handle)?;
        Some(Self { world, handle })
    }
}

impl Body for RapierBody<'_> {
    fn velocity(&self) -> Vec2 {
        let v = self.world.rigid_body_set[self.handle].linvel();
        Vec2::new(v.x, v.y)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.world.rigid_body_set[self.handle]
            .set_linvel(Vector::new(velocity.x, velocity.y), true);
    }

    fn position(&self) -> Vec2 {
        let p = self.world.rigid_body_set[self.handle].translation();
        Vec2::new(p.x, p.y)
    }

    fn is_grounded(&self) -> bool {
        self.world.is_grounded(self.handle)
    }
}

/// In-memory body for driving gameplay logic without a physics world.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TestBody {
    pub velocity: Vec2,
    pub position: Vec2,
    pub grounded: bool,
}

#[cfg(test)]
impl TestBody {
    pub fn grounded() -> Self {
        Self {
            grounded: true,
            ..Self::default()
        }
    }

    pub fn airborne(velocity: Vec2) -> Self {
        Self {
            velocity,
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl Body for TestBody {
    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }
}
