//! Reactive camera: movement classification, offset blending and follow.
//!
//! [`CameraReactivity`] turns the player's velocity into a discrete
//! [`CameraState`] and eases the camera offset toward the state's framing.
//! [`FollowCamera`] smooths the view centre toward the player minus that
//! offset.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::tween::{EasingType, Tween};

/// Horizontal speed above which the velocity alone decides the state.
pub const VELOCITY_THRESHOLD: f32 = 50.0;
/// Per-tick horizontal velocity change that counts as movement.
pub const HORIZONTAL_ACCEL_THRESHOLD: f32 = 50.0;
/// Per-tick vertical velocity change that counts as acceleration.
pub const VERTICAL_ACCEL_THRESHOLD: f32 = 4.0;

pub const HORIZONTAL_OFFSET: f32 = 100.0;
pub const VERTICAL_OFFSET: f32 = 75.0;
/// Seconds an offset transition takes.
pub const TRANSITION_DURATION: f32 = 0.5;

/// Default follow smoothing per tick.
pub const FOLLOW_SMOOTHING: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionX {
    MovingLeft,
    MovingRight,
    #[default]
    Neutral,
}

impl MotionX {
    /// Follow offset on the x axis. Moving right shifts the view right.
    pub fn offset(self) -> f32 {
        match self {
            Self::MovingRight => -HORIZONTAL_OFFSET,
            Self::MovingLeft => HORIZONTAL_OFFSET,
            Self::Neutral => 0.0,
        }
    }

    fn from_sign(value: f32) -> Self {
        if value > 0.0 {
            Self::MovingRight
        } else {
            Self::MovingLeft
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionY {
    AcceleratingUp,
    AcceleratingDown,
    #[default]
    Neutral,
}

impl MotionY {
    /// Follow offset on the y axis (world y points down).
    pub fn offset(self) -> f32 {
        match self {
            Self::AcceleratingUp => VERTICAL_OFFSET,
            Self::AcceleratingDown => -VERTICAL_OFFSET,
            Self::Neutral => 0.0,
        }
    }
}

/// Composite horizontal/vertical camera state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CameraState {
    pub x: MotionX,
    pub y: MotionY,
}

impl CameraState {
    pub const NEUTRAL: Self = Self {
        x: MotionX::Neutral,
        y: MotionY::Neutral,
    };

    pub fn new(x: MotionX, y: MotionY) -> Self {
        Self { x, y }
    }

    /// Classifies a velocity and its per-tick change.
    pub fn classify(velocity: Vec2, acceleration: Vec2) -> Self {
        let x = if velocity.x.abs() > VELOCITY_THRESHOLD {
            MotionX::from_sign(velocity.x)
        } else if acceleration.x.abs() > HORIZONTAL_ACCEL_THRESHOLD {
            MotionX::from_sign(acceleration.x)
        } else {
            MotionX::Neutral
        };

        let y = if acceleration.y.abs() > VERTICAL_ACCEL_THRESHOLD {
            if acceleration.y < 0.0 {
                MotionY::AcceleratingUp
            } else {
                MotionY::AcceleratingDown
            }
        } else {
            MotionY::Neutral
        };

        Self { x, y }
    }

    /// Target follow offset for this state.
    pub fn offset(self) -> Vec2 {
        Vec2::new(self.x.offset(), self.y.offset())
    }
}

/// Blends the camera follow offset toward the framing of the current state.
#[derive(Debug, Clone, Default)]
pub struct CameraReactivity {
    previous_velocity: Vec2,
    last_state: CameraState,
    offset: Vec2,
    transition: Option<Tween>,
    transitions_started: u64,
}

impl CameraReactivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs once per tick with the player's post-step velocity.
    ///
    /// Returns the offset to apply this tick.
    pub fn update(&mut self, velocity: Vec2, dt: f32) -> Vec2 {
        let acceleration = velocity - self.previous_velocity;
        self.previous_velocity = velocity;

        let state = CameraState::classify(velocity, acceleration);
        if state != self.last_state {
            self.start_transition(state);
        }

        if let Some(tween) = &mut self.transition {
            let step = tween.advance(dt);
            self.offset = step.value();
            if step.is_finished() {
                self.transition = None;
            }
        }

        self.offset
    }

    fn start_transition(&mut self, state: CameraState) {
        let target = state.offset();
        tracing::debug!(
            "[camera] {:?} -> {:?}, offset ({}, {})",
            self.last_state,
            state,
            target.x,
            target.y
        );

        self.last_state = state;
        self.transition = Some(Tween::new(
            self.offset,
            target,
            TRANSITION_DURATION,
            EasingType::EaseOut,
        ));
        self.transitions_started += 1;
    }

    pub fn state(&self) -> CameraState {
        self.last_state
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Target offset of the in-flight transition, if any.
    pub fn transition_target(&self) -> Option<Vec2> {
        self.transition.as_ref().map(Tween::target)
    }

    pub fn transitions_started(&self) -> u64 {
        self.transitions_started
    }
}

/// Smoothed target-follow camera.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowCamera {
    pub center: Vec2,
    pub target: Vec2,
    pub offset: Vec2,
    /// Lerp factor per tick (0.0 = no movement, 1.0 = instant).
    pub smoothing: f32,
}

impl FollowCamera {
    /// Starts centred on `target`.
    pub fn new(target: Vec2) -> Self {
        Self {
            center: target,
            target,
            offset: Vec2::ZERO,
            smoothing: FOLLOW_SMOOTHING,
        }
    }

    pub fn set_follow_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Moves the centre one smoothing step toward `target - offset`.
    pub fn follow(&mut self, target: Vec2) -> Vec2 {
        self.target = target;
        self.center = self.center.lerp(target - self.offset, self.smoothing);
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_classify_velocity_first() {
        let state = CameraState::classify(Vec2::new(60.0, 0.0), Vec2::new(-80.0, 0.0));
        assert_eq!(state.x, MotionX::MovingRight);

        let state = CameraState::classify(Vec2::new(10.0, 0.0), Vec2::new(-80.0, 0.0));
        assert_eq!(state.x, MotionX::MovingLeft);

        let state = CameraState::classify(Vec2::new(50.0, 0.0), Vec2::new(50.0, 0.0));
        assert_eq!(state.x, MotionX::Neutral);
    }

    #[test]
    fn test_classify_vertical() {
        assert_eq!(
            CameraState::classify(Vec2::ZERO, Vec2::new(0.0, -150.0)).y,
            MotionY::AcceleratingUp
        );
        assert_eq!(
            CameraState::classify(Vec2::ZERO, Vec2::new(0.0, 5.0)).y,
            MotionY::AcceleratingDown
        );
        assert_eq!(
            CameraState::classify(Vec2::ZERO, Vec2::new(0.0, 4.0)).y,
            MotionY::Neutral
        );
    }

    #[test]
    fn test_offset_table() {
        assert_eq!(
            CameraState::new(MotionX::MovingRight, MotionY::AcceleratingUp).offset(),
            Vec2::new(-100.0, 75.0)
        );
        assert_eq!(
            CameraState::new(MotionX::MovingLeft, MotionY::AcceleratingDown).offset(),
            Vec2::new(100.0, -75.0)
        );
        assert_eq!(CameraState::NEUTRAL.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_moving_right_starts_transition() {
        let mut camera = CameraReactivity::new();
        camera.update(Vec2::ZERO, DT);
        assert_eq!(camera.transitions_started(), 0);

        camera.update(Vec2::new(60.0, 0.0), DT);

        assert_eq!(
            camera.state(),
            CameraState::new(MotionX::MovingRight, MotionY::Neutral)
        );
        assert_eq!(camera.transition_target(), Some(Vec2::new(-100.0, 0.0)));
        assert_eq!(camera.transitions_started(), 1);
        assert!(camera.offset().x < 0.0);
    }

    #[test]
    fn test_repeated_state_does_not_restart() {
        let mut camera = CameraReactivity::new();
        for _ in 0..10 {
            camera.update(Vec2::new(200.0, 0.0), DT);
        }
        assert_eq!(camera.transitions_started(), 1);
    }

    #[test]
    fn test_transition_completes_at_target() {
        let mut camera = CameraReactivity::new();
        let mut offset = Vec2::ZERO;
        for _ in 0..40 {
            offset = camera.update(Vec2::new(-200.0, 0.0), DT);
        }

        assert_eq!(offset, Vec2::new(100.0, 0.0));
        assert_eq!(camera.transition_target(), None);
    }

    #[test]
    fn test_new_transition_starts_from_current_offset() {
        let mut camera = CameraReactivity::new();
        for _ in 0..10 {
            camera.update(Vec2::new(200.0, 0.0), DT);
        }
        let midway = camera.offset();
        assert!(midway.x < 0.0 && midway.x > -100.0);

        camera.update(Vec2::new(0.0, 0.0), DT);

        // The velocity drop reads as leftward acceleration.
        assert_eq!(camera.state().x, MotionX::MovingLeft);
        assert_eq!(camera.transitions_started(), 2);
        assert!(camera.offset().x > midway.x);
    }

    #[test]
    fn test_follow_camera_smoothing() {
        let mut camera = FollowCamera::new(Vec2::ZERO);
        camera.set_follow_offset(Vec2::new(-100.0, 0.0));

        let center = camera.follow(Vec2::new(0.0, 0.0));
        assert!((center.x - 10.0).abs() < 1e-4);

        for _ in 0..200 {
            camera.follow(Vec2::new(0.0, 0.0));
        }
        assert!((camera.center.x - 100.0).abs() < 1e-2);
    }
}
