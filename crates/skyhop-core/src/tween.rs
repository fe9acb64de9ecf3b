//! Eased interpolation of 2D values over time.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// Easing curve applied to a tween's normalized progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    #[default]
    Linear,
    EaseOut,
}

impl EasingType {
    /// Applies the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => t * (2.0 - t),
        }
    }
}

/// Result of advancing a [`Tween`] by one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenStep {
    /// Still running; carries the interpolated value.
    Running(Vec2),
    /// Reached the end; carries the exact target value.
    Finished(Vec2),
}

impl TweenStep {
    pub fn value(self) -> Vec2 {
        match self {
            Self::Running(v) | Self::Finished(v) => v,
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// Interpolates a [`Vec2`] from a start value to a target over a duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: Vec2,
    to: Vec2,
    duration: f32,
    elapsed: f32,
    easing: EasingType,
}

impl Tween {
    pub fn new(from: Vec2, to: Vec2, duration: f32, easing: EasingType) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn advance(&mut self, dt: f32) -> TweenStep {
        self.elapsed += dt;
        if self.is_finished() {
            TweenStep::Finished(self.to)
        } else {
            TweenStep::Running(self.interpolate())
        }
    }

    /// Current interpolated value.
    pub fn interpolate(&self) -> Vec2 {
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.from.lerp(self.to, self.easing.apply(t))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn target(&self) -> Vec2 {
        self.to
    }
}
