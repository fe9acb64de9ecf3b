//! Per-frame inputs shared by the scene and its entities.

use serde::{Deserialize, Serialize};

use crate::physics::PHYSICS_DT;

/// Held state of the movement keys for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        jump: false,
    };

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::NONE
        }
    }

    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::NONE
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::NONE
        }
    }

    #[must_use]
    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }
}

/// Clock reading for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the scene started.
    pub elapsed: f64,
    /// Seconds since the previous tick.
    pub delta: f32,
}

impl FrameTime {
    pub fn new(elapsed: f64, delta: f32) -> Self {
        Self { elapsed, delta }
    }

    /// Time of the `frame`-th fixed tick.
    pub fn fixed(frame: u64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let elapsed = frame as f64 * f64::from(PHYSICS_DT);
        Self {
            elapsed,
            delta: PHYSICS_DT,
        }
    }

    /// The tick that follows this one after `delta` seconds.
    #[must_use]
    pub fn advance(self, delta: f32) -> Self {
        Self {
            elapsed: self.elapsed + f64::from(delta),
            delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_frame_time() {
        let t = FrameTime::fixed(60);
        assert!((t.elapsed - 1.0).abs() < 1e-5);
        assert_eq!(t.delta, PHYSICS_DT);
    }

    #[test]
    fn test_advance_accumulates() {
        let t = FrameTime::new(0.5, 0.0).advance(0.25).advance(0.25);
        assert!((t.elapsed - 1.0).abs() < 1e-9);
        assert_eq!(t.delta, 0.25);
    }
}
