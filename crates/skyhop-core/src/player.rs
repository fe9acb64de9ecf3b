//! Player movement and multi-jump state machine.
//!
//! The jump sequence is driven by rising edges of the jump key:
//! - first jump: small fixed hop
//! - second jump: starts low and grows while the key is held, up to a hold
//!   window; the hold fraction is kept as the charge level
//! - third jump (optional): base power plus a bonus scaled by the charge level
//!
//! Landing resets the whole sequence.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::body::Body;
use crate::frame::{FrameTime, InputState};

/// Ground acceleration in px/s².
pub const ACCELERATION: f32 = 800.0;
/// Horizontal speed cap in px/s.
pub const MAX_SPEED: f32 = 300.0;
/// Airborne acceleration in px/s² (reduced air control).
pub const AIR_ACCELERATION: f32 = ACCELERATION / 10.0;

pub const FIRST_JUMP_VELOCITY: f32 = -150.0;
pub const MIN_SECOND_JUMP_VELOCITY: f32 = -150.0;
pub const MAX_SECOND_JUMP_VELOCITY: f32 = -350.0;
/// Seconds the second jump keeps charging while held.
pub const MAX_SECOND_JUMP_HOLD: f64 = 0.1;
pub const BASE_THIRD_JUMP_VELOCITY: f32 = -200.0;
/// Extra third-jump velocity at full charge.
pub const MAX_THIRD_JUMP_BONUS: f32 = -150.0;
/// Horizontal velocity given by the second jump, and the base for the third.
pub const HORIZONTAL_JUMP_BOOST: f32 = 100.0;

/// Vertical speeds below this are zeroed while grounded.
pub const LANDING_EPSILON: f32 = 2.0;
const ROLL_FACTOR: f32 = 0.0001;

/// Player construction options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerOptions {
    pub texture: String,
    pub triple_jump: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            texture: "star".to_string(),
            triple_jump: false,
        }
    }
}

/// Controllable player with a charged multi-jump.
#[derive(Debug, Clone)]
pub struct Player {
    id: Uuid,
    texture: String,
    triple_jump: bool,
    max_jumps: u8,

    jump_count: u8,
    is_jumping: bool,
    is_charging: bool,
    charge_level: f32,
    jump_start_time: f64,
    previous_jump: bool,
    /// Ground contact as sampled by the last update.
    grounded: bool,

    rotation: f32,
}

impl Player {
    pub fn new(options: PlayerOptions) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(
            "[player] creating player {} with triple jump: {}",
            id,
            options.triple_jump
        );

        Self {
            id,
            texture: options.texture,
            triple_jump: options.triple_jump,
            max_jumps: if options.triple_jump { 3 } else { 2 },
            jump_count: 0,
            is_jumping: false,
            is_charging: false,
            charge_level: 0.0,
            jump_start_time: 0.0,
            previous_jump: false,
            grounded: false,
            rotation: 0.0,
        }
    }

    /// Runs one frame of movement and jump logic.
    ///
    /// Without an input source only ground contact is sampled; movement and
    /// jumps are skipped.
    pub fn update(&mut self, body: &mut impl Body, input: Option<InputState>, time: FrameTime) {
        let grounded = body.is_grounded();
        self.grounded = grounded;

        let Some(input) = input else {
            return;
        };

        if grounded && body.velocity().y.abs() < LANDING_EPSILON {
            body.set_velocity_y(0.0);
        }

        if grounded {
            self.land();
        }

        self.apply_movement(body, input, grounded, time.delta);
        self.apply_multi_jump(body, input, time.elapsed);
        self.rotation += (body.velocity().x / 2.0) * ROLL_FACTOR;

        self.previous_jump = input.jump;
    }

    fn land(&mut self) {
        self.jump_count = 0;
        self.is_jumping = false;
        self.is_charging = false;
        self.charge_level = 0.0;
    }

    fn apply_movement(&self, body: &mut impl Body, input: InputState, grounded: bool, dt: f32) {
        let target = if input.left {
            -MAX_SPEED
        } else if input.right {
            MAX_SPEED
        } else {
            0.0
        };

        let vx = body.velocity().x;
        let diff = target - vx;
        let rate = if grounded { ACCELERATION } else { AIR_ACCELERATION };
        let step = sign(diff) * rate * dt;

        if step.abs() > diff.abs() {
            body.set_velocity_x(target);
        } else {
            body.set_velocity_x(vx + step);
        }
    }

    fn apply_multi_jump(&mut self, body: &mut impl Body, input: InputState, now: f64) {
        let pressed = input.jump && !self.previous_jump;
        let released = !input.jump && self.previous_jump;

        tracing::trace!(
            "[player] jumps remaining: {}, second jump power: {}",
            self.max_jumps - self.jump_count,
            self.charge_level
        );

        if pressed && self.jump_count == 0 {
            self.jump_count = 1;
            self.is_jumping = true;
            body.set_velocity_y(FIRST_JUMP_VELOCITY);
        } else if pressed && self.jump_count == 1 {
            self.jump_count = 2;
            self.is_jumping = true;
            self.is_charging = true;
            self.jump_start_time = now;
            self.charge_level = 0.0;

            body.set_velocity_y(MIN_SECOND_JUMP_VELOCITY);

            if let Some(dir) = held_direction(input) {
                body.set_velocity_x(dir * HORIZONTAL_JUMP_BOOST);
            }
        } else if pressed && self.jump_count == 2 && self.triple_jump {
            self.jump_count = 3;
            self.is_jumping = true;

            let bonus = self.charge_level * MAX_THIRD_JUMP_BONUS;
            body.set_velocity_y(BASE_THIRD_JUMP_VELOCITY + bonus);

            let boost = HORIZONTAL_JUMP_BOOST * (1.0 + self.charge_level);
            if let Some(dir) = held_direction(input) {
                let vx = body.velocity().x;
                body.set_velocity_x(vx + dir * boost);
            }
        }

        if input.jump && self.is_charging && body.velocity().y < 0.0 {
            let held_for = now - self.jump_start_time;

            if held_for <= MAX_SECOND_JUMP_HOLD {
                #[allow(clippy::cast_possible_truncation)]
                let progress = (held_for / MAX_SECOND_JUMP_HOLD).clamp(0.0, 1.0) as f32;
                let target = MIN_SECOND_JUMP_VELOCITY
                    + (MAX_SECOND_JUMP_VELOCITY - MIN_SECOND_JUMP_VELOCITY) * progress;

                self.charge_level = progress;

                // Only ever strengthen the jump.
                if target < body.velocity().y {
                    body.set_velocity_y(target);
                }
            } else {
                self.charge_level = 1.0;
            }
        }

        if released || body.velocity().y >= 0.0 {
            self.is_charging = false;
            self.is_jumping = false;
        }
    }

    /// Logs the destruction. The scene removes the body afterwards.
    pub fn destroy(self) {
        tracing::info!("[player] player {} destroyed", self.id);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn jump_count(&self) -> u8 {
        self.jump_count
    }

    pub fn max_jumps(&self) -> u8 {
        self.max_jumps
    }

    pub fn has_triple_jump(&self) -> bool {
        self.triple_jump
    }

    pub fn charge_level(&self) -> f32 {
        self.charge_level
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    /// Whether the last update found the player on the ground.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Cosmetic roll angle in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

/// Diagnostics view of the player for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: Uuid,
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub jump_count: u8,
    pub max_jumps: u8,
    pub triple_jump: bool,
    pub charge_level: f32,
    pub grounded: bool,
}

impl PlayerSnapshot {
    /// Position and velocity come from `body`; jump state and ground contact
    /// are as of the player's last update, so they always agree.
    pub fn capture(player: &Player, body: &impl Body) -> Self {
        let position = body.position();
        let velocity: Vec2 = body.velocity();
        Self {
            id: player.id,
            position: [position.x, position.y],
            velocity: [velocity.x, velocity.y],
            jump_count: player.jump_count,
            max_jumps: player.max_jumps,
            triple_jump: player.triple_jump,
            charge_level: player.charge_level,
            grounded: player.grounded,
        }
    }
}

/// -1 for left, +1 for right, left taking precedence.
fn held_direction(input: InputState) -> Option<f32> {
    if input.left {
        Some(-1.0)
    } else if input.right {
        Some(1.0)
    } else {
        None
    }
}

fn sign(x: f32) -> f32 {
    if x < 0.0 {
        -1.0
    } else if x > 0.0 {
        1.0
    } else {
        0.0
    }
}
