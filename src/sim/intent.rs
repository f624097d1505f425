//! Input → per-tick intent.
//!
//! Turns an [`InputSnapshot`] into look deltas, a planar intent velocity
//! blended into the mob's momentum, and body-height changes.  Fails no
//! input – everything is clamped.

use glam::dvec2;
use std::f64::consts::TAU;

use crate::geom::EPS;
use crate::input::{Buttons, InputSnapshot};
use crate::world::{MAX_YAW, Mob, PLAYER_CROUCH_HEIGHT, PLAYER_HEIGHT, Sector};

/// Planar acceleration per tick of held movement input.
pub const MOVE_ACCEL: f64 = 0.1;
/// Vertical velocity granted by a jump off the ground.
pub const JUMP_VEL: f64 = 1.2;
/// Momentum kept per tick before the new intent is added.
pub const FRICTION: f64 = 0.7;
/// Planar speed cap per axis.
pub const MAX_SPEED: f64 = 0.3;

pub const SPRINT_MULT: f64 = 2.0;
pub const WALK_MULT: f64 = 0.4;
/// Body height change per tick while crouching or standing up.
pub const HEIGHT_STEP: f64 = 0.5;

/// Keyboard turn rate, radians per tick.
pub const KEY_TURN: f64 = 0.04;
pub const MOUSE_X_SCALE: f64 = -0.01;
pub const MOUSE_Y_SCALE: f64 = 0.03;
pub const STICK_X_SCALE: f64 = -0.07;
pub const STICK_Y_SCALE: f64 = 0.15;
pub const STICK_MOVE_DEADZONE: f64 = 0.1;
pub const STICK_LOOK_DEADZONE: f64 = 0.05;

/// Apply one tick of input to the mob.  `sect` is the mob's current
/// sector (for the jump ground test and the stand-up headroom cap).
pub fn apply_intent(mob: &mut Mob, sect: &Sector, input: &InputSnapshot) {
    /* keyboard look */
    if input.pressed(Buttons::LOOK_LEFT) {
        mob.direction += KEY_TURN;
    }
    if input.pressed(Buttons::LOOK_RIGHT) {
        mob.direction -= KEY_TURN;
    }

    /* planar intent, world frame */
    let (s, c) = mob.direction.sin_cos();
    let forward = dvec2(c, s);
    let right = dvec2(s, -c);

    let mut intent = dvec2(0.0, 0.0);
    if input.lx.abs() > STICK_MOVE_DEADZONE || input.ly.abs() > STICK_MOVE_DEADZONE {
        // Stick y points down, so pushing up (negative) moves forward.
        intent += forward * (MOVE_ACCEL * -input.ly);
        intent += right * (MOVE_ACCEL * input.lx);
    } else {
        if input.pressed(Buttons::FORWARD) {
            intent += forward * MOVE_ACCEL;
        }
        if input.pressed(Buttons::BACK) {
            intent -= forward * MOVE_ACCEL;
        }
        if input.pressed(Buttons::STRAFE_LEFT) {
            intent -= right * MOVE_ACCEL;
        }
        if input.pressed(Buttons::STRAFE_RIGHT) {
            intent += right * MOVE_ACCEL;
        }
    }

    /* jump, only with feet on the floor */
    if input.pressed(Buttons::JUMP) && (mob.pos.z - sect.floor).abs() < EPS {
        mob.vel.z = JUMP_VEL;
    }

    /* crouch / stand, capped by the ceiling over the head */
    if input.pressed(Buttons::CROUCH) {
        if mob.height > PLAYER_CROUCH_HEIGHT {
            mob.height = (mob.height - HEIGHT_STEP).max(PLAYER_CROUCH_HEIGHT);
        }
    } else if mob.height < PLAYER_HEIGHT {
        let headroom = sect.ceil - (mob.pos.z + mob.eyemargin);
        mob.height = (mob.height + HEIGHT_STEP).min(PLAYER_HEIGHT.min(headroom));
    }

    if mob.height < PLAYER_HEIGHT {
        intent *= WALK_MULT;
    }
    if input.pressed(Buttons::SPRINT) {
        intent *= SPRINT_MULT;
    }

    // The ground branch runs unconditionally; airborne mobs steer just as
    // well as grounded ones.
    mob.vel.x = (mob.vel.x * FRICTION + intent.x).clamp(-MAX_SPEED, MAX_SPEED);
    mob.vel.y = (mob.vel.y * FRICTION + intent.y).clamp(-MAX_SPEED, MAX_SPEED);

    /* mouse / right-stick look */
    if input.rx.abs() > STICK_LOOK_DEADZONE || input.ry.abs() > STICK_LOOK_DEADZONE {
        mob.direction += input.rx * STICK_X_SCALE;
        mob.yaw = (mob.yaw + input.ry * STICK_Y_SCALE).clamp(-MAX_YAW, MAX_YAW);
    } else {
        mob.direction += input.mouse_dx * MOUSE_X_SCALE;
        mob.yaw = (mob.yaw + input.mouse_dy * MOUSE_Y_SCALE).clamp(-MAX_YAW, MAX_YAW);
    }

    mob.direction = mob.direction.rem_euclid(TAU);
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
