//! The player mob – the one moving object in the world.

use glam::{DVec2, DVec3};

use crate::world::geometry::SectorId;

/// Vertical look limit, in screen units per unit of depth.
pub const MAX_YAW: f64 = 5.0;

/// Standing body height.
pub const PLAYER_HEIGHT: f64 = 6.0;
/// Fully crouched body height.
pub const PLAYER_CROUCH_HEIGHT: f64 = 2.5;
/// Clearance kept between the eye line and the ceiling.
pub const PLAYER_EYE_MARGIN: f64 = 1.0;
/// Highest step a leg clears without jumping.
pub const PLAYER_KNEE_MARGIN: f64 = 2.0;
/// Body radius for the wall probe.
pub const PLAYER_RADIUS: f64 = 0.5;

/// Position, motion and body state of a mob.
///
/// `pos.z` is the altitude of the feet; the eye sits at `pos.z + height`
/// and `direction` is the horizontal facing in `[0, 2π)`.  `yaw` is the
/// vertical look offset applied as a screen-space shear, clamped to
/// ±[`MAX_YAW`].
#[derive(Debug, Clone, Copy)]
pub struct Mob {
    pub pos: DVec3,
    pub vel: DVec3,
    pub direction: f64,
    pub yaw: f64,
    pub height: f64,
    pub eyemargin: f64,
    pub kneemargin: f64,
    pub radius: f64,
    pub sector: SectorId,
}

impl Mob {
    /// A standing player at `pos` in `sector`, at rest.
    pub fn player(pos: DVec2, sector: SectorId) -> Self {
        Self {
            pos: pos.extend(0.0),
            vel: DVec3::ZERO,
            direction: 0.0,
            yaw: 0.0,
            height: PLAYER_HEIGHT,
            eyemargin: PLAYER_EYE_MARGIN,
            kneemargin: PLAYER_KNEE_MARGIN,
            radius: PLAYER_RADIUS,
            sector,
        }
    }

    /// Planar position.
    #[inline]
    pub fn pos_xy(&self) -> DVec2 {
        self.pos.truncate()
    }

    /// Altitude of the eye line.
    #[inline]
    pub fn eye_z(&self) -> f64 {
        self.pos.z + self.height
    }
}
