//! Input snapshot handed over by the host driver once per frame.
//!
//! The core never talks to a windowing library; it only sees this struct.

use bitflags::bitflags;

bitflags! {
    /// Button states sampled by the driver.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Buttons: u16 {
        const FORWARD           = 1 << 0;
        const BACK              = 1 << 1;
        const STRAFE_LEFT       = 1 << 2;
        const STRAFE_RIGHT      = 1 << 3;
        const LOOK_LEFT         = 1 << 4;
        const LOOK_RIGHT        = 1 << 5;
        const JUMP              = 1 << 6;
        const CROUCH            = 1 << 7;
        const SPRINT            = 1 << 8;
        const QUIT              = 1 << 9;
        const TOGGLE_MOUSELOOK  = 1 << 10;
        const TOGGLE_FULLSCREEN = 1 << 11;
    }
}

/// One tick's worth of raw input.
///
/// Mouse deltas are relative movement since the previous snapshot; stick
/// axes are in `[-1, 1]`.  Nothing here is validated – the intent mapper
/// clamps everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub buttons: Buttons,
    pub mouse_dx: f64,
    pub mouse_dy: f64,
    /// Left stick (planar movement).
    pub lx: f64,
    pub ly: f64,
    /// Right stick (look).
    pub rx: f64,
    pub ry: f64,
}

impl InputSnapshot {
    #[inline]
    pub fn pressed(&self, b: Buttons) -> bool {
        self.buttons.contains(b)
    }
}
