// tic.rs
use std::time::{Duration, Instant};

use crate::input::InputSnapshot;
use crate::sim::movement::{self, MoveTrace};
use crate::sim::intent;
use crate::world::World;

pub const SIM_FPS: u32 = 60;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// One full simulation tick: intent, then motion.  Strictly sequential –
/// the renderer runs after this returns.
pub fn run_tick(world: &mut World, input: &InputSnapshot) -> MoveTrace {
    let mut mob = *world.player();
    let sect = world.sector(mob.sector);
    intent::apply_intent(&mut mob, sect, input);
    *world.player_mut() = mob;
    movement::move_mob(world)
}

/// Drives fixed-rate simulation ticks from the host's frame loop.
pub struct TicRunner {
    last: Instant,
}

impl TicRunner {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Advance enough tics to synchronise simulation with real time.
    /// Returns how many ran; if the host lags, several run back to back
    /// before the next render.
    pub fn pump(&mut self, world: &mut World, input: &InputSnapshot) -> u32 {
        let mut ran = 0;
        while self.last.elapsed() >= TIC {
            run_tick(world, input);
            self.last += TIC;
            ran += 1;
        }
        ran
    }
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new()
    }
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
