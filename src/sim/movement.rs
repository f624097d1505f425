//! Movement / collision solver: one tick of mob motion against the
//! sector topology.
//!
//! Horizontal pass first – wall collisions slide the move along the wall,
//! portal crossings switch sectors – then a vertical pass applies gravity
//! and clamps against the current sector's floor and ceiling.

use glam::{DVec2, dvec2};
use smallvec::SmallVec;

use crate::geom;
use crate::world::{SectorId, World};

/// Gravity per tick while airborne.
pub const GRAVITY: f64 = 0.05;

/// Upper bound on slide/portal restarts within one tick.  Portal chains
/// are short and projection converges fast; this only guards degenerate
/// corner geometry.
const MAX_PASSES: usize = 16;

/// What one tick of movement did; used by the oscillation guard and by
/// tests.
#[derive(Debug, Default)]
pub struct MoveTrace {
    /// Sectors entered through portals this tick, in order.
    pub entered: SmallVec<[SectorId; 4]>,
    /// The horizontal move was cancelled by the escape safety net.
    pub cancelled: bool,
}

/// Advance the world's player mob by one tick of its current velocity.
pub fn move_mob(world: &mut World) -> MoveTrace {
    let mut mob = *world.player();
    let mut trace = MoveTrace::default();

    let p = mob.pos_xy();
    let mut d = dvec2(mob.vel.x, mob.vel.y);

    /* ── horizontal pass ─────────────────────────────────────────── */
    if d != DVec2::ZERO {
        let mut prev_sector: Option<SectorId> = None;

        'pass: for _ in 0..MAX_PASSES {
            let sect = world.sector(mob.sector);

            for wall in &sect.walls {
                let (v0, v1) = world.wall_verts(wall);
                let dest = p + d;
                let far = dest
                    + dvec2(
                        if d.x > 0.0 { mob.radius } else { -mob.radius },
                        if d.y > 0.0 { mob.radius } else { -mob.radius },
                    );

                // Vertical window of the portal; a solid wall has none.
                let (hole_low, hole_high) = match wall.neighbor {
                    Some(nbr) => {
                        let n = world.sector(nbr);
                        (sect.floor.max(n.floor), sect.ceil.min(n.ceil))
                    }
                    None => (f64::INFINITY, f64::NEG_INFINITY),
                };

                let blocked = hole_high < mob.pos.z + mob.height + mob.eyemargin
                    || hole_low > mob.pos.z + mob.kneemargin;

                if blocked {
                    // Probe with the body radius so the mob never clips a
                    // corner; slide what is left of the move along the wall.
                    if geom::segments_intersect(p, far, v0, v1)
                        && !world.inside_sector(far, mob.sector)
                    {
                        let slid = geom::project_onto(d, v1 - v0);
                        if (slid - d).length_squared() > 1e-24 {
                            d = slid;
                            continue 'pass;
                        }
                        d = slid;
                    }
                } else if geom::segments_intersect(p, dest, v0, v1)
                    && !world.inside_sector(dest, mob.sector)
                {
                    let nbr = wall.neighbor.unwrap();
                    // Never hop straight back through the portal we just
                    // used – degenerate geometry could oscillate forever.
                    if prev_sector == Some(nbr) {
                        continue;
                    }
                    if !world.inside_sector(dest, nbr) {
                        continue;
                    }
                    prev_sector = Some(mob.sector);
                    mob.sector = nbr;
                    trace.entered.push(nbr);
                    continue 'pass;
                }
            }
            break;
        }

        // Safety net: if no portal was crossed and the destination still
        // escapes the sector, drop the horizontal move entirely.
        if trace.entered.is_empty() && !world.inside_sector(p + d, mob.sector) {
            d = DVec2::ZERO;
            trace.cancelled = true;
        }

        mob.pos.x += d.x;
        mob.pos.y += d.y;
    }

    /* ── vertical pass ───────────────────────────────────────────── */
    let sect = world.sector(mob.sector);
    if mob.pos.z > sect.floor {
        mob.vel.z -= GRAVITY;
    }
    mob.pos.z += mob.vel.z;

    if mob.pos.z < sect.floor {
        mob.pos.z = sect.floor;
        mob.vel.z = 0.0;
    }
    if mob.pos.z + mob.height + mob.eyemargin > sect.ceil {
        mob.pos.z = sect.ceil - mob.height - mob.eyemargin;
        mob.vel.z = 0.0;
    }

    *world.player_mut() = mob;
    trace
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
