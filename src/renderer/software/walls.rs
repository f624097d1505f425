//! Pick-and-draw loop over the candidate pool, plus the textured wall
//! slices and portal step bands.

use crate::world::{TextureBank, TextureId, World};

use super::candidates::{Candidate, NIL};
use super::ordering::in_front;
use super::{Software, shade};

impl Software {
    /// Draw every candidate, front-most first, until the pool is empty.
    pub(super) fn draw_candidates(&mut self, world: &World, bank: &TextureBank) {
        let campos = world.player().pos_xy();

        while self.pool.len() > 0 {
            let mut pick = self.pool.head();
            let mut deferrals = 0;

            // Advance past any candidate that some overlapping wall
            // occludes.  The relation is not a total order: after a full
            // cycle of deferrals the current wall is drawn regardless and
            // the occlusion windows absorb the difference.
            'pick: loop {
                let mut c = self.pool.head();
                while c != NIL {
                    if c != pick {
                        let cc = self.pool.get(c);
                        let cw = self.pool.get(pick);
                        if cc.x0 <= cw.x1 && cw.x0 <= cc.x1 && in_front(cc, cw, campos) {
                            deferrals += 1;
                            if deferrals > self.pool.len() {
                                break 'pick;
                            }
                            pick = cw.next;
                            if pick == NIL {
                                pick = self.pool.head();
                            }
                            continue 'pick;
                        }
                    }
                    c = self.pool.get(c).next;
                }
                break;
            }

            let cand = *self.pool.get(pick);
            self.pool.unlink(pick);
            self.draw_wall(&cand, world, bank);
        }
    }

    /// Rasterise one wall across its visible columns, maintaining the
    /// occlusion windows.
    fn draw_wall(&mut self, cand: &Candidate, world: &World, bank: &TextureBank) {
        let cam = world.player();
        let sect = world.sector(cand.sector);
        let eye = cam.eye_z();
        let yaw = cam.yaw;
        let half_h = self.height as f64 * 0.5;

        // Heights relative to the eye line.
        let yceil = sect.ceil - eye;
        let yfloor = sect.floor - eye;

        let yscale0 = self.vfov / cand.t0.y;
        let yscale1 = self.vfov / cand.t1.y;

        // Screen Y of a relative height at either endpoint; yaw shears
        // proportionally to depth.
        let proj = |rel: f64, tz: f64, yscale: f64| half_h - (rel + tz * yaw) * yscale;

        let y0a = proj(yceil, cand.t0.y, yscale0);
        let y0b = proj(yfloor, cand.t0.y, yscale0);
        let y1a = proj(yceil, cand.t1.y, yscale1);
        let y1b = proj(yfloor, cand.t1.y, yscale1);

        let nsect = cand.neighbor.map(|n| world.sector(n));
        let (nyceil, nyfloor) = match nsect {
            Some(n) => (n.ceil - eye, n.floor - eye),
            None => (0.0, 0.0),
        };
        let (ny0a, ny0b, ny1a, ny1b) = (
            proj(nyceil, cand.t0.y, yscale0),
            proj(nyfloor, cand.t0.y, yscale0),
            proj(nyceil, cand.t1.y, yscale1),
            proj(nyfloor, cand.t1.y, yscale1),
        );

        let (x0, x1) = (cand.x0, cand.x1);
        let span = (x1 - x0) as f64;
        let begin = x0.max(0);
        let end = x1.min(self.width as i32 - 1);

        for x in begin..=end {
            let col = x as usize;
            let wtop = self.ytop[col];
            let wbot = self.ybottom[col];
            if wtop > wbot {
                continue; // column already finished
            }

            let fx = (x - x0) as f64 / span;

            // Depth for shading only.
            let depth = (cand.t0.y + (cand.t1.y - cand.t0.y) * fx).max(0.0);

            // Perspective-correct texture U for this column.
            let wa = (x1 - x) as f64 * cand.t1.y;
            let wb = (x - x0) as f64 * cand.t0.y;
            let u = (cand.u0 * wa + cand.u1 * wb) / (wa + wb);

            let ya = lerp(y0a, y1a, fx);
            let yb = lerp(y0b, y1b, fx);
            let cya = (ya as i32).clamp(wtop, wbot);
            let cyb = (yb as i32).clamp(wtop, wbot);

            // Own ceiling above the wall top, own floor below the bottom.
            self.draw_plane_column(col, wtop, cya - 1, sect.ceil, sect.tex_ceil, sect.brightness, cam, bank);
            self.draw_plane_column(col, cyb + 1, wbot, sect.floor, sect.tex_floor, sect.brightness, cam, bank);

            if nsect.is_some() {
                let nya = lerp(ny0a, ny1a, fx);
                let nyb = lerp(ny0b, ny1b, fx);
                let cnya = (nya as i32).clamp(wtop, wbot);
                let cnyb = (nyb as i32).clamp(wtop, wbot);

                // Step-down ceiling band between our ceiling and theirs.
                if nyceil < yceil {
                    self.draw_wall_slice(
                        bank,
                        cand.tex_high,
                        col,
                        cya,
                        cnya - 1,
                        ya,
                        nya,
                        yceil - nyceil,
                        u,
                        depth,
                        sect.brightness,
                    );
                }
                self.ytop[col] = cya.max(cnya).clamp(wtop, self.height as i32 - 1);

                // Step-up floor band between their floor and ours.
                if nyfloor > yfloor {
                    self.draw_wall_slice(
                        bank,
                        cand.tex_low,
                        col,
                        cnyb + 1,
                        cyb,
                        nyb,
                        yb,
                        nyfloor - yfloor,
                        u,
                        depth,
                        sect.brightness,
                    );
                }
                self.ybottom[col] = cyb.min(cnyb).clamp(0, wbot);
            } else {
                // Solid wall: one full-height slice, then the column is
                // done.
                self.draw_wall_slice(
                    bank,
                    cand.tex_mid,
                    col,
                    cya,
                    cyb,
                    ya,
                    yb,
                    yceil - yfloor,
                    u,
                    depth,
                    sect.brightness,
                );
                self.ytop[col] = self.ybottom[col] + 1;
            }
        }
    }

    /// One textured vertical slice.  `y_from..=y_to` are the clamped rows
    /// to paint; `top_screen`/`bot_screen` are the unclamped projections
    /// of the band's top and bottom edges, `band_h` its world height, and
    /// `u` the column-constant texture distance along the wall.
    #[allow(clippy::too_many_arguments)]
    fn draw_wall_slice(
        &mut self,
        bank: &TextureBank,
        tex_id: TextureId,
        col: usize,
        y_from: i32,
        y_to: i32,
        top_screen: f64,
        bot_screen: f64,
        band_h: f64,
        u: f64,
        depth: f64,
        brightness: u8,
    ) {
        if y_from > y_to {
            return;
        }
        let Some(tex) = bank.get(tex_id) else {
            return; // no texture: band skipped, occlusion already handled
        };
        let screen_h = bot_screen - top_screen;
        if screen_h.abs() < 1e-9 {
            return;
        }

        let tex_u = (((u / tex.xscale) * tex.w as f64).rem_euclid(tex.w as f64) as usize)
            .min(tex.w - 1);
        // Texels spanned by the whole band; `yscale` world units tile the
        // texture once vertically.
        let vspan = band_h * tex.h as f64 / tex.yscale;

        for y in y_from..=y_to {
            let frac = (bot_screen - y as f64) / screen_h;
            let v = ((frac * vspan).rem_euclid(tex.h as f64) as usize).min(tex.h - 1);
            self.scratch[y as usize * self.width + col] =
                shade(tex.pixels[v * tex.w + tex_u], brightness, depth);
        }
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Texture, World};

    /// A wall whose texture is wider than one tile exercises the
    /// perspective-correct U: at the midpoint column of a wall viewed
    /// head-on, U must equal half the wall length regardless of depth
    /// asymmetry at the clip edges.
    #[test]
    fn perspective_u_midpoint_matches_world_midpoint() {
        let world = World::parse(crate::world::level_fixtures::SQUARE_LEVEL).unwrap();
        let mut bank = TextureBank::new();
        for _ in 0..3 {
            bank.push(Texture::solid(0xFF_FF_FF, 8, 8));
        }

        let mut renderer = Software::new(200, 100);
        renderer.draw_world(&world, &bank);

        // Reconstruct the facing wall's candidate numbers: endpoints at
        // depth 5, lateral ±5, so x0=27, x1=173 on a 200-wide frame.
        let (x0, x1) = (27.0_f64, 173.0_f64);
        let (t0z, t1z) = (5.0_f64, 5.0_f64);
        let (u0, u1) = (0.0_f64, 10.0_f64);
        let x = (x0 + x1) / 2.0;
        let wa = (x1 - x) * t1z;
        let wb = (x - x0) * t0z;
        let u = (u0 * wa + u1 * wb) / (wa + wb);
        assert!((u - 5.0).abs() < 1e-9);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(2.0, 10.0, 0.5), 6.0);
    }
}
