//! Portal flood: breadth-first traversal over sectors that transforms,
//! clips and projects walls into a fixed pool of candidate records.
//!
//! The pool is a 1024-slot arena reused cyclically across frames, holding
//! an intrusive doubly-linked list so the occlusion sort can unlink in
//! O(1).  Overflow silently reuses the oldest slot; a wall that does not
//! fit is simply absent from this frame.

use glam::{DVec2, dvec2};

use crate::geom;
use crate::world::{SectorId, TextureId, VertexId, World};

use super::Software;

pub(super) const MAX_PORTALS: usize = 32;
pub(super) const MAX_WALLS: usize = 1024;

/// Null link.
pub(super) const NIL: u16 = u16::MAX;

/* approximate camera frustum used for near-plane clipping */
const NEAR_Z: f64 = 1e-5;
const FAR_Z: f64 = 5.0;
const NEAR_SIDE: f64 = 1e-6;
const FAR_SIDE: f64 = 50.0;

/// One visible wall, transformed and projected for this frame.
///
/// `t0`/`t1` are camera-space endpoints: `x` lateral, `y` forward depth
/// (post-clip).  `u0`/`u1` are texture distances in world units along the
/// original edge, already re-interpolated for clipping.
#[derive(Clone, Copy)]
pub(super) struct Candidate {
    pub sector: SectorId,
    pub neighbor: Option<SectorId>,
    pub vid0: VertexId,
    pub vid1: VertexId,
    pub w0: DVec2,
    pub w1: DVec2,
    pub t0: DVec2,
    pub t1: DVec2,
    pub x0: i32,
    pub x1: i32,
    pub u0: f64,
    pub u1: f64,
    pub tex_low: TextureId,
    pub tex_mid: TextureId,
    pub tex_high: TextureId,
    pub prev: u16,
    pub next: u16,
    pub live: bool,
}

impl Candidate {
    fn empty() -> Self {
        Self {
            sector: 0,
            neighbor: None,
            vid0: 0,
            vid1: 0,
            w0: DVec2::ZERO,
            w1: DVec2::ZERO,
            t0: DVec2::ZERO,
            t1: DVec2::ZERO,
            x0: 0,
            x1: 0,
            u0: 0.0,
            u1: 0.0,
            tex_low: -1,
            tex_mid: -1,
            tex_high: -1,
            prev: NIL,
            next: NIL,
            live: false,
        }
    }
}

/// A blank candidate for predicate tests.
#[cfg(test)]
pub(super) fn test_candidate() -> Candidate {
    Candidate::empty()
}

/// Fixed arena of candidates threaded on an intrusive list.
pub(super) struct CandidatePool {
    slots: Vec<Candidate>,
    head: u16,
    tail: u16,
    cursor: usize,
    len: usize,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self {
            slots: vec![Candidate::empty(); MAX_WALLS],
            head: NIL,
            tail: NIL,
            cursor: 0,
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.live = false;
        }
        self.head = NIL;
        self.tail = NIL;
        self.cursor = 0;
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn head(&self) -> u16 {
        self.head
    }

    #[inline]
    pub fn get(&self, i: u16) -> &Candidate {
        &self.slots[i as usize]
    }

    /// Append at the tail, reusing the cyclically-next slot.  A still-live
    /// slot (pool overflow) is unlinked first – the oldest entry loses.
    pub fn push(&mut self, mut cand: Candidate) {
        let slot = self.cursor as u16;
        self.cursor = (self.cursor + 1) % MAX_WALLS;
        if self.slots[slot as usize].live {
            self.unlink(slot);
        }

        cand.live = true;
        cand.prev = self.tail;
        cand.next = NIL;
        self.slots[slot as usize] = cand;

        if self.tail == NIL {
            self.head = slot;
        } else {
            self.slots[self.tail as usize].next = slot;
        }
        self.tail = slot;
        self.len += 1;
    }

    pub fn unlink(&mut self, i: u16) {
        let (prev, next) = {
            let c = &self.slots[i as usize];
            debug_assert!(c.live);
            (c.prev, c.next)
        };
        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev as usize].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next as usize].prev = prev;
        }
        self.slots[i as usize].live = false;
        self.len -= 1;
    }
}

/*──────────────────────────── flood ─────────────────────────────────*/

impl Software {
    /// Refill the candidate pool from the player's sector outward.
    pub(super) fn flood_candidates(&mut self, world: &World) {
        self.pool.clear();
        self.visited.clear();
        self.visited.resize(world.num_sectors(), false);

        let cam = world.player();
        let p = cam.pos_xy();
        let (sin, cos) = cam.direction.sin_cos();
        let half_w = self.width as f64 * 0.5;

        let mut ring = [0usize; MAX_PORTALS];
        let mut rhead = 0usize;
        let mut rtail = 0usize;
        let mut queued = 0usize;

        ring[rhead] = cam.sector;
        rhead = (rhead + 1) % MAX_PORTALS;
        queued += 1;
        self.visited[cam.sector] = true;

        while queued > 0 {
            let sid = ring[rtail];
            rtail = (rtail + 1) % MAX_PORTALS;
            queued -= 1;

            for wall in &world.sector(sid).walls {
                let (w0, w1) = world.wall_verts(wall);
                let r0 = w0 - p;
                let r1 = w1 - p;

                // Camera space: x lateral, y forward depth.
                let mut t0 = dvec2(r0.x * sin - r0.y * cos, r0.x * cos + r0.y * sin);
                let mut t1 = dvec2(r1.x * sin - r1.y * cos, r1.x * cos + r1.y * sin);

                // Entirely behind the camera.
                if t0.y <= 0.0 && t1.y <= 0.0 {
                    continue;
                }

                let mut u0 = 0.0;
                let mut u1 = (w1 - w0).length();

                // One endpoint behind: clip against the two bounding rays
                // of the approximate view frustum and recompute U at the
                // clipped end so perspective correction stays tied to the
                // original edge.
                if t0.y < NEAR_Z || t1.y < NEAR_Z {
                    let org0 = t0;
                    let org1 = t1;
                    let i1 = geom::intersect_point(
                        org0,
                        org1,
                        dvec2(-NEAR_SIDE, NEAR_Z),
                        dvec2(-FAR_SIDE, FAR_Z),
                    );
                    let i2 = geom::intersect_point(
                        org0,
                        org1,
                        dvec2(NEAR_SIDE, NEAR_Z),
                        dvec2(FAR_SIDE, FAR_Z),
                    );
                    if org0.y < NEAR_Z {
                        t0 = if i1.y > 0.0 { i1 } else { i2 };
                        u0 = clipped_u(org0, org1, t0, u1);
                    }
                    if org1.y < NEAR_Z {
                        t1 = if i1.y > 0.0 { i1 } else { i2 };
                        u1 = clipped_u(org0, org1, t1, u1);
                    }
                }

                // Project to screen X.
                let sx0 = half_w + t0.x * (self.hfov / t0.y);
                let sx1 = half_w + t1.x * (self.hfov / t1.y);
                if !(sx0 < sx1) {
                    continue; // inverted (back-facing) or degenerate
                }
                let x0 = sx0 as i32;
                let x1 = sx1 as i32;
                if x0 >= x1 || x1 < 0 || x0 > self.width as i32 - 1 {
                    continue;
                }

                self.pool.push(Candidate {
                    sector: sid,
                    neighbor: wall.neighbor,
                    vid0: wall.v0,
                    vid1: wall.v1,
                    w0,
                    w1,
                    t0,
                    t1,
                    x0,
                    x1,
                    u0,
                    u1,
                    tex_low: wall.tex_low,
                    tex_mid: wall.tex_mid,
                    tex_high: wall.tex_high,
                    prev: NIL,
                    next: NIL,
                    live: false,
                });

                if let Some(nbr) = wall.neighbor {
                    if !self.visited[nbr] && queued < MAX_PORTALS - 1 {
                        self.visited[nbr] = true;
                        ring[rhead] = nbr;
                        rhead = (rhead + 1) % MAX_PORTALS;
                        queued += 1;
                    }
                }
            }
        }
    }
}

/// Texture distance at a clipped endpoint: linear along whichever
/// camera-space axis of the original edge has the larger swing.
fn clipped_u(org0: DVec2, org1: DVec2, clipped: DVec2, u_len: f64) -> f64 {
    let d = org1 - org0;
    let frac = if d.x.abs() > d.y.abs() {
        (clipped.x - org0.x) / d.x
    } else {
        (clipped.y - org0.y) / d.y
    };
    frac * u_len
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy(tag: usize) -> Candidate {
        let mut c = Candidate::empty();
        c.sector = tag;
        c
    }

    fn collect(pool: &CandidatePool) -> Vec<usize> {
        let mut out = Vec::new();
        let mut i = pool.head();
        while i != NIL {
            out.push(pool.get(i).sector);
            i = pool.get(i).next;
        }
        out
    }

    #[test]
    fn push_preserves_order_and_unlink_is_o1() {
        let mut pool = CandidatePool::new();
        for tag in 0..5 {
            pool.push(dummy(tag));
        }
        assert_eq!(pool.len(), 5);
        assert_eq!(collect(&pool), vec![0, 1, 2, 3, 4]);

        pool.unlink(2);
        assert_eq!(collect(&pool), vec![0, 1, 3, 4]);

        pool.unlink(0); // head
        pool.unlink(4); // tail
        assert_eq!(collect(&pool), vec![1, 3]);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn overflow_reuses_the_oldest_slot() {
        let mut pool = CandidatePool::new();
        for tag in 0..MAX_WALLS + 3 {
            pool.push(dummy(tag));
        }
        assert_eq!(pool.len(), MAX_WALLS);

        let order = collect(&pool);
        assert_eq!(order.len(), MAX_WALLS);
        // The three oldest entries were evicted.
        assert_eq!(order[0], 3);
        assert_eq!(*order.last().unwrap(), MAX_WALLS + 2);
    }

    #[test]
    fn clear_resets_between_frames() {
        let mut pool = CandidatePool::new();
        pool.push(dummy(7));
        pool.clear();
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.head(), NIL);
        assert_eq!(collect(&pool), Vec::<usize>::new());
    }
}
