//! The "in front of" relation between candidate walls.
//!
//! Not a total order – genuinely crossing walls resolve arbitrarily and
//! the per-column occlusion windows absorb the inconsistency.  The draw
//! loop only needs the relation to be right for walls that actually
//! occlude one another.

use glam::DVec2;

use crate::geom::{EPS, side_of};

use super::candidates::Candidate;

/// Does `a` wholly occlude `b` where their screen ranges overlap?
pub(super) fn in_front(a: &Candidate, b: &Candidate, cam: DVec2) -> bool {
    // Walls of one sector meeting at a corner never overlap on screen
    // except at the shared column; treat the earlier as in front.
    if a.sector == b.sector
        && (a.vid0 == b.vid0 || a.vid0 == b.vid1 || a.vid1 == b.vid0 || a.vid1 == b.vid1)
    {
        return true;
    }

    // Disjoint depth ranges: nearer wall wins outright.
    let (a_near, a_far) = (a.t0.y.min(a.t1.y), a.t0.y.max(a.t1.y));
    let (b_near, b_far) = (b.t0.y.min(b.t1.y), b.t0.y.max(b.t1.y));
    if a_far < b_near {
        return true;
    }
    if b_far < a_near {
        return false;
    }

    // `b` entirely on one side of a's supporting line: `a` occludes it
    // iff the camera sits on the other side.
    if let Some(front) = one_side(a, b, cam, true) {
        return front;
    }
    // Swap roles: `a` on one side of b's line, camera on the same side.
    if let Some(front) = one_side(b, a, cam, false) {
        return front;
    }

    // Lines genuinely cross; the occlusion windows sort it out.
    true
}

/// Resolve the relation using `base`'s supporting line, or `None` when
/// `other` straddles it.  Near-zero side values adopt the opposite
/// endpoint's sign; two zeros means parallel walls, in front by
/// convention.
fn one_side(base: &Candidate, other: &Candidate, cam: DVec2, opposite: bool) -> Option<bool> {
    let mut s0 = side_of(base.w0, base.w1, other.w0);
    let mut s1 = side_of(base.w0, base.w1, other.w1);
    if s0.abs() < EPS {
        s0 = s1;
    }
    if s1.abs() < EPS {
        s1 = s0;
    }
    if s0.abs() < EPS {
        return Some(true);
    }
    if (s0 > 0.0) != (s1 > 0.0) {
        return None;
    }

    let cam_side = side_of(base.w0, base.w1, cam);
    let same = (s0 > 0.0) == (cam_side > 0.0);
    Some(if opposite { !same } else { same })
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    /// Candidate with just the fields the predicate reads.
    fn wall(sector: usize, vids: (usize, usize), w0: DVec2, w1: DVec2, cam: DVec2) -> Candidate {
        // Depth along +x from the camera, lateral along -y: enough to give
        // the predicate plausible camera-space depths.
        let depth = |w: DVec2| (w - cam).x.max(0.01);
        let mut c = {
            let mut c = crate::renderer::software::candidates::test_candidate();
            c.sector = sector;
            c.vid0 = vids.0;
            c.vid1 = vids.1;
            c.w0 = w0;
            c.w1 = w1;
            c.t0 = dvec2(0.0, depth(w0));
            c.t1 = dvec2(0.0, depth(w1));
            c
        };
        c.x0 = 0;
        c.x1 = 100;
        c
    }

    #[test]
    fn nearer_disjoint_wall_is_in_front() {
        let cam = dvec2(0.0, 0.0);
        let near = wall(0, (0, 1), dvec2(5.0, -4.0), dvec2(5.0, 4.0), cam);
        let far = wall(1, (2, 3), dvec2(12.0, -4.0), dvec2(12.0, 4.0), cam);
        assert!(in_front(&near, &far, cam));
        assert!(!in_front(&far, &near, cam));
    }

    #[test]
    fn shared_corner_in_same_sector_prefers_first() {
        let cam = dvec2(0.0, 0.0);
        let a = wall(0, (0, 1), dvec2(5.0, -4.0), dvec2(5.0, 4.0), cam);
        let b = wall(0, (1, 2), dvec2(5.0, 4.0), dvec2(9.0, 8.0), cam);
        assert!(in_front(&a, &b, cam));
        assert!(in_front(&b, &a, cam));
    }

    #[test]
    fn side_test_resolves_overlapping_depths() {
        let cam = dvec2(0.0, 0.0);
        // A slanted near wall and a far wall whose depth ranges overlap.
        let a = wall(0, (0, 1), dvec2(4.0, -6.0), dvec2(8.0, 2.0), cam);
        let b = wall(1, (2, 3), dvec2(7.5, -3.0), dvec2(10.0, -1.0), cam);
        // `b` lies on the far side of a's line; the camera does not.
        assert!(in_front(&a, &b, cam));
        assert!(!in_front(&b, &a, cam));
    }

    #[test]
    fn parallel_walls_resolve_by_convention() {
        let cam = dvec2(0.0, 0.0);
        let a = wall(0, (0, 1), dvec2(5.0, -4.0), dvec2(5.0, 4.0), cam);
        let b = wall(1, (2, 3), dvec2(5.0, 5.0), dvec2(5.0, 9.0), cam);
        assert!(in_front(&a, &b, cam));
    }
}
