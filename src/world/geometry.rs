use glam::DVec2;

use crate::geom;
use crate::world::mob::Mob;
use crate::world::texture::TextureId;

pub type VertexId = usize;
pub type SectorId = usize;

/// An oriented edge of a sector.
///
/// Walls are stored clockwise around the sector interior: walking
/// `v0 → v1` keeps the inside on the right.  `neighbor` marks a portal to
/// the sector sharing this edge (traversed the opposite way over there).
#[derive(Clone, Copy, Debug)]
pub struct Wall {
    pub v0: VertexId,
    pub v1: VertexId,
    pub neighbor: Option<SectorId>,
    /// Step-up band below a portal opening.
    pub tex_low: TextureId,
    /// Full-height band of a solid wall.
    pub tex_mid: TextureId,
    /// Step-down band above a portal opening.
    pub tex_high: TextureId,
}

/// A convex-ish polygonal room with constant floor and ceiling heights.
#[derive(Clone, Debug)]
pub struct Sector {
    pub floor: f64,
    pub ceil: f64,
    pub tex_floor: TextureId,
    pub tex_ceil: TextureId,
    /// 0 = pitch black, 255 = fully bright.
    pub brightness: u8,
    /// Closed clockwise loop; consecutive walls share a vertex.
    pub walls: Vec<Wall>,
}

/// The loaded level: all vertices, all sectors, and the player mob.
///
/// Built exactly once by the level parser; nothing resizes during play.
/// Sectors own their walls, vertices are shared by id.
#[derive(Debug)]
pub struct World {
    pub(crate) vertices: Vec<DVec2>,
    pub(crate) sectors: Vec<Sector>,
    pub(crate) player: Mob,
}

impl World {
    pub fn new(vertices: Vec<DVec2>, sectors: Vec<Sector>, player: Mob) -> Self {
        Self {
            vertices,
            sectors,
            player,
        }
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> DVec2 {
        self.vertices[id]
    }

    #[inline]
    pub fn sector(&self, id: SectorId) -> &Sector {
        &self.sectors[id]
    }

    #[inline]
    pub fn num_sectors(&self) -> usize {
        self.sectors.len()
    }

    #[inline]
    pub fn player(&self) -> &Mob {
        &self.player
    }

    #[inline]
    pub fn player_mut(&mut self) -> &mut Mob {
        &mut self.player
    }

    /// Both endpoints of a wall, in world space.
    #[inline]
    pub fn wall_verts(&self, wall: &Wall) -> (DVec2, DVec2) {
        (self.vertices[wall.v0], self.vertices[wall.v1])
    }

    /// Is `p` inside sector `id`?  Westward ray-cast over the wall loop.
    pub fn inside_sector(&self, p: DVec2, id: SectorId) -> bool {
        geom::point_in_polygon(
            p,
            self.sectors[id].walls.iter().map(|w| self.wall_verts(w)),
        )
    }
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn inside_sector_symmetry_at_vertices() {
        let world = World::parse(crate::world::level::tests::SQUARE_LEVEL).unwrap();
        let eps = 1e-4;

        let sect = world.sector(0);
        for wall in &sect.walls {
            let (v0, v1) = world.wall_verts(wall);
            // Clockwise winding keeps the interior on the right of v0→v1.
            let along = (v1 - v0).normalize();
            let inward = dvec2(along.y, -along.x);
            for &v in &[v0, v1] {
                // Nudge off the vertex along the edge as well so the probe
                // is strictly interior/exterior.
                let base = v + along * (eps * if v == v0 { 1.0 } else { -1.0 });
                assert!(world.inside_sector(base + inward * eps, 0));
                assert!(!world.inside_sector(base - inward * eps, 0));
            }
        }
    }
}
