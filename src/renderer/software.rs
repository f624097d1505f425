//! ---------------------------------------------------------------------------
//! Software portal renderer
//!
//! * Fills a `Vec<u32>` frame in **0x00RRGGBB**, one `draw_world` per frame.
//! * Portal flood collects candidate walls, the "in front of" predicate
//!   orders them, and per-column occlusion windows guarantee every pixel
//!   is written exactly once – the windows are the ground truth, the sort
//!   merely shortens work.
//! * All scratch state (frame, windows, candidate pool) is allocated once
//!   and reused; the inner loops never allocate.
//! ---------------------------------------------------------------------------

use crate::renderer::{HFOV, Rgba, VFOV};
use crate::world::{NO_TEXTURE, TextureBank, TextureId, World};

mod candidates;
mod ordering;
mod planes;
mod sky;
mod walls;

use candidates::CandidatePool;

/// Frame clear colour, visible only where no skybox is configured and no
/// wall reaches.
const CLEAR_COLOR: Rgba = 0x20_20_20;

/// Portal renderer with per-column occlusion windows.
pub struct Software {
    width: usize,
    height: usize,
    /// FOV scales premultiplied by the frame height.
    hfov: f64,
    vfov: f64,

    scratch: Vec<Rgba>,
    /// Unoccluded vertical window per column, inclusive on both ends;
    /// `ytop > ybottom` means the column is finished.
    ytop: Vec<i32>,
    ybottom: Vec<i32>,

    pool: CandidatePool,
    visited: Vec<bool>,

    /// Skybox texture; [`NO_TEXTURE`] falls back to a flat clear.
    pub sky: TextureId,
}

impl Software {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            hfov: HFOV * height as f64,
            vfov: VFOV * height as f64,
            scratch: vec![CLEAR_COLOR; width * height],
            ytop: vec![0; width],
            ybottom: vec![height as i32 - 1; width],
            pool: CandidatePool::new(),
            visited: Vec::new(),
            sky: NO_TEXTURE,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The finished frame, row-major.
    #[inline]
    pub fn frame(&self) -> &[Rgba] {
        &self.scratch
    }

    /// Render one complete frame from the world and its player camera.
    pub fn draw_world(&mut self, world: &World, bank: &TextureBank) {
        for x in 0..self.width {
            self.ytop[x] = 0;
            self.ybottom[x] = self.height as i32 - 1;
        }

        self.draw_sky(world.player(), bank);
        self.flood_candidates(world);
        self.draw_candidates(world, bank);
    }
}

/// Distance and sector-brightness falloff: the texel is scaled by
/// `max(0, brightness − min(depth, 0xE0)) / 255`.
#[inline]
fn shade(color: Rgba, brightness: u8, depth: f64) -> Rgba {
    let m = ((brightness as f64) - depth.min(0xE0 as f64)).max(0.0) as u32;
    let r = ((color >> 16) & 0xFF) * m / 255;
    let g = ((color >> 8) & 0xFF) * m / 255;
    let b = (color & 0xFF) * m / 255;
    (r << 16) | (g << 8) | b
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::level_fixtures::{SQUARE_LEVEL, TWO_ROOM_LEVEL};
    use crate::world::Texture;

    const W: usize = 200;
    const H: usize = 100;

    const CEIL_COLOR: u32 = 0xFF_00_00;
    const FLOOR_COLOR: u32 = 0x00_00_FF;
    const MID_COLOR: u32 = 0x00_FF_00;
    const HIGH_COLOR: u32 = 0xFF_FF_FF;
    const LOW_COLOR: u32 = 0x80_80_80;
    const SKY_COLOR: u32 = 0x00_FF_FF;

    /// Bank matching the texture ids used by the level fixtures:
    /// 0 = ceiling, 1 = floor, 2 = mid, 3 = high, 4 = low, 5 = sky.
    fn fixture_bank() -> TextureBank {
        let mut bank = TextureBank::new();
        for color in [CEIL_COLOR, FLOOR_COLOR, MID_COLOR, HIGH_COLOR, LOW_COLOR, SKY_COLOR] {
            bank.push(Texture::solid(color, 4, 4));
        }
        bank
    }

    fn dominant_channel(px: u32) -> (u32, u32, u32) {
        ((px >> 16) & 0xFF, (px >> 8) & 0xFF, px & 0xFF)
    }

    #[test]
    fn sealed_room_fills_every_column_exactly_once() {
        let world = World::parse(SQUARE_LEVEL).unwrap();
        let bank = fixture_bank();
        let mut renderer = Software::new(W, H);
        renderer.draw_world(&world, &bank);

        // Every column is fully closed and no clear pixel survives: the
        // spans written by the wall pass sum to the frame height.
        for x in 0..W {
            assert!(renderer.ytop[x] > renderer.ybottom[x], "open column {x}");
        }
        assert!(renderer.frame().iter().all(|&px| px != CLEAR_COLOR));
    }

    #[test]
    fn sealed_room_layers_ceiling_wall_floor() {
        let world = World::parse(SQUARE_LEVEL).unwrap();
        let bank = fixture_bank();
        let mut renderer = Software::new(W, H);
        renderer.draw_world(&world, &bank);

        let mid = W / 2;
        let px_top = renderer.frame()[mid];
        let px_mid = renderer.frame()[(H / 2) * W + mid];
        let px_bot = renderer.frame()[(H - 1) * W + mid];

        let (r, g, b) = dominant_channel(px_top);
        assert!(r > g && r > b, "top row not ceiling: {px_top:08x}");
        let (r, g, b) = dominant_channel(px_mid);
        assert!(g > r && g > b, "centre not wall: {px_mid:08x}");
        let (r, g, b) = dominant_channel(px_bot);
        assert!(b > r && b > g, "bottom row not floor: {px_bot:08x}");

        // Eye height 6 in a 0..10 room at depth 5: the wall band spans
        // roughly rows 34..74 on a 100-row frame.
        let first_green = (0..H)
            .find(|&y| {
                let (r, g, b) = dominant_channel(renderer.frame()[y * W + mid]);
                g > r && g > b
            })
            .unwrap();
        assert!((30..40).contains(&first_green), "wall starts at {first_green}");
    }

    #[test]
    fn distance_darkens_the_wall() {
        let world = World::parse(SQUARE_LEVEL).unwrap();
        let bank = fixture_bank();
        let mut renderer = Software::new(W, H);
        renderer.draw_world(&world, &bank);

        let centre = renderer.frame()[(H / 2) * W + W / 2];
        let (_, g, _) = dominant_channel(centre);
        // Depth 5 at brightness 255 leaves a factor of 250/255.
        assert!(g < 0xFF, "no distance falloff applied");
        assert!(g > 0xF0);
    }

    #[test]
    fn portal_shows_the_neighbor_and_its_step_down_band() {
        let world = World::parse(TWO_ROOM_LEVEL).unwrap();
        let bank = fixture_bank();
        let mut renderer = Software::new(W, H);
        renderer.sky = 5;
        renderer.draw_world(&world, &bank);

        // All columns still close: the neighbor's walls seal the opening.
        for x in 0..W {
            assert!(renderer.ytop[x] > renderer.ybottom[x], "open column {x}");
        }

        let mid = W / 2;
        let column: Vec<u32> = (0..H).map(|y| renderer.frame()[y * W + mid]).collect();

        // The step-down band (white) sits between our ceiling and the
        // neighbor's lower ceiling.
        let has_high_band = column.iter().any(|&px| {
            let (r, g, b) = dominant_channel(px);
            r == g && g == b && r > 0x40
        });
        assert!(has_high_band, "no step-down band in centre column");

        // Through the opening the far wall of room 1 (green, depth 15)
        // is visible near the horizon.
        let horizon = &column[H / 2 - 5..H / 2 + 5];
        assert!(
            horizon.iter().any(|&px| {
                let (r, g, b) = dominant_channel(px);
                g > r && g > b
            }),
            "far wall not visible through the portal"
        );
    }

    #[test]
    fn missing_textures_skip_bands_but_keep_occlusion() {
        let world = World::parse(SQUARE_LEVEL).unwrap();
        let bank = TextureBank::new(); // every id out of range
        let mut renderer = Software::new(W, H);
        renderer.draw_world(&world, &bank);

        // Nothing was painted over the clear, yet the columns closed.
        for x in 0..W {
            assert!(renderer.ytop[x] > renderer.ybottom[x]);
        }
        assert!(renderer.frame().iter().all(|&px| px == CLEAR_COLOR));
    }

    #[test]
    fn shade_clamps_to_black() {
        assert_eq!(shade(0xFF_FF_FF, 0, 1_000.0), 0);
        let lit = shade(0xFF_FF_FF, 255, 0.0);
        assert_eq!(lit, 0xFF_FF_FF);
    }
}
