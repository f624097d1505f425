//! Skybox fill: every frame starts as sky, and the wall pass paints over
//! whatever geometry covers.

use std::f64::consts::TAU;

use crate::renderer::HFOV;
use crate::world::{MAX_YAW, Mob, TextureBank};

use super::{CLEAR_COLOR, Software};

impl Software {
    /// Fill the whole frame from the panorama texture.  A full 2π turn of
    /// `direction` pans exactly one texture width; the screen shows the
    /// horizontal-FOV slice of it.  `yaw` shifts the sampled band by
    /// `(yaw / MAX_YAW) · skyH/2`.  X wraps, Y clamps.
    pub(super) fn draw_sky(&mut self, cam: &Mob, bank: &TextureBank) {
        let Some(tex) = bank.get(self.sky) else {
            self.scratch.fill(CLEAR_COLOR);
            return;
        };

        let sky_w = tex.w as f64;
        let sky_h = tex.h as f64;

        let pan = cam.direction / TAU * sky_w;
        let x_step = HFOV / TAU * sky_w / self.width as f64;
        let y_step = sky_h * 0.5 / self.height as f64;
        let shift = cam.yaw / MAX_YAW * (sky_h * 0.5);

        for y in 0..self.height {
            // Yaw at 0 samples the middle half of the panorama.
            let v = (y as f64 * y_step + sky_h * 0.25 + shift).clamp(0.0, sky_h - 1.0) as usize;
            let row = &tex.pixels[v * tex.w..(v + 1) * tex.w];
            let out = &mut self.scratch[y * self.width..(y + 1) * self.width];
            for (x, px) in out.iter_mut().enumerate() {
                let u = (x as f64 * x_step - pan).rem_euclid(sky_w) as usize;
                *px = row[u.min(tex.w - 1)];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Texture, TextureBank, World};

    fn gradient_sky() -> Texture {
        // Each column carries its own index so panning is observable.
        let (w, h) = (64, 32);
        let mut pixels = vec![0u32; w * h];
        for y in 0..h {
            for x in 0..w {
                pixels[y * w + x] = (x as u32) << 8 | y as u32;
            }
        }
        Texture {
            w,
            h,
            pixels,
            xscale: 1.0,
            yscale: 1.0,
        }
    }

    #[test]
    fn turning_pans_the_panorama() {
        let mut world = World::parse(crate::world::level_fixtures::SQUARE_LEVEL).unwrap();
        let mut bank = TextureBank::new();
        let sky = bank.push(gradient_sky());

        let mut renderer = Software::new(64, 32);
        renderer.sky = sky;

        renderer.draw_sky(world.player(), &bank);
        let before = renderer.frame()[0];

        world.player_mut().direction = 1.0;
        renderer.draw_sky(world.player(), &bank);
        let after = renderer.frame()[0];

        assert_ne!(before, after, "sky did not pan with direction");
    }

    #[test]
    fn full_turn_is_seamless() {
        let world = World::parse(crate::world::level_fixtures::SQUARE_LEVEL).unwrap();
        let mut bank = TextureBank::new();
        let sky = bank.push(gradient_sky());

        let mut renderer = Software::new(64, 32);
        renderer.sky = sky;
        renderer.draw_sky(world.player(), &bank);
        let zero: Vec<u32> = renderer.frame().to_vec();

        let mut turned = World::parse(crate::world::level_fixtures::SQUARE_LEVEL).unwrap();
        turned.player_mut().direction = TAU;
        renderer.draw_sky(turned.player(), &bank);
        assert_eq!(renderer.frame(), &zero[..]);
    }

    #[test]
    fn yaw_shifts_and_clamps_vertically() {
        let mut world = World::parse(crate::world::level_fixtures::SQUARE_LEVEL).unwrap();
        let mut bank = TextureBank::new();
        let sky = bank.push(gradient_sky());

        let mut renderer = Software::new(64, 32);
        renderer.sky = sky;

        // Hard down-look: the band clamps at the bottom texture row.
        world.player_mut().yaw = MAX_YAW;
        renderer.draw_sky(world.player(), &bank);
        let bottom_row_v = renderer.frame()[(32 - 1) * 64] & 0xFF;
        assert_eq!(bottom_row_v, 31);

        // Hard up-look clamps at the top row.
        world.player_mut().yaw = -MAX_YAW;
        renderer.draw_sky(world.player(), &bank);
        let top_row_v = renderer.frame()[0] & 0xFF;
        assert_eq!(top_row_v, 0);
    }
}
