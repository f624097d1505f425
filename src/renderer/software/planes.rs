//! Floor and ceiling shading: per-pixel ray-cast through the inverse of
//! the wall Y-projection onto the sector's horizontal plane.

use crate::world::{Mob, TextureBank, TextureId};

use super::{Software, shade};

impl Software {
    /// Paint rows `y_from..=y_to` of one column with the sector plane at
    /// world elevation `plane_z` (above the eye for ceilings, below for
    /// floors).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn draw_plane_column(
        &mut self,
        col: usize,
        y_from: i32,
        y_to: i32,
        plane_z: f64,
        tex_id: TextureId,
        brightness: u8,
        cam: &Mob,
        bank: &TextureBank,
    ) {
        if y_from > y_to {
            return;
        }
        let Some(tex) = bank.get(tex_id) else {
            return;
        };

        let (sin, cos) = cam.direction.sin_cos();
        let rel = plane_z - cam.eye_z();
        let half_h = self.height as f64 * 0.5;
        let half_w = self.width as f64 * 0.5;
        let x_centered = col as f64 - half_w;

        for y in y_from..=y_to {
            // Invert the Y projection to recover the forward distance of
            // the plane point under this pixel.
            let denom = (half_h - y as f64) - cam.yaw * self.vfov;
            if denom.abs() < 1e-9 {
                continue;
            }
            let map_z = rel * self.vfov / denom;
            if map_z <= 0.0 {
                continue;
            }
            let map_x = map_z * x_centered / self.hfov;

            // Rotate back out of camera space and translate to the world.
            let wx = cam.pos.x + map_z * cos + map_x * sin;
            let wy = cam.pos.y + map_z * sin - map_x * cos;

            let tu = (((wx / tex.xscale) * tex.w as f64).rem_euclid(tex.w as f64) as usize)
                .min(tex.w - 1);
            let tv = (((wy / tex.yscale) * tex.h as f64).rem_euclid(tex.h as f64) as usize)
                .min(tex.h - 1);

            self.scratch[y as usize * self.width + col] =
                shade(tex.pixels[tv * tex.w + tu], brightness, map_z);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::renderer::Software;
    use crate::world::{Texture, TextureBank, World};

    /// The ray-cast must agree with the forward wall projection: the
    /// floor directly below the facing wall's base sits at the wall's
    /// depth, so the last floor row before the wall shades like depth ≈ 5.
    #[test]
    fn floor_depth_increases_towards_the_wall() {
        let world = World::parse(crate::world::level_fixtures::SQUARE_LEVEL).unwrap();
        let mut bank = TextureBank::new();
        for _ in 0..3 {
            bank.push(Texture::solid(0x00_00_FF, 4, 4));
        }

        let mut renderer = Software::new(200, 100);
        renderer.draw_world(&world, &bank);

        let mid = 100;
        let near_row = 99; // directly under the camera
        let far_row = 76; // just below the wall base at depth 5

        let blue = |y: usize| renderer.frame()[y * 200 + mid] & 0xFF;
        assert!(
            blue(near_row) > blue(far_row),
            "floor does not darken with distance: {} vs {}",
            blue(near_row),
            blue(far_row)
        );
    }
}
