//! The fixed, ordered texture table and its PNG loader.
//!
//! Level data refers to textures by index into [`TEXTURE_TABLE`]; the
//! world-unit scale of each texture is configured here, not in level
//! files.  Only `.png` files are supported – anything else fails the
//! load, which aborts startup.

use std::fs::File;
use std::path::Path;

use thiserror::Error;

use crate::world::{Texture, TextureBank, TextureId};

/// One entry of the asset table: file path plus how many world units a
/// single tiling of the image covers horizontally / vertically.
pub struct TextureDef {
    pub path: &'static str,
    pub xscale: f64,
    pub yscale: f64,
}

/// Wall, floor and ceiling art in id order.
pub const TEXTURE_TABLE: &[TextureDef] = &[
    TextureDef {
        path: "assets/textures/brick.png",
        xscale: 4.0,
        yscale: 4.0,
    },
    TextureDef {
        path: "assets/textures/smoothstone.png",
        xscale: 4.0,
        yscale: 4.0,
    },
    TextureDef {
        path: "assets/textures/moss.png",
        xscale: 8.0,
        yscale: 8.0,
    },
    TextureDef {
        path: "assets/textures/rustysheet.png",
        xscale: 2.0,
        yscale: 2.0,
    },
];

/// Panorama used by the sky fill; not part of the level-addressable table.
pub const SKY_PATH: &str = "assets/textures/sky.png";

/// Things that can go wrong while loading art.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("unsupported texture extension for `{0}` (only .png)")]
    UnsupportedExtension(String),

    #[error("could not open `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: png::DecodingError,
    },

    #[error("`{path}`: unsupported PNG colour layout")]
    Layout { path: String },
}

/// Load the whole table into the bank, in id order.
pub fn load_textures(bank: &mut TextureBank) -> Result<(), AssetError> {
    for def in TEXTURE_TABLE {
        let tex = decode_png(def.path, def.xscale, def.yscale)?;
        bank.push(tex);
    }
    Ok(())
}

/// Load the skybox and return its id.
pub fn load_sky(bank: &mut TextureBank) -> Result<TextureId, AssetError> {
    let tex = decode_png(SKY_PATH, 1.0, 1.0)?;
    Ok(bank.push(tex))
}

fn decode_png(path: &str, xscale: f64, yscale: f64) -> Result<Texture, AssetError> {
    if Path::new(path).extension().and_then(|e| e.to_str()) != Some("png") {
        return Err(AssetError::UnsupportedExtension(path.into()));
    }

    let file = File::open(path).map_err(|source| AssetError::Io {
        path: path.into(),
        source,
    })?;

    let mut decoder = png::Decoder::new(file);
    // Normalise to 8-bit channels with an alpha channel present.
    decoder.set_transformations(png::Transformations::ALPHA | png::Transformations::STRIP_16);

    let decode_err = |source| AssetError::Decode {
        path: path.into(),
        source,
    };

    let mut reader = decoder.read_info().map_err(decode_err)?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(decode_err)?;

    let w = info.width as usize;
    let h = info.height as usize;
    let mut pixels = Vec::with_capacity(w * h);

    match info.color_type {
        png::ColorType::Rgba => {
            for px in buf.chunks_exact(4).take(w * h) {
                pixels.push(u32::from(px[0]) << 16 | u32::from(px[1]) << 8 | u32::from(px[2]));
            }
        }
        png::ColorType::GrayscaleAlpha => {
            for px in buf.chunks_exact(2).take(w * h) {
                let g = u32::from(px[0]);
                pixels.push(g << 16 | g << 8 | g);
            }
        }
        _ => return Err(AssetError::Layout { path: path.into() }),
    }

    Ok(Texture {
        w,
        h,
        pixels,
        xscale,
        yscale,
    })
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_png_extensions_are_rejected() {
        let err = decode_png("wall.bmp", 1.0, 1.0).unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedExtension(_)));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = decode_png("does/not/exist.png", 1.0, 1.0).unwrap_err();
        match err {
            AssetError::Io { path, .. } => assert_eq!(path, "does/not/exist.png"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn table_ids_match_insertion_order() {
        assert!(!TEXTURE_TABLE.is_empty());
        // Every entry must already satisfy the extension rule; the table
        // is code, not data, so this is a programming-error guard.
        for def in TEXTURE_TABLE {
            assert!(def.path.ends_with(".png"), "{}", def.path);
            assert!(def.xscale > 0.0 && def.yscale > 0.0);
        }
    }
}
