mod geometry;
mod level;
mod mob;
mod texture;

pub use geometry::{Sector, SectorId, VertexId, Wall, World};

pub use level::LevelError;

pub use mob::{
    MAX_YAW, Mob, PLAYER_CROUCH_HEIGHT, PLAYER_EYE_MARGIN, PLAYER_HEIGHT, PLAYER_KNEE_MARGIN,
    PLAYER_RADIUS,
};

pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureId};

#[cfg(test)]
pub(crate) use level::tests as level_fixtures;
