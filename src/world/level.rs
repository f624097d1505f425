//! Text level loader.
//!
//! Line-oriented format, one record per line:
//!
//! ```text
//! v <id> <x> <y>
//! s <id> <floor> <ceil> <tex_floor> <tex_ceil> <brightness> <n>  <v0 v1 nbr low mid high> × n
//! p <x> <y> <sector>
//! ```
//!
//! The `id` columns are ignored – order of appearance defines the id.  A
//! neighbor of `x` means a solid wall.  Parsing is strict: any row that
//! does not parse aborts the load.  A validation pass then checks every
//! invariant the hot path assumes (closed loops, id ranges, portal
//! reciprocity), so neither the solver nor the renderer re-checks them.

use std::path::Path;
use std::str::FromStr;

use glam::{DVec2, dvec2};
use thiserror::Error;

use crate::world::geometry::{Sector, SectorId, Wall, World};
use crate::world::mob::Mob;

/// Things that can go wrong while loading a level.
#[derive(Error, Debug)]
pub enum LevelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {what}")]
    Malformed { line: usize, what: String },

    #[error("no `p` player line in level")]
    NoPlayer,

    #[error("level has no sectors")]
    NoSectors,

    #[error("sector {0} has fewer than 3 walls")]
    DegenerateSector(SectorId),

    #[error("sector {sector}: floor {floor} is not below ceiling {ceil}")]
    FlatSector {
        sector: SectorId,
        floor: f64,
        ceil: f64,
    },

    #[error("sector {sector} wall {wall}: vertex id out of range")]
    BadVertex { sector: SectorId, wall: usize },

    #[error("sector {sector} wall {wall}: neighbor {neighbor} out of range")]
    BadNeighbor {
        sector: SectorId,
        wall: usize,
        neighbor: SectorId,
    },

    #[error("sector {0}: wall loop is not closed")]
    OpenLoop(SectorId),

    #[error("sector {sector} wall {wall}: portal to {neighbor} has no reverse wall")]
    OneWayPortal {
        sector: SectorId,
        wall: usize,
        neighbor: SectorId,
    },

    #[error("player start sector {0} out of range")]
    BadPlayerSector(SectorId),

    #[error("player start ({x}, {y}) is outside sector {sector}")]
    PlayerOutside { x: f64, y: f64, sector: SectorId },
}

/*────────────────────────── row tokenizer ───────────────────────────*/

struct Row<'a> {
    line: usize,
    toks: std::str::SplitWhitespace<'a>,
}

impl<'a> Row<'a> {
    fn new(line: usize, rest: std::str::SplitWhitespace<'a>) -> Self {
        Self { line, toks: rest }
    }

    fn err(&self, what: impl Into<String>) -> LevelError {
        LevelError::Malformed {
            line: self.line,
            what: what.into(),
        }
    }

    fn next_str(&mut self, what: &str) -> Result<&'a str, LevelError> {
        self.toks
            .next()
            .ok_or_else(|| self.err(format!("missing {what}")))
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T, LevelError> {
        let tok = self.next_str(what)?;
        tok.parse()
            .map_err(|_| self.err(format!("bad {what} `{tok}`")))
    }

    fn finish(mut self) -> Result<(), LevelError> {
        match self.toks.next() {
            Some(extra) => Err(self.err(format!("trailing token `{extra}`"))),
            None => Ok(()),
        }
    }
}

/*──────────────────────────── parsing ───────────────────────────────*/

impl World {
    /// Load and validate a level file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Parse and validate level text.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut vertices: Vec<DVec2> = Vec::new();
        let mut sectors: Vec<Sector> = Vec::new();
        let mut start: Option<(DVec2, SectorId)> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut toks = trimmed.split_whitespace();
            let tag = toks.next().unwrap();
            let mut row = Row::new(line, toks);

            match tag {
                "v" => {
                    let _id: i64 = row.next("vertex id")?;
                    let x: f64 = row.next("x")?;
                    let y: f64 = row.next("y")?;
                    row.finish()?;
                    vertices.push(dvec2(x, y));
                }
                "s" => {
                    let _id: i64 = row.next("sector id")?;
                    let floor: f64 = row.next("floor")?;
                    let ceil: f64 = row.next("ceiling")?;
                    let tex_floor: i16 = row.next("floor texture")?;
                    let tex_ceil: i16 = row.next("ceiling texture")?;
                    let brightness: u8 = row.next("brightness")?;
                    let n: usize = row.next("wall count")?;

                    let mut walls = Vec::with_capacity(n);
                    for _ in 0..n {
                        let v0: usize = row.next("wall v0")?;
                        let v1: usize = row.next("wall v1")?;
                        let nbr = row.next_str("wall neighbor")?;
                        let neighbor = if nbr == "x" {
                            None
                        } else {
                            Some(nbr.parse::<usize>().map_err(|_| {
                                row.err(format!("bad wall neighbor `{nbr}`"))
                            })?)
                        };
                        let tex_low: i16 = row.next("low texture")?;
                        let tex_mid: i16 = row.next("mid texture")?;
                        let tex_high: i16 = row.next("high texture")?;
                        walls.push(Wall {
                            v0,
                            v1,
                            neighbor,
                            tex_low,
                            tex_mid,
                            tex_high,
                        });
                    }
                    row.finish()?;

                    sectors.push(Sector {
                        floor,
                        ceil,
                        tex_floor,
                        tex_ceil,
                        brightness,
                        walls,
                    });
                }
                "p" => {
                    let x: f64 = row.next("player x")?;
                    let y: f64 = row.next("player y")?;
                    let sector: usize = row.next("player sector")?;
                    row.finish()?;
                    start = Some((dvec2(x, y), sector));
                }
                other => {
                    return Err(LevelError::Malformed {
                        line,
                        what: format!("unknown tag `{other}`"),
                    });
                }
            }
        }

        let (pos, sector) = start.ok_or(LevelError::NoPlayer)?;
        validate(&vertices, &sectors)?;
        if sector >= sectors.len() {
            return Err(LevelError::BadPlayerSector(sector));
        }

        let mut player = Mob::player(pos, sector);
        player.pos.z = sectors[sector].floor;

        let world = World::new(vertices, sectors, player);
        if !world.inside_sector(pos, sector) {
            return Err(LevelError::PlayerOutside {
                x: pos.x,
                y: pos.y,
                sector,
            });
        }
        Ok(world)
    }
}

/*─────────────────────────── validation ─────────────────────────────*/

fn validate(vertices: &[DVec2], sectors: &[Sector]) -> Result<(), LevelError> {
    if sectors.is_empty() {
        return Err(LevelError::NoSectors);
    }

    for (sid, sect) in sectors.iter().enumerate() {
        if sect.walls.len() < 3 {
            return Err(LevelError::DegenerateSector(sid));
        }
        if sect.floor >= sect.ceil {
            return Err(LevelError::FlatSector {
                sector: sid,
                floor: sect.floor,
                ceil: sect.ceil,
            });
        }

        for (wid, wall) in sect.walls.iter().enumerate() {
            if wall.v0 >= vertices.len() || wall.v1 >= vertices.len() {
                return Err(LevelError::BadVertex {
                    sector: sid,
                    wall: wid,
                });
            }
            let next = &sect.walls[(wid + 1) % sect.walls.len()];
            if wall.v1 != next.v0 {
                return Err(LevelError::OpenLoop(sid));
            }

            if let Some(nbr) = wall.neighbor {
                if nbr >= sectors.len() {
                    return Err(LevelError::BadNeighbor {
                        sector: sid,
                        wall: wid,
                        neighbor: nbr,
                    });
                }
                // The portal must exist on the far side too, traversed the
                // other way and pointing back here.
                let reciprocal = sectors[nbr].walls.iter().any(|w| {
                    w.v0 == wall.v1 && w.v1 == wall.v0 && w.neighbor == Some(sid)
                });
                if !reciprocal {
                    return Err(LevelError::OneWayPortal {
                        sector: sid,
                        wall: wid,
                        neighbor: nbr,
                    });
                }
            }
        }
    }
    Ok(())
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
