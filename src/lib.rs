//! Software-rendered portal engine.
//!
//! A 2-D floorplan of sectors connected by portal walls is rendered as a
//! first-person 3-D scene each frame, Build-engine style: portal flood,
//! visibility-sorted walls, per-column occlusion windows, ray-cast
//! floors/ceilings.  The same topology doubles as the collision world for
//! the player mob.
//!
//! ```bash
//! cargo run --release -- assets/demo.txt
//! ```

pub mod assets;
pub mod geom;
pub mod input;
pub mod renderer;
pub mod sim;
pub mod world;
