//! # Neighborhood Module
//!
//! Occlusion snapshot used by the chunk mesher. Face culling needs to ask
//! "does the cell next door hide this face?" for every voxel in a chunk,
//! including cells that live in neighboring chunks. [`Neighborhood`]
//! answers that from a padded bitmask captured once per mesh build:
//! one bit per cell over the chunk plus a one-voxel border on every side.
//!
//! Capturing up front means the mesher never touches the world mid-walk,
//! and border cells resolve through the world exactly once whether the
//! neighbor chunk is populated, a placeholder, or not created yet.

use bitvec::prelude::*;
use cgmath::Point3;

use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::world::World;

/// One bit per cell over a chunk and its one-voxel border.
///
/// Local coordinates run `-1..=width` on x/z and `-1..=height` on y; the
/// padding rows hold whatever the world reports for those cells, so
/// faces on chunk borders cull against real neighbor data.
pub struct Neighborhood {
    bits: BitVec,
    width: usize,
    height: usize,
}

impl Neighborhood {
    /// Captures the occlusion mask for one chunk.
    ///
    /// Interior cells read straight from the chunk's buffer; the border
    /// goes through [`World::voxel_id_at`], which falls back to the
    /// terrain generator when the neighbor is missing or unpopulated.
    ///
    /// # Arguments
    /// * `world` - The world the chunk lives in
    /// * `chunk` - The chunk being meshed
    pub fn capture(world: &World, chunk: &Chunk) -> Self {
        let width = chunk.width();
        let height = chunk.height();
        let padded_width = width + 2;
        let padded_height = height + 2;
        let origin = chunk.origin();

        let mut bits = bitvec![0; padded_width * padded_width * padded_height];
        for py in 0..padded_height {
            for pz in 0..padded_width {
                for px in 0..padded_width {
                    let x = px as i32 - 1;
                    let y = py as i32 - 1;
                    let z = pz as i32 - 1;
                    let interior = x >= 0
                        && (x as usize) < width
                        && y >= 0
                        && (y as usize) < height
                        && z >= 0
                        && (z as usize) < width;
                    let id = if interior {
                        chunk.voxel_at(x as usize, y as usize, z as usize)
                    } else {
                        world.voxel_id_at(Point3::new(origin.x + x, y, origin.z + z))
                    };
                    if world.catalog.occludes(id) {
                        bits.set(px + pz * padded_width + py * padded_width * padded_width, true);
                    }
                }
            }
        }

        Neighborhood {
            bits,
            width,
            height,
        }
    }

    /// Whether the cell at chunk-local coordinates hides an adjacent face.
    ///
    /// Accepts coordinates from `-1` through `width` (or `height` on y);
    /// anything further out reads as open.
    pub fn occludes(&self, x: i32, y: i32, z: i32) -> bool {
        let px = x + 1;
        let py = y + 1;
        let pz = z + 1;
        if px < 0 || py < 0 || pz < 0 {
            return false;
        }
        let (px, py, pz) = (px as usize, py as usize, pz as usize);
        let padded_width = self.width + 2;
        if px >= padded_width || pz >= padded_width || py >= self.height + 2 {
            return false;
        }
        self.bits[px + pz * padded_width + py * padded_width * padded_width]
    }
}
