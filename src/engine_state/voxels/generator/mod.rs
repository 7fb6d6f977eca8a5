//! # Terrain Generator Module
//!
//! Deterministic voxel classification. The generator is a pure function of
//! (seed, biome, position): it can be asked for any global position at any
//! time, before or after the owning chunk exists, and always answers the
//! same. Chunk population, the mesher's border sampling and solidity
//! queries against unloaded terrain all go through it.
//!
//! ## Passes
//!
//! Classification runs a fixed pass order, each able to short-circuit:
//!
//! 1. World bounds: outside the voxel extent everything is air.
//! 2. Bedrock: the y = 0 layer is always bedrock.
//! 3. Surface: grass at the terrain height, a four-voxel dirt band under
//!    it, stone below, air above.
//! 4. Lodes: stone cells are re-rolled against each configured lode in
//!    order; a later lode overwrites an earlier one.
//! 5. Structures: surface cells may anchor a tree, emitted as deferred
//!    edits rather than as the cell's own value.

pub mod structures;

use cgmath::Point3;
use log::warn;

use crate::engine_state::settings::WorldSettings;
use crate::engine_state::voxels::biome::BiomeSettings;
use crate::engine_state::voxels::block::{self, BlockCatalog, BlockId};
use crate::engine_state::voxels::noise_field::{NoiseField, WorldSeed};
use crate::engine_state::voxels::world::VoxelEdit;

/// Stateless terrain classification for one world.
///
/// Holds the seeded noise field, the biome parameters and the lode target
/// ids resolved once at construction. Cloning settings into the generator
/// keeps classification free of any lock on world state.
pub struct TerrainGenerator {
    noise: NoiseField,
    biome: BiomeSettings,
    lode_blocks: Vec<BlockId>,
    world_size_in_voxels: i32,
    chunk_height: i32,
}

impl TerrainGenerator {
    /// Builds a generator from world settings and a block catalog.
    ///
    /// Lode block names are resolved against the catalog here; a name the
    /// catalog does not know degrades to air with a warning. Settings
    /// validation reports the same situation as a fatal configuration error
    /// before a world is ever built, so the degraded path only matters for
    /// hand-assembled settings.
    ///
    /// # Arguments
    /// * `settings` - The world settings, including the biome
    /// * `catalog` - The block catalog used to resolve lode targets
    pub fn new(settings: &WorldSettings, catalog: &BlockCatalog) -> Self {
        let lode_blocks = settings
            .biome
            .lodes
            .iter()
            .map(|lode| {
                catalog.id_of(&lode.block).unwrap_or_else(|| {
                    warn!("lode '{}' names unknown block '{}', substituting air", lode.name, lode.block);
                    block::AIR
                })
            })
            .collect();

        TerrainGenerator {
            noise: NoiseField::new(WorldSeed(settings.seed), settings.chunk_width),
            biome: settings.biome.clone(),
            lode_blocks,
            world_size_in_voxels: settings.world_size_in_voxels(),
            chunk_height: settings.chunk_height as i32,
        }
    }

    /// Whether a global voxel position lies inside the world extent.
    pub fn in_voxel_bounds(&self, position: Point3<i32>) -> bool {
        position.x >= 0
            && position.x < self.world_size_in_voxels
            && position.y >= 0
            && position.y < self.chunk_height
            && position.z >= 0
            && position.z < self.world_size_in_voxels
    }

    /// Terrain surface height for a column.
    ///
    /// # Arguments
    /// * `x` - Global x coordinate
    /// * `z` - Global z coordinate
    ///
    /// # Returns
    /// The y of the grass cell capping the column.
    pub fn terrain_height_at(&self, x: i32, z: i32) -> i32 {
        let sample = self.noise.sample2d(x as f64, z as f64, 0.0, self.biome.terrain_scale);
        (self.biome.terrain_height as f64 * sample).floor() as i32 + self.biome.solid_ground_height
    }

    /// Classifies a voxel position without structure side effects.
    ///
    /// This is the chunk-boundary-independent answer used for border
    /// sampling and solidity fallbacks. Out-of-bounds positions are air.
    pub fn classify(&self, position: Point3<i32>) -> BlockId {
        self.voxel_for(position, None)
    }

    /// Classifies a voxel position and emits any structure anchored there.
    ///
    /// Identical to [`classify`](Self::classify) for the returned value;
    /// additionally, when the position is a surface cell passing both tree
    /// gates, the tree's blocks are appended to `edits` for deferred
    /// application. The surface cell itself stays grass.
    ///
    /// # Arguments
    /// * `position` - Global voxel position
    /// * `edits` - Sink for structure blocks spilling anywhere in the world
    pub fn generate(&self, position: Point3<i32>, edits: &mut Vec<VoxelEdit>) -> BlockId {
        self.voxel_for(position, Some(edits))
    }

    fn voxel_for(&self, position: Point3<i32>, edits: Option<&mut Vec<VoxelEdit>>) -> BlockId {
        if !self.in_voxel_bounds(position) {
            return block::AIR;
        }
        if position.y == 0 {
            return block::BEDROCK;
        }

        let terrain_height = self.terrain_height_at(position.x, position.z);

        let mut voxel = if position.y == terrain_height {
            block::GRASS
        } else if position.y < terrain_height && position.y > terrain_height - 4 {
            block::DIRT
        } else if position.y > terrain_height {
            return block::AIR;
        } else {
            block::STONE
        };

        if voxel == block::STONE {
            for (lode, lode_block) in self.biome.lodes.iter().zip(&self.lode_blocks) {
                if position.y > lode.min_height
                    && position.y < lode.max_height
                    && self.noise.sample3d(position, lode.noise_offset, lode.scale, lode.threshold)
                {
                    voxel = *lode_block;
                }
            }
        }

        if let Some(edits) = edits {
            if position.y == terrain_height
                && self.noise.sample2d(
                    position.x as f64,
                    position.z as f64,
                    0.0,
                    self.biome.trees.zone_scale,
                ) > self.biome.trees.zone_threshold
                && self.noise.sample2d(
                    position.x as f64,
                    position.z as f64,
                    0.0,
                    self.biome.trees.placement_scale,
                ) > self.biome.trees.placement_threshold
            {
                structures::stamp_tree(position, &self.noise, &self.biome.trees, edits);
            }
        }

        voxel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> TerrainGenerator {
        let settings = WorldSettings::default();
        let catalog = BlockCatalog::builtin();
        TerrainGenerator::new(&settings, &catalog)
    }

    #[test]
    fn test_out_of_bounds_is_air() {
        let generator = generator();
        assert_eq!(generator.classify(Point3::new(-1, 10, 10)), block::AIR);
        assert_eq!(generator.classify(Point3::new(10, -1, 10)), block::AIR);
        assert_eq!(generator.classify(Point3::new(10, 10_000, 10)), block::AIR);
    }

    #[test]
    fn test_floor_is_bedrock() {
        let generator = generator();
        for x in 1..40 {
            assert_eq!(generator.classify(Point3::new(x, 0, 25)), block::BEDROCK);
        }
    }

    #[test]
    fn test_surface_is_grass_over_dirt() {
        let generator = generator();
        for x in [20, 100, 333] {
            let height = generator.terrain_height_at(x, 50);
            assert_eq!(generator.classify(Point3::new(x, height, 50)), block::GRASS);
            for y in (height - 3)..height {
                assert_eq!(generator.classify(Point3::new(x, y, 50)), block::DIRT);
            }
            assert_eq!(generator.classify(Point3::new(x, height + 1, 50)), block::AIR);
        }
    }

    #[test]
    fn test_terrain_height_stays_in_the_biome_band() {
        let generator = generator();
        let biome = BiomeSettings::default();
        for x in 0..200 {
            let height = generator.terrain_height_at(x, 77);
            assert!(height >= biome.solid_ground_height);
            assert!(height <= biome.solid_ground_height + biome.terrain_height);
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        let a = generator();
        let b = generator();
        for x in 0..32 {
            for y in 0..64 {
                let position = Point3::new(x, y, 40);
                assert_eq!(a.classify(position), b.classify(position));
            }
        }
    }

    #[test]
    fn test_deep_cells_are_stone_or_lode_blocks() {
        let generator = generator();
        let catalog = BlockCatalog::builtin();
        let mut lode_targets: Vec<BlockId> = BiomeSettings::default()
            .lodes
            .iter()
            .filter_map(|lode| catalog.id_of(&lode.block))
            .collect();
        lode_targets.push(block::STONE);

        for x in 10..60 {
            let height = generator.terrain_height_at(x, 30);
            for y in 1..(height - 4) {
                let id = generator.classify(Point3::new(x, y, 30));
                assert!(lode_targets.contains(&id), "unexpected block {} at ({}, {}, 30)", id, x, y);
            }
        }
    }

    #[test]
    fn test_generate_matches_classify_for_the_anchor_cell() {
        let generator = generator();
        let mut edits = Vec::new();
        for x in 10..60 {
            for z in 10..60 {
                let height = generator.terrain_height_at(x, z);
                let position = Point3::new(x, height, z);
                assert_eq!(generator.generate(position, &mut edits), generator.classify(position));
            }
        }
    }

    #[test]
    fn test_trees_emit_wood_and_leaves_somewhere() {
        let generator = generator();
        let mut edits = Vec::new();
        for x in 0..600 {
            for z in 0..40 {
                let height = generator.terrain_height_at(x, z);
                generator.generate(Point3::new(x, height, z), &mut edits);
            }
        }
        assert!(edits.iter().any(|edit| edit.block == block::WOOD), "no trunks in 600x40 columns");
        assert!(edits.iter().any(|edit| edit.block == block::LEAVES));
    }
}
