//! # World Module
//!
//! The authoritative voxel store. A [`World`] owns every chunk created so
//! far, the deferred edit queue, and the remesh queue; everything that
//! reads or writes voxels goes through it so that chunk borders, missing
//! chunks, and not-yet-populated chunks all resolve the same way.
//!
//! ## Bounds
//!
//! The world is a `world_size_in_chunks²` grid of chunk columns. The
//! outermost ring of that grid is never playable: voxel queries there
//! read as air and chunks are never created for it, which gives border
//! chunks a well-defined (empty) outside to mesh against.
//!
//! ## Deferred edits
//!
//! Structure generation emits voxel writes instead of writing directly;
//! they queue here and land once their target chunk is populated. An edit
//! whose chunk does not exist yet creates a placeholder to wait in. Each
//! drain pass is bounded by the queue length at entry, so edits that are
//! still waiting roll over to the next pass instead of spinning.

use std::collections::{HashMap, VecDeque};

use cgmath::Point3;
use log::{debug, warn};

use crate::engine_state::settings::WorldSettings;
use crate::engine_state::voxels::block::{self, BlockCatalog, BlockId};
use crate::engine_state::voxels::chunk::{Chunk, ChunkCoord};
use crate::engine_state::voxels::generator::TerrainGenerator;

/// One deferred voxel write at a global position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VoxelEdit {
    /// Global voxel position.
    pub position: Point3<i32>,
    /// Block to write there.
    pub block: BlockId,
}

/// Every chunk created so far, plus the queues that drive updates.
pub struct World {
    /// The settings the world was built from.
    pub settings: WorldSettings,
    /// Block definitions, indexed by id.
    pub catalog: BlockCatalog,
    /// Deterministic terrain source shared by population and fallbacks.
    pub generator: TerrainGenerator,
    /// All chunks created so far. Chunks are never removed.
    pub chunks: HashMap<ChunkCoord, Chunk>,
    /// Deferred voxel edits waiting for their chunk to become editable.
    pub pending_edits: VecDeque<VoxelEdit>,
    /// Chunks whose cached mesh no longer matches their voxels.
    pub remesh_queue: Vec<ChunkCoord>,
}

impl World {
    /// Creates an empty world.
    ///
    /// # Arguments
    /// * `settings` - Validated world settings
    /// * `catalog` - The block catalog to resolve ids against
    pub fn new(settings: &WorldSettings, catalog: BlockCatalog) -> Self {
        let generator = TerrainGenerator::new(settings, &catalog);
        World {
            settings: settings.clone(),
            catalog,
            generator,
            chunks: HashMap::new(),
            pending_edits: VecDeque::new(),
            remesh_queue: Vec::new(),
        }
    }

    /// Whether a chunk coordinate lies in the playable area.
    ///
    /// The outermost ring of the chunk grid is excluded on purpose; see
    /// the module docs.
    pub fn is_chunk_in_world(&self, coord: ChunkCoord) -> bool {
        let edge = self.settings.world_size_in_chunks as i32 - 1;
        coord.x > 0 && coord.x < edge && coord.z > 0 && coord.z < edge
    }

    /// Whether a global voxel position lies inside the playable volume.
    pub fn in_voxel_bounds(&self, position: Point3<i32>) -> bool {
        let coord = ChunkCoord::of_global(position, self.settings.chunk_width);
        self.is_chunk_in_world(coord)
            && position.y >= 0
            && position.y < self.settings.chunk_height as i32
    }

    /// Reads the block id at a global position.
    ///
    /// Outside the playable volume this is air. Inside it, a populated
    /// chunk answers from its buffer; a missing or placeholder chunk
    /// falls back to the terrain generator, so callers always see the
    /// terrain that population would produce there.
    pub fn voxel_id_at(&self, position: Point3<i32>) -> BlockId {
        if !self.in_voxel_bounds(position) {
            return block::AIR;
        }
        let coord = ChunkCoord::of_global(position, self.settings.chunk_width);
        match self.chunks.get(&coord) {
            Some(chunk) if chunk.is_populated() => chunk.voxel_at_global(position),
            _ => self.generator.classify(position),
        }
    }

    /// Whether the block at a global position is solid.
    pub fn is_voxel_solid(&self, position: Point3<i32>) -> bool {
        self.catalog.is_solid(self.voxel_id_at(position))
    }

    /// Writes a block directly at a global position.
    ///
    /// Only populated chunks accept direct writes. The touched chunk is
    /// queued for remesh, and when the position sits on a chunk border
    /// the neighbors sharing that border are queued too, so their culled
    /// faces reappear.
    ///
    /// # Returns
    /// `false` when the position is out of bounds or its chunk is not
    /// editable yet.
    pub fn set_voxel(&mut self, position: Point3<i32>, id: BlockId) -> bool {
        if !self.in_voxel_bounds(position) {
            return false;
        }
        let width = self.settings.chunk_width as i32;
        let coord = ChunkCoord::of_global(position, self.settings.chunk_width);

        let mut touched = Vec::with_capacity(3);
        match self.chunks.get_mut(&coord) {
            Some(chunk) if chunk.is_populated() => {
                if !chunk.set_voxel_global(position, id) {
                    return false;
                }
                touched.push(coord);
                let origin = chunk.origin();
                let local_x = position.x - origin.x;
                let local_z = position.z - origin.z;
                if local_x == 0 {
                    touched.push(ChunkCoord::new(coord.x - 1, coord.z));
                }
                if local_x == width - 1 {
                    touched.push(ChunkCoord::new(coord.x + 1, coord.z));
                }
                if local_z == 0 {
                    touched.push(ChunkCoord::new(coord.x, coord.z - 1));
                }
                if local_z == width - 1 {
                    touched.push(ChunkCoord::new(coord.x, coord.z + 1));
                }
            }
            _ => return false,
        }

        for coord in touched {
            self.queue_remesh(coord);
        }
        true
    }

    /// Queues a deferred voxel edit.
    pub fn queue_edit(&mut self, edit: VoxelEdit) {
        self.pending_edits.push_back(edit);
    }

    /// Drains the deferred edit queue once.
    ///
    /// Each edit either lands in its (populated) chunk, rolls back onto
    /// the queue because the chunk is not editable yet, or is dropped as
    /// out of bounds. Chunks that received edits are queued for remesh.
    /// The pass is bounded by the queue length at entry.
    pub fn apply_pending_edits(&mut self) {
        let budget = self.pending_edits.len();
        if budget == 0 {
            return;
        }

        let width = self.settings.chunk_width;
        let height = self.settings.chunk_height;
        let mut touched: Vec<ChunkCoord> = Vec::new();
        let mut applied = 0usize;
        let mut waiting = 0usize;

        for _ in 0..budget {
            let Some(edit) = self.pending_edits.pop_front() else {
                break;
            };
            if !self.in_voxel_bounds(edit.position) {
                warn!(
                    "Dropping voxel edit at {:?}: outside the playable volume",
                    edit.position
                );
                continue;
            }
            let coord = ChunkCoord::of_global(edit.position, width);
            let chunk = self
                .chunks
                .entry(coord)
                .or_insert_with(|| Chunk::new(coord, width, height));
            if chunk.is_populated() {
                chunk.set_voxel_global(edit.position, edit.block);
                if !touched.contains(&coord) {
                    touched.push(coord);
                }
                applied += 1;
            } else {
                self.pending_edits.push_back(edit);
                waiting += 1;
            }
        }

        if applied > 0 || waiting > 0 {
            debug!(
                "Edit pass: {} applied, {} still waiting for population",
                applied, waiting
            );
        }
        for coord in touched {
            self.queue_remesh(coord);
        }
    }

    /// Queues a chunk for remeshing.
    ///
    /// Chunks that have never been meshed are skipped; their first mesh
    /// is already on its way through the pipeline and will pick up the
    /// current voxels when it runs.
    pub fn queue_remesh(&mut self, coord: ChunkCoord) {
        match self.chunks.get(&coord) {
            Some(chunk) if chunk.mesh().is_some() => {
                if !self.remesh_queue.contains(&coord) {
                    self.remesh_queue.push(coord);
                }
            }
            _ => {}
        }
    }

    /// Takes the current remesh queue, leaving it empty.
    pub fn take_remesh_queue(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.remesh_queue)
    }

    /// Ensures a chunk exists at a coordinate, creating a placeholder if
    /// needed. Coordinates outside the playable area are ignored.
    pub fn create_chunk(&mut self, coord: ChunkCoord) {
        if !self.is_chunk_in_world(coord) {
            return;
        }
        let width = self.settings.chunk_width;
        let height = self.settings.chunk_height;
        self.chunks
            .entry(coord)
            .or_insert_with(|| Chunk::new(coord, width, height));
    }

    /// Runs terrain population for a chunk.
    ///
    /// Structure blocks emitted during population go onto the deferred
    /// edit queue, where the next edit pass routes them, in this chunk or
    /// across its borders. Populating an already populated or missing
    /// chunk does nothing.
    pub fn populate_chunk(&mut self, coord: ChunkCoord) {
        let mut spilled = Vec::new();
        let generator = &self.generator;
        match self.chunks.get_mut(&coord) {
            Some(chunk) if !chunk.is_populated() => chunk.populate(generator, &mut spilled),
            Some(_) => return,
            None => {
                warn!("Asked to populate chunk {:?} before it was created", coord);
                return;
            }
        }
        if !spilled.is_empty() {
            debug!(
                "Population of chunk {:?} emitted {} structure edits",
                coord,
                spilled.len()
            );
        }
        self.pending_edits.extend(spilled);
    }

    /// Where an observer should start: the center of the world, near the
    /// top of the column.
    pub fn spawn_position(&self) -> Point3<f32> {
        let center = (self.settings.world_size_in_voxels() / 2) as f32;
        let y = self.settings.chunk_height as f32 - 50.0;
        Point3::new(center, y, center)
    }

    /// Number of chunks created so far, placeholders included.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks the generator has populated.
    pub fn populated_chunk_count(&self) -> usize {
        self.chunks.values().filter(|c| c.is_populated()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::meshing::MeshData;

    fn small_settings() -> WorldSettings {
        WorldSettings {
            chunk_width: 4,
            chunk_height: 16,
            world_size_in_chunks: 12,
            ..WorldSettings::default()
        }
    }

    fn small_world() -> World {
        World::new(&small_settings(), BlockCatalog::builtin())
    }

    fn populated_world_at(coord: ChunkCoord) -> World {
        let mut world = small_world();
        world.create_chunk(coord);
        world.populate_chunk(coord);
        world
    }

    #[test]
    fn test_missing_chunks_fall_back_to_the_generator() {
        let world = small_world();
        let position = Point3::new(21, 3, 22);
        assert_eq!(world.voxel_id_at(position), world.generator.classify(position));
        assert_eq!(world.voxel_id_at(Point3::new(21, 0, 22)), block::BEDROCK);
    }

    #[test]
    fn test_border_ring_reads_as_air() {
        let world = small_world();
        // Chunk (0, 0) and the far edge are outside the playable area.
        assert_eq!(world.voxel_id_at(Point3::new(1, 0, 1)), block::AIR);
        assert_eq!(world.voxel_id_at(Point3::new(45, 0, 21)), block::AIR);
        assert!(!world.is_voxel_solid(Point3::new(1, 0, 1)));
        // One chunk inward the floor is bedrock again.
        assert_eq!(world.voxel_id_at(Point3::new(5, 0, 5)), block::BEDROCK);
    }

    #[test]
    fn test_vertical_bounds_read_as_air() {
        let world = small_world();
        assert_eq!(world.voxel_id_at(Point3::new(21, -1, 21)), block::AIR);
        assert_eq!(world.voxel_id_at(Point3::new(21, 16, 21)), block::AIR);
    }

    #[test]
    fn test_populated_chunks_answer_from_their_buffer() {
        let coord = ChunkCoord::new(5, 5);
        let mut world = populated_world_at(coord);
        let position = Point3::new(21, 5, 21);
        let before = world.voxel_id_at(position);
        assert_eq!(before, world.chunks[&coord].voxel_at_global(position));

        assert!(world.set_voxel(position, block::WOOD));
        assert_eq!(world.voxel_id_at(position), block::WOOD);
    }

    #[test]
    fn test_set_voxel_rejects_unpopulated_targets() {
        let mut world = small_world();
        let position = Point3::new(21, 5, 21);
        assert!(!world.set_voxel(position, block::STONE));

        world.create_chunk(ChunkCoord::new(5, 5));
        assert!(!world.set_voxel(position, block::STONE));
    }

    #[test]
    fn test_border_writes_queue_neighbor_remeshes() {
        let mut world = small_world();
        for coord in [ChunkCoord::new(5, 5), ChunkCoord::new(4, 5)] {
            world.create_chunk(coord);
            world.populate_chunk(coord);
            let chunk = world.chunks.get_mut(&coord).unwrap();
            chunk.set_mesh(MeshData::new());
        }

        // Local x == 0 in chunk (5, 5) touches the border with (4, 5).
        assert!(world.set_voxel(Point3::new(20, 5, 22), block::AIR));
        let queue = world.take_remesh_queue();
        assert!(queue.contains(&ChunkCoord::new(5, 5)));
        assert!(queue.contains(&ChunkCoord::new(4, 5)));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_never_meshed_chunks_skip_the_remesh_queue() {
        let coord = ChunkCoord::new(5, 5);
        let mut world = populated_world_at(coord);
        assert!(world.set_voxel(Point3::new(22, 5, 22), block::STONE));
        assert!(world.take_remesh_queue().is_empty());
    }

    #[test]
    fn test_deferred_edit_lands_in_populated_chunk() {
        let coord = ChunkCoord::new(5, 5);
        let mut world = populated_world_at(coord);
        world.chunks.get_mut(&coord).unwrap().set_mesh(MeshData::new());

        let position = Point3::new(22, 9, 22);
        world.queue_edit(VoxelEdit {
            position,
            block: block::LEAVES,
        });
        world.apply_pending_edits();

        assert_eq!(world.voxel_id_at(position), block::LEAVES);
        assert!(world.pending_edits.is_empty());
        assert_eq!(world.take_remesh_queue(), vec![coord]);
    }

    #[test]
    fn test_deferred_edit_creates_a_waiting_placeholder() {
        let mut world = small_world();
        let position = Point3::new(22, 9, 22);
        world.queue_edit(VoxelEdit {
            position,
            block: block::WOOD,
        });
        world.apply_pending_edits();

        // The edit created a placeholder and is still waiting in line.
        let coord = ChunkCoord::new(5, 5);
        assert!(world.chunks.contains_key(&coord));
        assert!(!world.chunks[&coord].is_populated());
        assert_eq!(world.pending_edits.len(), 1);

        // Once the chunk is populated the next pass lands it.
        world.populate_chunk(coord);
        world.apply_pending_edits();
        assert_eq!(world.voxel_id_at(position), block::WOOD);
    }

    #[test]
    fn test_out_of_bounds_edits_are_dropped() {
        let mut world = small_world();
        world.queue_edit(VoxelEdit {
            position: Point3::new(1, 0, 1),
            block: block::STONE,
        });
        world.queue_edit(VoxelEdit {
            position: Point3::new(21, 40, 21),
            block: block::STONE,
        });
        world.apply_pending_edits();
        assert!(world.pending_edits.is_empty());
    }

    #[test]
    fn test_create_chunk_refuses_the_border_ring() {
        let mut world = small_world();
        world.create_chunk(ChunkCoord::new(0, 5));
        world.create_chunk(ChunkCoord::new(11, 5));
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn test_spawn_position_sits_at_world_center() {
        let world = small_world();
        let spawn = world.spawn_position();
        assert_eq!(spawn.x, 24.0);
        assert_eq!(spawn.z, 24.0);
    }
}
