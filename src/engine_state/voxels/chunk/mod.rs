//! # Chunk Module
//!
//! Chunks are full-height columns of voxels: `width x height x width` cells
//! addressed by a chunk coordinate on the ground plane. A chunk moves
//! through a small lifecycle:
//!
//! 1. Created as a placeholder (all air, not yet editable) the moment any
//!    part of the system needs it to exist.
//! 2. Populated by the terrain generator, after which it becomes editable.
//! 3. Meshed; the derived mesh is cached on the chunk.
//! 4. Activated and deactivated as the observer moves. Deactivation keeps
//!    every byte of data; a chunk is never destroyed once created.
//!
//! ## Storage
//!
//! Voxels live in one flat boxed slice indexed `x + z*width + y*width²`,
//! one byte per cell. For the default 16x128x16 chunk that is 32 KiB of
//! ids; the dense layout keeps population and meshing walks sequential.

use cgmath::Point3;

use crate::engine_state::meshing::mesh::MeshData;
use crate::engine_state::voxels::block::{self, BlockId};
use crate::engine_state::voxels::generator::TerrainGenerator;
use crate::engine_state::voxels::world::VoxelEdit;

/// Position of a chunk column on the ground plane, in chunk units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// Chunk x coordinate.
    pub x: i32,
    /// Chunk z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk containing a global voxel position.
    ///
    /// Uses euclidean division so that negative positions floor toward the
    /// correct chunk instead of rounding toward zero.
    pub fn of_global(position: Point3<i32>, chunk_width: usize) -> Self {
        let width = chunk_width as i32;
        ChunkCoord {
            x: position.x.div_euclid(width),
            z: position.z.div_euclid(width),
        }
    }

    /// The chunk containing a continuous observer position.
    pub fn containing(position: Point3<f32>, chunk_width: usize) -> Self {
        let width = chunk_width as i32;
        ChunkCoord {
            x: (position.x.floor() as i32).div_euclid(width),
            z: (position.z.floor() as i32).div_euclid(width),
        }
    }
}

/// Whether a chunk is inside the observer's active window.
///
/// Activation is pure bookkeeping: an inactive chunk keeps its voxels and
/// cached mesh, and the display consumer decides what to do with meshes
/// flagged inactive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Inside the active window; meshes should be shown.
    Active,
    /// Outside the active window; data retained, display released.
    Inactive,
}

/// A `width x height x width` column of voxels and its derived state.
pub struct Chunk {
    coord: ChunkCoord,
    width: usize,
    height: usize,
    voxels: Box<[BlockId]>,
    populated: bool,
    activation: Activation,
    mesh: Option<MeshData>,
}

impl Chunk {
    /// Creates a placeholder chunk: all air, unpopulated, inactive.
    ///
    /// Placeholders exist so that deferred edits (a tree spilling over a
    /// border) have somewhere to wait; they become editable only after
    /// [`populate`](Self::populate) runs.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinate
    /// * `width` - Chunk width in voxels
    /// * `height` - Chunk height in voxels
    pub fn new(coord: ChunkCoord, width: usize, height: usize) -> Self {
        Chunk {
            coord,
            width,
            height,
            voxels: vec![block::AIR; width * width * height].into_boxed_slice(),
            populated: false,
            activation: Activation::Inactive,
            mesh: None,
        }
    }

    /// Creates a populated chunk filled with one block (for tests and
    /// benchmarks).
    pub fn solid_fill(coord: ChunkCoord, width: usize, height: usize, fill: BlockId) -> Self {
        let mut chunk = Chunk::new(coord, width, height);
        chunk.voxels.fill(fill);
        chunk.populated = true;
        chunk
    }

    /// Creates a populated chunk with sparse random fill (for tests and
    /// benchmarks).
    ///
    /// Roughly one cell in ten holds `fill`; the rest stay air.
    pub fn scattered(coord: ChunkCoord, width: usize, height: usize, fill: BlockId) -> Self {
        let mut chunk = Chunk::new(coord, width, height);
        let sparseness = 0.9;
        for voxel in chunk.voxels.iter_mut() {
            if fastrand::f64() >= sparseness {
                *voxel = fill;
            }
        }
        chunk.populated = true;
        chunk
    }

    /// The chunk coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Chunk width in voxels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Chunk height in voxels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Global position of this chunk's (0, 0, 0) cell.
    pub fn origin(&self) -> Point3<i32> {
        Point3::new(self.coord.x * self.width as i32, 0, self.coord.z * self.width as i32)
    }

    /// Whether the generator has filled this chunk's voxels.
    ///
    /// Unpopulated chunks are not editable; queries against them fall
    /// through to the generator.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Current activation state.
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Sets the activation state.
    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
    }

    /// The cached mesh, if one has been built since the last rebuild.
    pub fn mesh(&self) -> Option<&MeshData> {
        self.mesh.as_ref()
    }

    /// Stores a freshly built mesh, replacing any previous one.
    pub fn set_mesh(&mut self, mesh: MeshData) {
        self.mesh = Some(mesh);
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + z * self.width + y * self.width * self.width
    }

    /// Reads the voxel at chunk-local coordinates.
    ///
    /// # Arguments
    /// * `x` - Local x in `0..width`
    /// * `y` - Local y in `0..height`
    /// * `z` - Local z in `0..width`
    ///
    /// # Returns
    /// The block id, or air when the coordinates are out of range.
    pub fn voxel_at(&self, x: usize, y: usize, z: usize) -> BlockId {
        if x >= self.width || y >= self.height || z >= self.width {
            return block::AIR;
        }
        self.voxels[self.index(x, y, z)]
    }

    /// Writes the voxel at chunk-local coordinates.
    ///
    /// # Returns
    /// `false` when the coordinates are out of range; the chunk is
    /// unchanged in that case.
    pub fn set_voxel(&mut self, x: usize, y: usize, z: usize, id: BlockId) -> bool {
        if x >= self.width || y >= self.height || z >= self.width {
            return false;
        }
        let index = self.index(x, y, z);
        self.voxels[index] = id;
        true
    }

    /// Reads the voxel at a global position.
    ///
    /// Positions outside this chunk read as air; callers route to the
    /// owning chunk first.
    pub fn voxel_at_global(&self, position: Point3<i32>) -> BlockId {
        match self.local_of(position) {
            Some((x, y, z)) => self.voxel_at(x, y, z),
            None => block::AIR,
        }
    }

    /// Writes the voxel at a global position.
    ///
    /// # Returns
    /// `false` when the position is not inside this chunk.
    pub fn set_voxel_global(&mut self, position: Point3<i32>, id: BlockId) -> bool {
        match self.local_of(position) {
            Some((x, y, z)) => self.set_voxel(x, y, z, id),
            None => false,
        }
    }

    fn local_of(&self, position: Point3<i32>) -> Option<(usize, usize, usize)> {
        let origin = self.origin();
        let x = position.x - origin.x;
        let z = position.z - origin.z;
        if x < 0 || z < 0 || position.y < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, position.y as usize, z as usize);
        if x >= self.width || y >= self.height || z >= self.width {
            return None;
        }
        Some((x, y, z))
    }

    /// Fills the chunk from the terrain generator and marks it editable.
    ///
    /// Every cell is classified at its global position; structure blocks
    /// the generator emits along the way are appended to `edits` for the
    /// world to route, which is how a tree rooted here can reach into a
    /// neighboring chunk.
    ///
    /// # Arguments
    /// * `generator` - The world's terrain generator
    /// * `edits` - Sink for structure blocks emitted during population
    pub fn populate(&mut self, generator: &TerrainGenerator, edits: &mut Vec<VoxelEdit>) {
        let origin = self.origin();
        for y in 0..self.height {
            for z in 0..self.width {
                for x in 0..self.width {
                    let global = Point3::new(origin.x + x as i32, y as i32, origin.z + z as i32);
                    let index = self.index(x, y, z);
                    self.voxels[index] = generator.generate(global, edits);
                }
            }
        }
        self.populated = true;
    }
}
