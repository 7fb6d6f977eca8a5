//! # Chunk Mesh Task
//!
//! Asynchronous mesh building for one chunk. Used both for a chunk's
//! first mesh (chained off generation) and for rebuilds after edits.

use crate::core::MtResource;
use crate::engine_state::meshing::{build_chunk_mesh, MeshSubmission};
use crate::engine_state::task_management::task::{Task, TaskResult};
use crate::engine_state::voxels::chunk::{Activation, ChunkCoord};
use crate::engine_state::voxels::world::World;

/// Builds (or rebuilds) the mesh for one chunk.
///
/// The build and the store happen under one world lock, so an edit can
/// never slip between reading the voxels and caching the mesh; whatever
/// the mesh missed is still in the remesh queue for the next pass.
pub struct ChunkMeshTask {
    /// Shared handle to the world the chunk belongs to.
    world: MtResource<World>,
    /// Which chunk to mesh.
    coord: ChunkCoord,
}

impl ChunkMeshTask {
    /// Creates a mesh task for one chunk.
    ///
    /// # Arguments
    /// * `world` - Shared handle to the world
    /// * `coord` - The chunk to mesh
    pub fn new(world: MtResource<World>, coord: ChunkCoord) -> Self {
        ChunkMeshTask { world, coord }
    }
}

impl Task for ChunkMeshTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let mut world = self.world.get_mut();

        let Some(mesh) = build_chunk_mesh(&world, self.coord) else {
            // Chunk gone or not populated; nothing to deliver.
            return Box::new(ChunkMeshTaskResult { submission: None });
        };

        let submission = world.chunks.get_mut(&self.coord).map(|chunk| {
            chunk.set_mesh(mesh.clone());
            MeshSubmission {
                coord: self.coord,
                active: chunk.activation() == Activation::Active,
                mesh,
            }
        });

        Box::new(ChunkMeshTaskResult { submission })
    }
}

/// Main-thread half of [`ChunkMeshTask`]: delivers the finished mesh.
pub struct ChunkMeshTaskResult {
    submission: Option<MeshSubmission>,
}

impl TaskResult for ChunkMeshTaskResult {
    fn handle_result(self: Box<Self>) -> (Vec<Box<dyn Task + Send>>, Vec<MeshSubmission>) {
        (Vec::new(), self.submission.into_iter().collect())
    }
}
