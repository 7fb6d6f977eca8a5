//! # Chunk Generation Task
//!
//! Asynchronous terrain population for one chunk. Scheduled whenever the
//! active window reaches a chunk that has no data yet; on completion it
//! chains a mesh task for the same chunk.

use crate::core::MtResource;
use crate::engine_state::meshing::MeshSubmission;
use crate::engine_state::task_management::task::{Task, TaskResult};
use crate::engine_state::voxels::chunk::ChunkCoord;
use crate::engine_state::voxels::tasks::chunk_mesh_task::ChunkMeshTask;
use crate::engine_state::voxels::world::World;

/// Populates one chunk's voxels in the background.
///
/// The task runs three steps under a single world lock: ensure the chunk
/// exists, populate it, and drain the deferred edit queue so structure
/// blocks this population emitted (and any earlier edits waiting for
/// this chunk) land before the follow-up mesh ever runs.
pub struct ChunkGenerationTask {
    /// Shared handle to the world the chunk belongs to.
    world: MtResource<World>,
    /// Which chunk to populate.
    coord: ChunkCoord,
}

impl ChunkGenerationTask {
    /// Creates a generation task for one chunk.
    ///
    /// # Arguments
    /// * `world` - Shared handle to the world
    /// * `coord` - The chunk to populate
    pub fn new(world: MtResource<World>, coord: ChunkCoord) -> Self {
        ChunkGenerationTask { world, coord }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        {
            let mut world = self.world.get_mut();
            world.create_chunk(self.coord);
            world.populate_chunk(self.coord);
            world.apply_pending_edits();
        }

        Box::new(ChunkGenerationTaskResult {
            world: self.world.clone(),
            coord: self.coord,
        })
    }
}

/// Main-thread half of [`ChunkGenerationTask`]: chains the mesh build.
pub struct ChunkGenerationTaskResult {
    world: MtResource<World>,
    coord: ChunkCoord,
}

impl TaskResult for ChunkGenerationTaskResult {
    fn handle_result(self: Box<Self>) -> (Vec<Box<dyn Task + Send>>, Vec<MeshSubmission>) {
        let mesh_task: Box<dyn Task + Send> = Box::new(ChunkMeshTask::new(self.world, self.coord));
        (vec![mesh_task], Vec::new())
    }
}
