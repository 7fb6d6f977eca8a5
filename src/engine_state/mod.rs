//! # Engine State Module
//!
//! The coordinator for the streaming voxel world.
//!
//! ## Key Components
//!
//! * `WorldEngine` - The main entry point; owns the world and the pipeline
//! * `settings` - Configuration loading and validation
//! * `task_management` - Worker threads and the task/result plumbing
//! * `voxels` - Voxel data, chunks, terrain generation, and the world
//! * `meshing` - Face-culled mesh extraction from chunk data
//!
//! ## Architecture
//!
//! The engine keeps one authoritative [`World`] behind a shared lock and
//! drives it with background tasks: generation tasks populate chunks and
//! chain mesh tasks, mesh tasks cache and deliver geometry. The consumer
//! moves an observer around, pumps the engine once per update, and takes
//! finished [`MeshSubmission`]s whenever they are ready.
//!
//! ## Streaming
//!
//! A square window of chunks around the observer's chunk is "active".
//! Whenever the observer crosses a chunk border the window is rebuilt
//! from scratch: chunks entering it are created, populated, and meshed;
//! chunks leaving it are deactivated but keep all their data, so coming
//! back is cheap.

pub mod meshing;
pub mod settings;
pub mod task_management;
pub mod voxels;

use std::path::Path;

use cgmath::Point3;
use log::{debug, info};

use crate::core::MtResource;
use meshing::MeshSubmission;
use settings::{SettingsError, WorldSettings};
use task_management::TaskManager;
use voxels::block::BlockId;
use voxels::chunk::{Activation, ChunkCoord};
use voxels::tasks::chunk_generation_task::ChunkGenerationTask;
use voxels::tasks::chunk_mesh_task::ChunkMeshTask;
use voxels::world::{VoxelEdit, World};

/// The streaming world and the machinery that keeps it fed.
///
/// # Examples
///
/// ```no_run
/// use voxel_world::engine_state::WorldEngine;
/// use voxel_world::engine_state::settings::WorldSettings;
///
/// let mut engine = WorldEngine::new(WorldSettings::default()).unwrap();
/// let mut observer = engine.spawn_position();
///
/// loop {
///     engine.update_observer(observer);
///     engine.pump();
///     for submission in engine.take_mesh_submissions() {
///         // upload or discard, depending on submission.active
///     }
///     observer.x += 0.5;
/// }
/// ```
pub struct WorldEngine {
    /// The validated settings the engine was built with.
    pub settings: WorldSettings,
    /// The voxel world, shared with worker threads.
    pub world: MtResource<World>,
    /// Task manager for asynchronous chunk work.
    pub task_manager: TaskManager,
    /// The chunk the observer was last seen in.
    observer_chunk: ChunkCoord,
    /// Chunks inside the current active window.
    active_chunks: Vec<ChunkCoord>,
    /// Finished meshes waiting for the consumer.
    mesh_submissions: Vec<MeshSubmission>,
}

impl WorldEngine {
    /// Builds an engine from settings.
    ///
    /// Validates the settings, builds the world, starts the workers, and
    /// kicks off generation for the window around the spawn point.
    ///
    /// # Arguments
    /// * `settings` - The world configuration
    ///
    /// # Returns
    /// The running engine, or a [`SettingsError`] describing why the
    /// configuration was rejected.
    pub fn new(settings: WorldSettings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let catalog = settings.build_catalog();
        let world = MtResource::new(World::new(&settings, catalog));
        let task_manager = TaskManager::new(settings.worker_threads);

        let spawn = world.get().spawn_position();
        let observer_chunk = ChunkCoord::containing(spawn, settings.chunk_width);
        info!(
            "World engine ready: seed {}, {} chunks per side, {} workers, spawn at ({:.1}, {:.1}, {:.1})",
            settings.seed,
            settings.world_size_in_chunks,
            settings.worker_threads,
            spawn.x,
            spawn.y,
            spawn.z
        );

        let mut engine = WorldEngine {
            settings,
            world,
            task_manager,
            observer_chunk,
            active_chunks: Vec::new(),
            mesh_submissions: Vec::new(),
        };
        engine.rebuild_active_window();
        Ok(engine)
    }

    /// Builds an engine from a settings file.
    pub fn from_settings_file(path: &Path) -> Result<Self, SettingsError> {
        Self::new(WorldSettings::load_from_file(path)?)
    }

    /// Where a fresh observer should start.
    pub fn spawn_position(&self) -> Point3<f32> {
        self.world.get().spawn_position()
    }

    /// The chunk the observer was last seen in.
    pub fn observer_chunk(&self) -> ChunkCoord {
        self.observer_chunk
    }

    /// Chunks inside the current active window.
    pub fn active_chunks(&self) -> &[ChunkCoord] {
        &self.active_chunks
    }

    /// Moves the observer, rebuilding the active window if it crossed a
    /// chunk border. Movement within one chunk is free.
    pub fn update_observer(&mut self, position: Point3<f32>) {
        let coord = ChunkCoord::containing(position, self.settings.chunk_width);
        if coord != self.observer_chunk {
            self.observer_chunk = coord;
            self.rebuild_active_window();
        }
    }

    /// Recomputes the active window around the observer's chunk.
    ///
    /// The window is the full square of `view_radius` chunks clipped to
    /// the playable area. Entering chunks are created and (if new to the
    /// window) sent for generation; entering chunks that already carry a
    /// mesh resubmit it instead of recomputing; leaving chunks are
    /// deactivated in place.
    fn rebuild_active_window(&mut self) {
        let radius = self.settings.view_radius;
        let center = self.observer_chunk;
        let mut next: Vec<ChunkCoord> = Vec::new();
        let mut to_generate: Vec<ChunkCoord> = Vec::new();
        let mut resubmissions: Vec<MeshSubmission> = Vec::new();

        {
            let mut world = self.world.get_mut();
            for x in (center.x - radius)..=(center.x + radius) {
                for z in (center.z - radius)..=(center.z + radius) {
                    let coord = ChunkCoord::new(x, z);
                    if !world.is_chunk_in_world(coord) {
                        continue;
                    }
                    world.create_chunk(coord);
                    let stayed_active = self.active_chunks.contains(&coord);
                    if let Some(chunk) = world.chunks.get_mut(&coord) {
                        if !chunk.is_populated() && !stayed_active {
                            to_generate.push(coord);
                        }
                        if !stayed_active && chunk.activation() == Activation::Inactive {
                            if let Some(mesh) = chunk.mesh() {
                                resubmissions.push(MeshSubmission {
                                    coord,
                                    active: true,
                                    mesh: mesh.clone(),
                                });
                            }
                        }
                        chunk.set_activation(Activation::Active);
                        next.push(coord);
                    }
                }
            }

            for coord in &self.active_chunks {
                if !next.contains(coord) {
                    if let Some(chunk) = world.chunks.get_mut(coord) {
                        chunk.set_activation(Activation::Inactive);
                    }
                }
            }
        }

        debug!(
            "Active window now holds {} chunks around {:?} ({} to generate, {} resubmitted)",
            next.len(),
            center,
            to_generate.len(),
            resubmissions.len()
        );

        for coord in to_generate {
            self.task_manager
                .publish_task(Box::new(ChunkGenerationTask::new(self.world.clone(), coord)));
        }
        self.mesh_submissions.extend(resubmissions);
        self.active_chunks = next;
    }

    /// Advances the pipeline by one step.
    ///
    /// Collects finished task results, applies deferred edits, turns the
    /// resulting remesh queue into mesh tasks, and feeds queued tasks to
    /// the workers. Call once per update.
    pub fn pump(&mut self) {
        let mut finished = self.task_manager.process_completed_tasks();
        self.mesh_submissions.append(&mut finished);

        let remesh = {
            let mut world = self.world.get_mut();
            world.apply_pending_edits();
            world.take_remesh_queue()
        };
        for coord in remesh {
            self.task_manager
                .publish_task(Box::new(ChunkMeshTask::new(self.world.clone(), coord)));
        }

        self.task_manager.process_queued_tasks();
    }

    /// Takes every mesh submission delivered since the last call.
    pub fn take_mesh_submissions(&mut self) -> Vec<MeshSubmission> {
        std::mem::take(&mut self.mesh_submissions)
    }

    /// Whether the pipeline still has work in flight.
    ///
    /// Deferred edits waiting for chunks outside the window do not count;
    /// they stay queued until streaming reaches their chunk.
    pub fn has_pending_work(&self) -> bool {
        !self.task_manager.is_idle() || !self.world.get().remesh_queue.is_empty()
    }

    /// Reads the block id at a global position.
    pub fn voxel_id_at(&self, position: Point3<i32>) -> BlockId {
        self.world.get().voxel_id_at(position)
    }

    /// Whether the block at a global position is solid.
    pub fn is_voxel_solid(&self, position: Point3<i32>) -> bool {
        self.world.get().is_voxel_solid(position)
    }

    /// Writes a block directly; see [`World::set_voxel`].
    pub fn set_voxel(&mut self, position: Point3<i32>, id: BlockId) -> bool {
        self.world.get_mut().set_voxel(position, id)
    }

    /// Queues a deferred voxel edit.
    pub fn queue_edit(&mut self, edit: VoxelEdit) {
        self.world.get_mut().queue_edit(edit);
    }

    /// One-line progress summary for periodic logging.
    pub fn status_line(&self) -> String {
        let world = self.world.get();
        format!(
            "observer {:?} | {} active | {} chunks ({} populated) | {} edits pending",
            self.observer_chunk,
            self.active_chunks.len(),
            world.chunk_count(),
            world.populated_chunk_count(),
            world.pending_edits.len()
        )
    }

    /// Stops the workers. The world stays readable afterwards.
    pub fn shutdown(&mut self) {
        self.task_manager.shutdown();
        info!("World engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings() -> WorldSettings {
        WorldSettings {
            chunk_width: 4,
            chunk_height: 16,
            world_size_in_chunks: 12,
            view_radius: 2,
            worker_threads: 0,
            ..WorldSettings::default()
        }
    }

    #[test]
    fn test_invalid_settings_fail_construction() {
        let settings = WorldSettings {
            world_size_in_chunks: 1,
            ..WorldSettings::default()
        };
        assert!(WorldEngine::new(settings).is_err());
    }

    #[test]
    fn test_initial_window_surrounds_the_spawn_chunk() {
        let engine = WorldEngine::new(small_settings()).unwrap();
        let center = engine.observer_chunk();
        assert_eq!(center, ChunkCoord::new(6, 6));
        assert_eq!(engine.active_chunks().len(), 25);
        for coord in engine.active_chunks() {
            assert!((coord.x - center.x).abs() <= 2);
            assert!((coord.z - center.z).abs() <= 2);
        }
    }

    #[test]
    fn test_observer_moves_within_a_chunk_keep_the_window() {
        let mut engine = WorldEngine::new(small_settings()).unwrap();
        let before = engine.active_chunks().to_vec();
        let mut position = engine.spawn_position();
        position.x += 1.0;
        engine.update_observer(position);
        assert_eq!(engine.active_chunks(), &before[..]);
    }
}
