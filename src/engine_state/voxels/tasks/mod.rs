//! # Voxel Task System
//!
//! Background tasks for the chunk pipeline. Generation and meshing are
//! separate tasks so a freshly generated chunk releases the world lock
//! before its (slower) mesh build is scheduled, and so edited chunks can
//! be remeshed without regenerating.

pub mod chunk_generation_task;
pub mod chunk_mesh_task;
