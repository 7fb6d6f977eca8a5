#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A streaming voxel world core: deterministic terrain generation,
//! face-culled chunk meshing, and an observer-driven chunk lifecycle,
//! independent of any particular renderer.
//!
//! ## Key Modules
//!
//! * `core` - Shared-state primitives used across threads
//! * `engine_state` - The engine itself: settings, the voxel world,
//!   meshing, and the background task pipeline
//!
//! ## Architecture
//!
//! One [`engine_state::WorldEngine`] owns the authoritative world behind
//! a read-write lock and a pool of worker threads (or a cooperative
//! single-threaded mode). The consumer moves an observer, pumps the
//! engine, and takes finished chunk meshes; nothing in this crate touches
//! a GPU, a window, or an event loop.
//!
//! ## Usage
//!
//! ```no_run
//! use voxel_world::engine_state::settings::WorldSettings;
//! use voxel_world::engine_state::WorldEngine;
//!
//! let mut engine = WorldEngine::new(WorldSettings::default()).unwrap();
//! let observer = engine.spawn_position();
//! engine.update_observer(observer);
//!
//! while engine.has_pending_work() {
//!     engine.pump();
//!     for submission in engine.take_mesh_submissions() {
//!         // hand the buffers to whatever draws them
//!         let _ = submission.mesh.position_bytes();
//!     }
//! }
//! engine.shutdown();
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunks store one byte per voxel in a dense flat buffer
//! * Generation and meshing run off the main thread as tasks
//! * Meshes only spend geometry on faces that touch open space
//! * Deactivated chunks keep their data, so revisits skip regeneration

pub mod core;
pub mod engine_state;

pub use engine_state::WorldEngine;
