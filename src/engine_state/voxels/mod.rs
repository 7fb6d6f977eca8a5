//! # Voxel Core
//!
//! Everything that defines the voxel world's contents, independent of how
//! it reaches a screen.
//!
//! ## Architecture
//!
//! * **Block**: block ids, the catalog of block kinds, and face tables
//! * **Noise field**: seeded Perlin sampling shared by every generator pass
//! * **Biome**: terrain shape, lode, and tree parameters
//! * **Generator**: deterministic position-to-block classification
//! * **Chunk**: dense per-column voxel storage and its lifecycle
//! * **World**: the authoritative store, edit queue, and remesh queue
//! * **Tasks**: background population and meshing
//!
//! ## Data Flow
//!
//! 1. The active window asks the world for chunks
//! 2. Generation tasks populate them from the generator
//! 3. Structure edits route through the world's deferred queue
//! 4. Mesh tasks turn populated chunks into submissions for the consumer
//!
//! ## Thread Safety
//!
//! The whole world sits behind one `MtResource` lock. Tasks take the
//! write guard for the duration of their step; block and biome data are
//! immutable after startup and shared freely.

pub mod biome;
pub mod block;
pub mod chunk;
pub mod generator;
pub mod noise_field;
pub mod tasks;
pub mod world;
