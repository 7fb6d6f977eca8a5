//! # Core Module
//!
//! Fundamental concurrency primitives shared across the world engine.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//!
//! The world state, chunk grid and work queues all live behind a single
//! `MtResource` so that read-modify-write sequences stay atomic from the
//! point of view of worker threads.
//!
//! ## Usage
//! ```rust
//! use voxel_world::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod mt_resource;

pub use mt_resource::MtResource;
