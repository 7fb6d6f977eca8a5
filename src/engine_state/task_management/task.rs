//! # Task System Core Traits
//!
//! The two traits every background job is built from.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method runs on a worker thread (or inline on
//!    the main thread when the manager has no workers)
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the main thread
//! 5. The result can spawn follow-up tasks or deliver finished meshes
//!
//! ## Thread Safety
//! - `Task` must be `Send` to move onto a worker thread
//! - `TaskResult` must be `Send` to move back to the main thread
//! - Tasks own their data; shared state travels inside `MtResource` handles

use crate::engine_state::meshing::MeshSubmission;

/// A unit of work that can run off the main thread.
///
/// Tasks should be self-contained: a task owns (or holds a thread-safe
/// handle to) everything `process` needs, so nothing on the main thread
/// has to wait for it.
pub trait Task: Send {
    /// Performs the work and returns its result.
    ///
    /// Runs on a worker thread in threaded mode, so it must not touch
    /// thread-local main-thread state. Errors are handled internally; a
    /// task that finds nothing to do still returns a (no-op) result.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The outcome of a processed [`Task`], handled back on the main thread.
///
/// Results do two things: schedule follow-up tasks (a chunk that finished
/// generating schedules its meshing) and deliver finished mesh
/// submissions for the display consumer.
pub trait TaskResult: Send {
    /// Consumes the result on the main thread.
    ///
    /// # Returns
    /// Follow-up tasks to schedule and mesh submissions to deliver; both
    /// may be empty.
    fn handle_result(self: Box<Self>) -> (Vec<Box<dyn Task + Send>>, Vec<MeshSubmission>);
}
