//! # Task Management System
//!
//! Runs chunk pipeline work off the main thread. The manager owns a small
//! pool of worker threads, each with its own task channel, and hands out
//! work round-robin; results come back to the main thread where they can
//! schedule follow-up tasks or deliver finished meshes.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: central coordinator for task distribution
//! - `Task` / `TaskResult`: the unit of work and its main-thread half
//! - `TaskChannel`: one worker thread plus its two mpsc channels
//!
//! ## Cooperative mode
//!
//! A manager built with zero workers spawns no threads at all. Published
//! tasks queue as usual, and each `process_queued_tasks()` call runs at
//! most one of them inline on the calling thread. Everything downstream
//! behaves identically, which keeps tests single-threaded and gives
//! callers without spare cores a working (if slower) pipeline.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to free worker channels round-robin
//! 3. Workers process tasks and send results back
//! 4. `process_completed_tasks()` handles results on the main thread,
//!    republishing any follow-up tasks and collecting mesh submissions
//! 5. The cycle continues until the pipeline drains

pub mod task;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::engine_state::meshing::MeshSubmission;
use task::{Task, TaskResult};

/// Maximum number of tasks in flight per worker channel.
///
/// Held at 1 so each worker finishes its task before receiving the next,
/// which keeps per-channel ordering trivial. Raising it would allow
/// pipelining at the cost of real dependency tracking.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// One worker thread and the channels that feed it.
struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Distributes tasks across worker threads and collects their results.
///
/// With zero workers the manager runs in cooperative mode; see the module
/// docs. In either mode, all result handling happens on the thread that
/// calls [`process_completed_tasks`](Self::process_completed_tasks).
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
    inline_results: Vec<Box<dyn TaskResult + Send>>,
    stop_flag: Arc<AtomicBool>,
}

impl TaskManager {
    /// Creates a task manager with the given number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Worker thread count; 0 selects cooperative mode
    ///
    /// # Panics
    /// Panics if the operating system refuses to spawn a thread.
    pub fn new(num_workers: usize) -> Self {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let mut channels = Vec::with_capacity(num_workers);

        if num_workers == 0 {
            info!("Task manager running cooperatively on the caller's thread");
        } else {
            let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
            info!("Starting {} worker threads ({} cores available)", num_workers, cores);
        }

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();
            let stop = Arc::clone(&stop_flag);

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    if stop.load(Ordering::Relaxed) {
                        break;
                    }
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
            inline_results: Vec::new(),
            stop_flag,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// `Err(task)` when the send fails (worker disconnected), handing the
    /// task back so the caller can requeue it.
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(err) => Err(err.0),
        }
    }

    /// Finds a worker channel with room for another task.
    ///
    /// Round-robin starting from the channel after the last one used, so
    /// load spreads evenly. Channels at `MAX_TASKS_IN_FLIGHT` are skipped.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }
        if self
            .channels
            .iter()
            .all(|channel| channel.num_tasks_in_flight >= MAX_TASKS_IN_FLIGHT)
        {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;
        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                // This shouldn't happen due to the earlier check
                info!("All channels are full, but missed the first check");
                return None;
            }
        }
    }

    /// Publishes a task for execution.
    ///
    /// # Returns
    /// `true` if the task went straight to a worker, `false` if it was
    /// queued (all workers busy, or cooperative mode).
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        if self.channels.is_empty() {
            self.queued_tasks.push_back(task);
            return false;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto free workers.
    ///
    /// Call once per update. In cooperative mode this instead runs at
    /// most one queued task inline, so a single call does a bounded
    /// amount of work on the calling thread.
    pub fn process_queued_tasks(&mut self) {
        if self.queued_tasks.is_empty() {
            return;
        }

        if self.channels.is_empty() {
            if let Some(task) = self.queued_tasks.pop_front() {
                self.inline_results.push(task.process());
            }
            return;
        }

        match self.find_available_channel() {
            None => {} // No free channels, keep tasks queued
            Some(mut channel_idx) => {
                while let Some(task) = self.queued_tasks.pop_front() {
                    match self.try_send_task(task, channel_idx) {
                        Ok(_) => match self.find_available_channel() {
                            Some(next_idx) => channel_idx = next_idx,
                            None => break,
                        },
                        Err(task) => {
                            // Channel disconnected; put the task back and stop
                            self.queued_tasks.push_front(task);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Handles every finished task result.
    ///
    /// Drains inline results and worker channels, republishes follow-up
    /// tasks, and returns the mesh submissions the results delivered.
    /// Must be called from the thread driving the pipeline.
    pub fn process_completed_tasks(&mut self) -> Vec<MeshSubmission> {
        let mut submissions = Vec::new();
        let mut tasks_to_queue = Vec::new();

        for result in self.inline_results.drain(..) {
            let (new_tasks, mut delivered) = result.handle_result();
            tasks_to_queue.extend(new_tasks);
            submissions.append(&mut delivered);
        }
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                let (new_tasks, mut delivered) = result.handle_result();
                tasks_to_queue.extend(new_tasks);
                submissions.append(&mut delivered);
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        submissions
    }

    /// Whether no work is queued, in flight, or awaiting handling.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty()
            && self.inline_results.is_empty()
            && self
                .channels
                .iter()
                .all(|channel| channel.num_tasks_in_flight == 0)
    }

    /// Stops the workers and joins them.
    ///
    /// Queued tasks that never started are dropped (and counted in the
    /// log); a task already running finishes first, its result discarded.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);

        let dropped = self.queued_tasks.len() + self.inline_results.len();
        if dropped > 0 {
            info!("Dropping {} unfinished tasks at shutdown", dropped);
        }
        self.queued_tasks.clear();
        self.inline_results.clear();

        for channel in std::mem::take(&mut self.channels) {
            let TaskChannel {
                task_sender,
                result_receiver,
                worker,
                ..
            } = channel;
            // Closing the channels unblocks the worker's recv loop.
            drop(task_sender);
            drop(result_receiver);
            if worker.join().is_err() {
                warn!("A worker thread panicked before shutdown");
            }
        }
    }
}
