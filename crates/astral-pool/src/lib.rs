//! Worker thread pool for chunk pipeline tasks.
//!
//! Tasks are boxed closures delivered over a crossbeam channel to named
//! worker threads. A panicking task is contained at the pool boundary and
//! logged; the worker keeps running. Shutdown closes the queue, lets the
//! workers drain whatever is still queued, then joins them.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size pool of named worker threads executing boxed closures.
pub struct ChunkThreadPool {
    name: String,
    sender: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
    stopping: Arc<AtomicBool>,
    executed: Arc<AtomicU64>,
}

impl ChunkThreadPool {
    /// Spawns `threads` workers (at least one) named `<name>-worker-<n>`.
    pub fn new(name: &str, threads: usize) -> Self {
        let threads = threads.max(1);
        let (sender, receiver) = unbounded::<Task>();
        let stopping = Arc::new(AtomicBool::new(false));
        let executed = Arc::new(AtomicU64::new(0));

        let mut workers = Vec::with_capacity(threads);
        for index in 0..threads {
            let receiver: Receiver<Task> = receiver.clone();
            let executed = Arc::clone(&executed);
            let thread_name = format!("{name}-worker-{index}");
            let pool_name = name.to_string();

            let handle = std::thread::Builder::new()
                .name(thread_name.clone())
                .spawn(move || {
                    // recv returns Err once the sender is dropped and the
                    // queue is empty, so pending work drains before exit.
                    while let Ok(task) = receiver.recv() {
                        if catch_unwind(AssertUnwindSafe(task)).is_err() {
                            tracing::error!(pool = %pool_name, "task panicked in worker");
                        }
                        executed.fetch_add(1, Ordering::Relaxed);
                    }
                    tracing::debug!(pool = %pool_name, worker = %thread_name, "worker exiting");
                });

            match handle {
                Ok(handle) => workers.push(handle),
                Err(err) => tracing::error!(pool = name, %err, "failed to spawn worker thread"),
            }
        }

        tracing::info!(pool = name, threads = workers.len(), "thread pool started");

        Self {
            name: name.to_string(),
            sender: Some(sender),
            workers,
            stopping,
            executed,
        }
    }

    /// Sizes a pool from the machine's logical CPU count: `cpus - reserve`,
    /// at least `minimum`.
    pub fn auto_threads(reserve: usize, minimum: usize) -> usize {
        num_cpus::get().saturating_sub(reserve).max(minimum)
    }

    /// Queues a task. Returns `false` (dropping the task) once shutdown has
    /// begun.
    pub fn execute(&self, task: impl FnOnce() + Send + 'static) -> bool {
        if self.stopping.load(Ordering::Acquire) {
            return false;
        }
        match &self.sender {
            Some(sender) => sender.send(Box::new(task)).is_ok(),
            None => false,
        }
    }

    /// Number of tasks completed so far (including panicked ones).
    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stops accepting work, waits for queued tasks to drain, and joins all
    /// workers. Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        if self.stopping.swap(true, Ordering::AcqRel) {
            return;
        }
        // Dropping the sender closes the channel after the queue empties.
        self.sender.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!(pool = %self.name, "worker thread panicked outside a task");
            }
        }
        tracing::info!(pool = %self.name, executed = self.executed(), "thread pool stopped");
    }
}

impl Drop for ChunkThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
