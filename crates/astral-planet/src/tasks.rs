//! Main-thread task queue and pipeline counters.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use astral_render::GpuContext;

/// Work a pool worker discovered that must run on the GPU context thread.
pub type MainThreadTask = Box<dyn FnOnce(&GpuContext) + Send>;

/// FIFO of deferred context-thread work.
///
/// Workers push from any thread; the context thread drains once per frame.
/// This queue is the only route through which worker threads reach the GPU.
#[derive(Default)]
pub struct MainThreadQueue {
    tasks: Mutex<VecDeque<MainThreadTask>>,
}

impl MainThreadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, VecDeque<MainThreadTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, task: MainThreadTask) {
        self.guard().push_back(task);
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Runs every queued task on the calling thread. Returns how many ran.
    ///
    /// Tasks are taken out of the queue before running so a task that pushes
    /// follow-up work defers it to the next frame instead of extending the
    /// current drain.
    pub fn drain(&self, ctx: &GpuContext) -> usize {
        let batch: Vec<MainThreadTask> = self.guard().drain(..).collect();
        let count = batch.len();
        for task in batch {
            task(ctx);
        }
        count
    }

    /// Discards every queued task without running it. Returns how many were
    /// dropped. Used when no GPU context exists; the owning chunks stay in
    /// `MeshReady` and are re-enqueued by the next planet update.
    pub fn clear(&self) -> usize {
        let mut guard = self.guard();
        let count = guard.len();
        guard.clear();
        count
    }
}

/// Monotonic counters for the chunk pipeline, shared across threads.
#[derive(Debug, Default)]
pub struct PipelineCounters {
    generated: AtomicU64,
    meshed: AtomicU64,
    uploaded: AtomicU64,
    evicted: AtomicU64,
}

/// Point-in-time copy of [`PipelineCounters`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub generated: u64,
    pub meshed: u64,
    pub uploaded: u64,
    pub evicted: u64,
}

impl PipelineCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_generated(&self) {
        self.generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_meshed(&self) {
        self.meshed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_uploaded(&self) {
        self.uploaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evicted(&self, count: u64) {
        self.evicted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            generated: self.generated.load(Ordering::Relaxed),
            meshed: self.meshed.load(Ordering::Relaxed),
            uploaded: self.uploaded.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use astral_render::acquire_headless_context;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_queue_push_and_clear() {
        let queue = MainThreadQueue::new();
        assert!(queue.is_empty());
        queue.push(Box::new(|_| {}));
        queue.push(Box::new(|_| {}));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_runs_tasks_in_order() {
        let Some(ctx) = acquire_headless_context() else {
            return; // graceful skip when no GPU
        };
        let queue = MainThreadQueue::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let order = Arc::clone(&order);
            queue.push(Box::new(move |_| order.lock().unwrap().push(i)));
        }
        assert_eq!(queue.drain(&ctx), 3);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_defers_follow_up_work() {
        let Some(ctx) = acquire_headless_context() else {
            return;
        };
        let queue = Arc::new(MainThreadQueue::new());
        let ran = Arc::new(AtomicUsize::new(0));

        let inner_queue = Arc::clone(&queue);
        let inner_ran = Arc::clone(&ran);
        queue.push(Box::new(move |_| {
            let ran = Arc::clone(&inner_ran);
            inner_queue.push(Box::new(move |_| {
                ran.fetch_add(1, Ordering::Relaxed);
            }));
        }));

        // First drain runs only the original task.
        assert_eq!(queue.drain(&ctx), 1);
        assert_eq!(ran.load(Ordering::Relaxed), 0);
        assert_eq!(queue.drain(&ctx), 1);
        assert_eq!(ran.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_counters_accumulate() {
        let counters = PipelineCounters::new();
        counters.record_generated();
        counters.record_generated();
        counters.record_meshed();
        counters.record_uploaded();
        counters.record_evicted(5);

        let snap = counters.snapshot();
        assert_eq!(snap.generated, 2);
        assert_eq!(snap.meshed, 1);
        assert_eq!(snap.uploaded, 1);
        assert_eq!(snap.evicted, 5);
    }
}
