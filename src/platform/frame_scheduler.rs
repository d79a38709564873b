//! Host paint scheduler port

use std::collections::VecDeque;
use std::sync::Mutex;

/// The single primitive the pipeline needs from the host's paint loop:
/// run a callback once on the next paint cycle.
pub trait FrameScheduler: Send + Sync {
    fn add_post_frame_callback(&self, cb: Box<dyn FnOnce() + Send>);
}

/// Runs callbacks synchronously at the call site. Useful for hosts whose
/// event loop already batches, and for simple examples.
pub struct ImmediateFrameScheduler;

impl ImmediateFrameScheduler {
    pub fn new() -> Self {
        ImmediateFrameScheduler
    }
}

impl Default for ImmediateFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ImmediateFrameScheduler {
    fn add_post_frame_callback(&self, cb: Box<dyn FnOnce() + Send>) {
        cb();
    }
}

/// Queues callbacks until `run_frame` is called; drives the paint-cycle
/// state machine deterministically in tests
pub struct ManualFrameScheduler {
    pending: Mutex<VecDeque<Box<dyn FnOnce() + Send>>>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|q| q.len()).unwrap_or(0)
    }

    /// Simulate one paint cycle: run every callback queued so far.
    /// Callbacks queued during the run land in the next frame.
    pub fn run_frame(&self) {
        let drained: Vec<_> = match self.pending.lock() {
            Ok(mut q) => q.drain(..).collect(),
            Err(_) => return,
        };
        for cb in drained {
            cb();
        }
    }
}

impl Default for ManualFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn add_post_frame_callback(&self, cb: Box<dyn FnOnce() + Send>) {
        if let Ok(mut q) = self.pending.lock() {
            q.push_back(cb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn manual_scheduler_defers_until_run_frame() {
        let sched = ManualFrameScheduler::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = ran.clone();
        sched.add_post_frame_callback(Box::new(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(sched.pending_count(), 1);
        sched.run_frame();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn callbacks_queued_during_a_frame_wait_for_the_next() {
        let sched = Arc::new(ManualFrameScheduler::new());
        let ran = Arc::new(AtomicUsize::new(0));

        let sched_inner = sched.clone();
        let ran_inner = ran.clone();
        sched.add_post_frame_callback(Box::new(move || {
            let ran_nested = ran_inner.clone();
            sched_inner.add_post_frame_callback(Box::new(move || {
                ran_nested.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        sched.run_frame();
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        sched.run_frame();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
