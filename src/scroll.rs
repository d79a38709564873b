//! Scroll coordinator: accumulates surface scroll deltas and applies at most
//! one position change per host paint cycle.

use crate::platform::{FrameScheduler, ScrollSurface};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Accumulator state. `apply_scheduled` is the single pending-flag of the
/// coalescing policy: deltas arriving while an application is scheduled
/// only add to `pending_delta`, they never schedule a second application.
#[derive(Debug, Default)]
struct ScrollAccumulator {
    pending_delta: f64,
    apply_scheduled: bool,
}

/// Consumes `scrollFromSurface` deltas and forwards them to the host scroll
/// surface once per paint cycle.
///
/// State machine: Idle -> (delta received) -> Accumulating -> (next paint
/// cycle) -> apply accumulated sum -> Idle. Per-message ordering is
/// deliberately collapsed inside one cycle; only the sum of deltas matters.
pub struct ScrollCoordinator {
    surface: Arc<dyn ScrollSurface>,
    scheduler: Arc<dyn FrameScheduler>,
    accumulator: Arc<Mutex<ScrollAccumulator>>,
    disposed: Arc<AtomicBool>,
}

impl ScrollCoordinator {
    pub fn new(surface: Arc<dyn ScrollSurface>, scheduler: Arc<dyn FrameScheduler>) -> Self {
        Self {
            surface,
            scheduler,
            accumulator: Arc::new(Mutex::new(ScrollAccumulator::default())),
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Feed one scroll delta from the surface. Schedules an application for
    /// the next paint cycle unless one is already pending.
    pub fn on_scroll_delta(&self, delta: f64) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        let should_schedule = match self.accumulator.lock() {
            Ok(mut acc) => {
                acc.pending_delta += delta;
                if acc.apply_scheduled {
                    false
                } else {
                    acc.apply_scheduled = true;
                    true
                }
            }
            Err(_) => false,
        };

        if should_schedule {
            let surface = self.surface.clone();
            let accumulator = self.accumulator.clone();
            let disposed = self.disposed.clone();
            self.scheduler.add_post_frame_callback(Box::new(move || {
                Self::apply_pending(&surface, &accumulator, &disposed);
            }));
        }
    }

    fn apply_pending(
        surface: &Arc<dyn ScrollSurface>,
        accumulator: &Arc<Mutex<ScrollAccumulator>>,
        disposed: &Arc<AtomicBool>,
    ) {
        if disposed.load(Ordering::SeqCst) {
            return;
        }

        let delta = match accumulator.lock() {
            Ok(mut acc) => {
                let d = acc.pending_delta;
                acc.pending_delta = 0.0;
                acc.apply_scheduled = false;
                d
            }
            Err(_) => return,
        };

        if delta == 0.0 {
            return;
        }

        // Not ready: drop the accumulated delta rather than retry. Retrying
        // risks an unbounded backlog; the next gesture starts fresh.
        if !surface.has_clients() || !surface.has_content_dimensions() {
            debug!("scroll surface not ready, dropping accumulated delta {}", delta);
            return;
        }

        if surface.supports_pointer_scroll() {
            surface.pointer_scroll(delta);
        } else {
            let target = (surface.pixels() + delta).clamp(0.0, surface.max_scroll_extent());
            surface.jump_to(target);
        }
    }

    /// Stop the coordinator. No scheduled application runs after this,
    /// even one already queued with the scheduler.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}
