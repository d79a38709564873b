//! Height negotiator: republishes surface height reports to the host
//! container, guarding against redundant notifications.
//!
//! The surface-side instrumentation already debounces its measurements and
//! only sends changed values; the negotiator adds a second idempotence guard
//! so a replayed report never re-fires the host callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Layout height assumed before the first report arrives, so the host can
/// reserve space while the surface measures itself
pub const DEFAULT_SURFACE_HEIGHT: f64 = 400.0;

type HeightChangedHandler = Arc<dyn Fn(f64) + Send + Sync>;

pub struct HeightNegotiator {
    current: Mutex<f64>,
    on_height_changed: Mutex<Option<HeightChangedHandler>>,
    disposed: AtomicBool,
}

impl HeightNegotiator {
    pub fn new(default_height: f64) -> Self {
        Self {
            current: Mutex::new(default_height),
            on_height_changed: Mutex::new(None),
            disposed: AtomicBool::new(false),
        }
    }

    /// Register the host callback fired when the negotiated height changes
    pub fn on_height_changed<F>(&self, cb: F)
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        if let Ok(mut handler) = self.on_height_changed.lock() {
            *handler = Some(Arc::new(cb));
        }
    }

    /// The last published height, or the default before any report
    pub fn current_height(&self) -> f64 {
        self.current.lock().map(|h| *h).unwrap_or(DEFAULT_SURFACE_HEIGHT)
    }

    /// Feed one height report from the surface. Fires the host callback
    /// only when the value actually changes.
    pub fn on_height_report(&self, height: f64) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        let changed = match self.current.lock() {
            Ok(mut current) => {
                if *current == height {
                    false
                } else {
                    *current = height;
                    true
                }
            }
            Err(_) => false,
        };

        if changed {
            let handler = self
                .on_height_changed
                .lock()
                .ok()
                .and_then(|h| h.clone());
            if let Some(cb) = handler {
                cb(height);
            }
        }
    }

    /// Stop the negotiator; no callback fires after this
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

impl Default for HeightNegotiator {
    fn default() -> Self {
        Self::new(DEFAULT_SURFACE_HEIGHT)
    }
}
