//! Host scroll surface port

use std::sync::Mutex;

/// The host-side scrollable that surrounds the render surface.
///
/// Mirrors the minimal surface the scroll coordinator needs: readiness
/// checks, the current offset and extent, and one of two application
/// primitives. `pointer_scroll` is an atomic, non-animated relative
/// adjustment; hosts without it get a clamped `jump_to`.
pub trait ScrollSurface: Send + Sync {
    /// Whether the scrollable is attached to any content at all
    fn has_clients(&self) -> bool;

    /// Whether the content extent is known yet
    fn has_content_dimensions(&self) -> bool;

    /// Current scroll offset in logical pixels
    fn pixels(&self) -> f64;

    /// Maximum scroll offset
    fn max_scroll_extent(&self) -> f64;

    /// Whether the surface offers a direct relative-scroll primitive
    fn supports_pointer_scroll(&self) -> bool {
        false
    }

    /// Apply a relative scroll delta atomically
    fn pointer_scroll(&self, delta: f64);

    /// Jump directly to an absolute offset
    fn jump_to(&self, offset: f64);
}

/// A scroll surface that is never ready; safe default for hosts without a
/// surrounding scrollable
pub struct NoopScrollSurface;

impl NoopScrollSurface {
    pub fn new() -> Self {
        NoopScrollSurface
    }
}

impl Default for NoopScrollSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSurface for NoopScrollSurface {
    fn has_clients(&self) -> bool {
        false
    }

    fn has_content_dimensions(&self) -> bool {
        false
    }

    fn pixels(&self) -> f64 {
        0.0
    }

    fn max_scroll_extent(&self) -> f64 {
        0.0
    }

    fn pointer_scroll(&self, _delta: f64) {}

    fn jump_to(&self, _offset: f64) {}
}

/// An in-memory scroll surface that records applied positions; used by unit
/// and integration tests
pub struct RecordingScrollSurface {
    state: Mutex<RecordingState>,
    pointer_capable: bool,
}

struct RecordingState {
    ready: bool,
    pixels: f64,
    max_extent: f64,
    jumps: Vec<f64>,
    pointer_deltas: Vec<f64>,
}

impl RecordingScrollSurface {
    pub fn new(max_extent: f64) -> Self {
        Self {
            state: Mutex::new(RecordingState {
                ready: true,
                pixels: 0.0,
                max_extent,
                jumps: Vec::new(),
                pointer_deltas: Vec::new(),
            }),
            pointer_capable: false,
        }
    }

    /// Same as `new` but advertising the pointer-scroll primitive
    pub fn with_pointer_scroll(max_extent: f64) -> Self {
        let mut s = Self::new(max_extent);
        s.pointer_capable = true;
        s
    }

    pub fn set_ready(&self, ready: bool) {
        if let Ok(mut lock) = self.state.lock() {
            lock.ready = ready;
        }
    }

    /// Offsets applied through `jump_to`, in order
    pub fn jumps(&self) -> Vec<f64> {
        self.state.lock().map(|s| s.jumps.clone()).unwrap_or_default()
    }

    /// Deltas applied through `pointer_scroll`, in order
    pub fn pointer_deltas(&self) -> Vec<f64> {
        self.state
            .lock()
            .map(|s| s.pointer_deltas.clone())
            .unwrap_or_default()
    }
}

impl ScrollSurface for RecordingScrollSurface {
    fn has_clients(&self) -> bool {
        self.state.lock().map(|s| s.ready).unwrap_or(false)
    }

    fn has_content_dimensions(&self) -> bool {
        self.has_clients()
    }

    fn pixels(&self) -> f64 {
        self.state.lock().map(|s| s.pixels).unwrap_or(0.0)
    }

    fn max_scroll_extent(&self) -> f64 {
        self.state.lock().map(|s| s.max_extent).unwrap_or(0.0)
    }

    fn supports_pointer_scroll(&self) -> bool {
        self.pointer_capable
    }

    fn pointer_scroll(&self, delta: f64) {
        if let Ok(mut lock) = self.state.lock() {
            lock.pixels += delta;
            lock.pointer_deltas.push(delta);
        }
    }

    fn jump_to(&self, offset: f64) {
        if let Ok(mut lock) = self.state.lock() {
            lock.pixels = offset;
            lock.jumps.push(offset);
        }
    }
}
