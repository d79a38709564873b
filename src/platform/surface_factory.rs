//! Render-surface factory port

use crate::registry::{ContentIdentity, SurfaceRef};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Host-provided mechanism that associates a content identity with a
/// concrete isolated-document instance and mounts it into the layout tree.
///
/// The registry guarantees this is invoked at most once per identity; the
/// factory does not need its own dedup.
pub trait SurfaceFactory: Send + Sync {
    fn create_surface(&self, identity: &ContentIdentity, document: &str) -> Arc<SurfaceRef>;
}

/// A factory that keeps the built document in memory without mounting
/// anything; default for headless hosts and tests
pub struct InMemorySurfaceFactory {
    created: AtomicUsize,
}

impl InMemorySurfaceFactory {
    pub fn new() -> Self {
        Self {
            created: AtomicUsize::new(0),
        }
    }

    /// How many surfaces this factory has built
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl Default for InMemorySurfaceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceFactory for InMemorySurfaceFactory {
    fn create_surface(&self, identity: &ContentIdentity, document: &str) -> Arc<SurfaceRef> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Arc::new(SurfaceRef {
            identity: identity.clone(),
            document: document.to_string(),
        })
    }
}
