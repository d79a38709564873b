//! Host platform ports: scroll surface, paint scheduler, surface factory
//!
//! This module contains the traits through which the pipeline talks to the
//! surrounding host, plus safe noop implementations used as defaults and in
//! tests. Everything here is specified at the interface only; the concrete
//! UI toolkit behind it is not this crate's concern.

pub mod frame_scheduler;
pub mod scroll_surface;
pub mod surface_factory;

pub use frame_scheduler::{FrameScheduler, ImmediateFrameScheduler, ManualFrameScheduler};
pub use scroll_surface::{NoopScrollSurface, RecordingScrollSurface, ScrollSurface};
pub use surface_factory::{InMemorySurfaceFactory, SurfaceFactory};

use std::sync::Arc;

/// Composite trait bundling the host primitives the pipeline consumes.
///
/// Hosts that cannot create an isolated surface report it here; the
/// renderer construction falls back to the plain-text strategy in that case
/// instead of failing.
pub trait HostPlatform: Send + Sync {
    fn scroll_surface(&self) -> Arc<dyn ScrollSurface>;
    fn frame_scheduler(&self) -> Arc<dyn FrameScheduler>;
    fn surface_factory(&self) -> Arc<dyn SurfaceFactory>;

    /// Whether this host can create and mount an isolated render surface
    fn supports_isolated_surface(&self) -> bool;
}

/// A host with no isolation capability and inert scroll/paint primitives;
/// selecting it always yields the fallback renderer
pub struct NoopHostPlatform {
    scroll: Arc<NoopScrollSurface>,
    scheduler: Arc<ImmediateFrameScheduler>,
    factory: Arc<InMemorySurfaceFactory>,
}

impl NoopHostPlatform {
    pub fn new() -> Self {
        Self {
            scroll: Arc::new(NoopScrollSurface::new()),
            scheduler: Arc::new(ImmediateFrameScheduler::new()),
            factory: Arc::new(InMemorySurfaceFactory::new()),
        }
    }
}

impl Default for NoopHostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HostPlatform for NoopHostPlatform {
    fn scroll_surface(&self) -> Arc<dyn ScrollSurface> {
        self.scroll.clone()
    }

    fn frame_scheduler(&self) -> Arc<dyn FrameScheduler> {
        self.scheduler.clone()
    }

    fn surface_factory(&self) -> Arc<dyn SurfaceFactory> {
        self.factory.clone()
    }

    fn supports_isolated_surface(&self) -> bool {
        false
    }
}

/// A host assembled from caller-supplied parts; the usual way tests and
/// embedders wire concrete primitives into the pipeline
pub struct FixedHostPlatform {
    scroll: Arc<dyn ScrollSurface>,
    scheduler: Arc<dyn FrameScheduler>,
    factory: Arc<dyn SurfaceFactory>,
    isolated: bool,
}

impl FixedHostPlatform {
    pub fn new(
        scroll: Arc<dyn ScrollSurface>,
        scheduler: Arc<dyn FrameScheduler>,
        factory: Arc<dyn SurfaceFactory>,
        isolated: bool,
    ) -> Self {
        Self {
            scroll,
            scheduler,
            factory,
            isolated,
        }
    }
}

impl HostPlatform for FixedHostPlatform {
    fn scroll_surface(&self) -> Arc<dyn ScrollSurface> {
        self.scroll.clone()
    }

    fn frame_scheduler(&self) -> Arc<dyn FrameScheduler> {
        self.scheduler.clone()
    }

    fn surface_factory(&self) -> Arc<dyn SurfaceFactory> {
        self.factory.clone()
    }

    fn supports_isolated_surface(&self) -> bool {
        self.isolated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_platform_reports_no_isolation() {
        let p = NoopHostPlatform::new();
        assert!(!p.supports_isolated_surface());
        assert!(!p.scroll_surface().has_clients());
    }

    #[test]
    fn fixed_platform_passes_through_capability() {
        let p = FixedHostPlatform::new(
            Arc::new(NoopScrollSurface::new()),
            Arc::new(ManualFrameScheduler::new()),
            Arc::new(InMemorySurfaceFactory::new()),
            true,
        );
        assert!(p.supports_isolated_surface());
    }
}
