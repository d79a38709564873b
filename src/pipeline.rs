//! End-to-end render path and construction-time strategy selection
//!
//! The pipeline is resolve -> content identity -> registry -> surface view.
//! Which strategy runs is decided once, when the renderer is built: hosts
//! that can mount an isolated surface get the sandboxed path, everything
//! else gets the plain-text fallback. There is no per-render branching.

use crate::channel::MessageChannel;
use crate::fallback::FallbackRenderer;
use crate::height::HeightNegotiator;
use crate::platform::HostPlatform;
use crate::registry::{ContentIdentity, SurfaceRef, SurfaceRegistry};
use crate::resolver::{AttachmentFetcher, ContentResolver};
use crate::scroll::ScrollCoordinator;
use crate::{MailBody, RenderConfig};
use futures::future::BoxFuture;
use log::debug;
use std::sync::Arc;

/// What the host should show for a mail body
#[derive(Debug, Clone, PartialEq)]
pub enum BodyView {
    /// Mount the registered isolated surface by reference
    Surface(Arc<SurfaceRef>),
    /// Show this text in an ordinary text widget
    PlainText(String),
}

/// Body rendering strategy. Two variants exist: the sandboxed pipeline and
/// the plain-text fallback; `new_renderer` picks one at construction time.
pub trait BodyRenderer: Send + Sync {
    /// Render the mail entering the detail view.
    ///
    /// Returns `None` when the mail was superseded while its resolution was
    /// in flight; the caller shows nothing for it and no side effect has
    /// occurred.
    fn render<'a>(&'a self, mail: &'a MailBody) -> BoxFuture<'a, Option<BodyView>>;
}

/// The full pipeline: resolves embedded references, derives the content
/// identity, and registers an isolated surface at most once per identity.
pub struct SandboxedRenderer {
    config: RenderConfig,
    host: Arc<dyn HostPlatform>,
    resolver: Arc<ContentResolver>,
    registry: Arc<SurfaceRegistry>,
    fetcher: Arc<dyn AttachmentFetcher>,
}

impl SandboxedRenderer {
    pub fn new(
        config: RenderConfig,
        host: Arc<dyn HostPlatform>,
        fetcher: Arc<dyn AttachmentFetcher>,
    ) -> Self {
        let registry = Arc::new(SurfaceRegistry::new(host.surface_factory(), config.clone()));
        Self {
            config,
            host,
            resolver: Arc::new(ContentResolver::new()),
            registry,
            fetcher,
        }
    }

    /// The resolver driving this renderer's memoization and active-mail
    /// tracking
    pub fn resolver(&self) -> Arc<ContentResolver> {
        self.resolver.clone()
    }

    /// The surface registry backing this renderer
    pub fn registry(&self) -> Arc<SurfaceRegistry> {
        self.registry.clone()
    }

    /// Open the message channel for an active surface, wired to the host's
    /// scroll surface and paint scheduler. One channel per mounted surface.
    pub fn open_channel(&self) -> MessageChannel {
        MessageChannel::new(
            ScrollCoordinator::new(self.host.scroll_surface(), self.host.frame_scheduler()),
            HeightNegotiator::new(self.config.default_surface_height),
        )
    }
}

impl BodyRenderer for SandboxedRenderer {
    fn render<'a>(&'a self, mail: &'a MailBody) -> BoxFuture<'a, Option<BodyView>> {
        Box::pin(async move {
            let Some(markup) = mail.html.as_deref() else {
                // No HTML part: nothing to isolate, show the text directly
                return Some(BodyView::PlainText(
                    mail.text.clone().unwrap_or_default(),
                ));
            };

            self.resolver.set_active_mail(&mail.mail_id);
            let resolved = self
                .resolver
                .resolve_for_mail(&mail.mail_id, markup, &mail.attachments, self.fetcher.as_ref())
                .await;

            // Identity check before any side effect: a resolution that
            // completed after the user moved on registers nothing.
            if !self.resolver.is_active(&mail.mail_id) {
                debug!("discarding superseded resolution for mail '{}'", mail.mail_id);
                return None;
            }

            let identity = ContentIdentity::of(&resolved.resolved_markup);
            let surface = self
                .registry
                .ensure_registered(&identity, &resolved.resolved_markup);
            Some(BodyView::Surface(surface))
        })
    }
}

impl BodyRenderer for FallbackRenderer {
    fn render<'a>(&'a self, mail: &'a MailBody) -> BoxFuture<'a, Option<BodyView>> {
        Box::pin(async move { Some(BodyView::PlainText(self.render_text(mail))) })
    }
}

/// Create a renderer for the given host, preferring the sandboxed pipeline
/// when isolation is enabled and the host can mount an isolated surface.
pub fn new_renderer(
    config: RenderConfig,
    host: Arc<dyn HostPlatform>,
    fetcher: Arc<dyn AttachmentFetcher>,
) -> Box<dyn BodyRenderer> {
    if config.enable_isolation && host.supports_isolated_surface() {
        Box::new(SandboxedRenderer::new(config, host, fetcher))
    } else {
        Box::new(FallbackRenderer::new())
    }
}
