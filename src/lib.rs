//! Mailsurface: embedded rich-content rendering pipeline for mail bodies
//!
//! This crate implements the machinery a mail client needs to display an
//! untrusted HTML body inside an isolated rendering surface:
//!
//! - **Content resolution**: `cid:` embedded references are rewritten into
//!   self-contained `data:` URIs before anything is handed to a surface
//! - **Surface registry**: resolved markup is registered at most once per
//!   content identity, so identical bodies reuse one surface
//! - **Message channel**: a tagged JSON protocol carries scroll deltas and
//!   height reports between the host and the surface
//! - **Fallback rendering**: a plain-text view is produced when no isolated
//!   surface is available on the current target
//!
//! # Example
//!
//! ```
//! use mailsurface::{BodyRenderer, MailBody, RenderConfig};
//! use mailsurface::platform::NoopHostPlatform;
//! use mailsurface::resolver::InMemoryFetcher;
//! use std::sync::Arc;
//!
//! let config = RenderConfig::default();
//! let host = Arc::new(NoopHostPlatform::new());
//! let fetcher = Arc::new(InMemoryFetcher::new());
//! let renderer = mailsurface::new_renderer(config, host, fetcher);
//!
//! let mail = MailBody {
//!     mail_id: "msg-1".to_string(),
//!     html: Some("<p>Hello</p>".to_string()),
//!     text: None,
//!     attachments: Default::default(),
//! };
//! let view = futures::executor::block_on(renderer.render(&mail));
//! assert!(view.is_some());
//! ```

use std::collections::HashMap;

pub mod error;
pub use error::{Error, Result};

pub mod channel;
pub mod fallback;
pub mod height;
pub mod pipeline;
pub mod platform;
pub mod registry;
pub mod resolver;
pub mod scroll;
pub mod surface;

pub use channel::{ChannelMessage, MessageChannel, CHANNEL_TAG};
pub use fallback::FallbackRenderer;
pub use height::HeightNegotiator;
pub use pipeline::{new_renderer, BodyRenderer, BodyView, SandboxedRenderer};
pub use registry::{ContentIdentity, SurfaceRef, SurfaceRegistry};
pub use resolver::{AttachmentFetcher, ContentResolver, ResolvedContent};
pub use scroll::ScrollCoordinator;

/// Configuration for the rendering pipeline
///
/// The defaults are chosen so the host can mount a surface before any
/// measurement has arrived: `default_surface_height` reserves layout space
/// until the first height report, and `height_debounce_ms` is the window the
/// surface-side instrumentation uses to collapse measurement bursts.
///
/// # Examples
///
/// ```
/// let cfg = mailsurface::RenderConfig::default();
/// assert_eq!(cfg.default_surface_height, 400.0);
/// assert!(cfg.enable_isolation);
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Layout height reserved before the surface reports its own
    pub default_surface_height: f64,
    /// Debounce window for surface-side height measurements, in milliseconds
    pub height_debounce_ms: u64,
    /// Whether to attempt an isolated surface at all; when false the
    /// fallback renderer is selected regardless of host capability
    pub enable_isolation: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_surface_height: 400.0,
            height_debounce_ms: 80,
            enable_isolation: true,
        }
    }
}

/// Metadata for one attachment, keyed by its reference id in the mail's
/// attachment index
#[derive(Debug, Clone)]
pub struct AttachmentMeta {
    /// Mime type reported by the mail, e.g. "image/png"
    pub mime_type: String,
    /// Declared size in bytes
    pub size: u64,
}

/// Lookup from embedded reference id to attachment metadata, sourced from
/// the mail's attachment list by the surrounding detail feature
pub type AttachmentIndex = HashMap<String, AttachmentMeta>;

/// The body of the mail currently shown in the detail view
#[derive(Debug, Clone, Default)]
pub struct MailBody {
    /// Stable identifier of the mail; keys the resolver's memoization
    pub mail_id: String,
    /// Raw, untrusted HTML part if present
    pub html: Option<String>,
    /// Plain-text part if present
    pub text: Option<String>,
    /// Index of the mail's attachments by reference id
    pub attachments: AttachmentIndex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.default_surface_height, 400.0);
        assert_eq!(config.height_debounce_ms, 80);
        assert!(config.enable_isolation);
    }

    #[test]
    fn test_mail_body_default_is_empty() {
        let mail = MailBody::default();
        assert!(mail.html.is_none());
        assert!(mail.text.is_none());
        assert!(mail.attachments.is_empty());
    }
}
