//! Error types for the rendering pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the rendering pipeline
///
/// Most failure modes in this subsystem degrade instead of propagating: a
/// failed attachment fetch leaves the reference unresolved, malformed
/// protocol traffic is dropped, and a missing isolation capability selects
/// the fallback renderer. The variants below cover the cases that still
/// surface to a caller, mainly the injected attachment fetcher.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to fetch attachment bytes through the injected fetcher
    #[error("Attachment fetch failed for '{0}': {1}")]
    FetchError(String, String),

    /// The mail body carries no renderable content at all
    #[error("Mail body has no HTML or text content")]
    EmptyBody,

    /// Failed to build the isolated surface document
    #[error("Surface construction failed: {0}")]
    SurfaceError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
