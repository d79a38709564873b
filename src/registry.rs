//! Render-surface registry keyed by content identity
//!
//! A surface is registered at most once per distinct resolved markup for the
//! lifetime of the process. The registry only grows; entries are small
//! (one built document string each) and bounded by the distinct mail bodies
//! viewed in a session, so there is no eviction.

use crate::platform::SurfaceFactory;
use crate::surface;
use crate::RenderConfig;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A stable key derived from fully resolved markup, used to dedupe surface
/// creation. Hash collisions between distinct markup strings are tolerated,
/// not guarded against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentIdentity(String);

impl ContentIdentity {
    /// Derive the identity of a resolved markup string
    pub fn of(resolved_markup: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(resolved_markup.as_bytes());
        ContentIdentity(hex::encode(hasher.finalize()))
    }

    /// The hex digest backing this identity
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reference to a registered surface: the identity it was registered under
/// and the isolated document built for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRef {
    pub identity: ContentIdentity,
    pub document: String,
}

/// Append-only registry of render surfaces.
///
/// Explicit and injectable rather than process-global, so the pipeline stays
/// testable in isolation; all access happens on the host's single UI thread
/// of control, the mutex only satisfies `Send + Sync`.
pub struct SurfaceRegistry {
    factory: Arc<dyn SurfaceFactory>,
    config: RenderConfig,
    entries: Mutex<HashMap<ContentIdentity, Arc<SurfaceRef>>>,
}

impl SurfaceRegistry {
    pub fn new(factory: Arc<dyn SurfaceFactory>, config: RenderConfig) -> Self {
        Self {
            factory,
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a surface for the given content identity, building the
    /// isolated document on first sight. Idempotent: a repeated call with
    /// the same identity returns the existing reference and never rebuilds
    /// or overwrites.
    pub fn ensure_registered(
        &self,
        identity: &ContentIdentity,
        resolved_markup: &str,
    ) -> Arc<SurfaceRef> {
        if let Ok(entries) = self.entries.lock() {
            if let Some(existing) = entries.get(identity) {
                return existing.clone();
            }
        }

        let document = surface::build_isolated_document(resolved_markup, &self.config);
        let surface = self.factory.create_surface(identity, &document);

        match self.entries.lock() {
            Ok(mut entries) => entries
                .entry(identity.clone())
                .or_insert_with(|| surface.clone())
                .clone(),
            Err(_) => surface,
        }
    }

    /// Number of distinct surfaces registered so far
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
