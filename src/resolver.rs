//! Content resolver: rewrites `cid:` embedded references into self-contained
//! `data:` URIs before the markup is handed to a render surface.
//!
//! Resolution is best-effort. A reference that is missing from the mail's
//! attachment index, or whose bytes fail to fetch, is left untouched in the
//! markup; the rest of the body still renders.

use crate::{AttachmentIndex, Result};
use base64::Engine as Base64Engine;
use futures::future::BoxFuture;
use log::{debug, warn};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Async byte source for attachments, injected by the surrounding mail
/// feature (download service, local cache, test double).
pub trait AttachmentFetcher: Send + Sync {
    /// Fetch the raw bytes of the attachment with the given id
    fn fetch_bytes<'a>(&'a self, attachment_id: &'a str) -> BoxFuture<'a, Result<Vec<u8>>>;
}

/// A fetcher backed by an in-memory map, used in tests and examples
pub struct InMemoryFetcher {
    bytes: Mutex<HashMap<String, Vec<u8>>>,
    calls: std::sync::atomic::AtomicUsize,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self {
            bytes: Mutex::new(HashMap::new()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Register bytes for an attachment id
    pub fn insert(&self, attachment_id: &str, data: Vec<u8>) {
        if let Ok(mut lock) = self.bytes.lock() {
            lock.insert(attachment_id.to_string(), data);
        }
    }

    /// Number of fetch calls issued so far
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl Default for InMemoryFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AttachmentFetcher for InMemoryFetcher {
    fn fetch_bytes<'a>(&'a self, attachment_id: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let result = self
            .bytes
            .lock()
            .ok()
            .and_then(|lock| lock.get(attachment_id).cloned())
            .ok_or_else(|| {
                crate::Error::FetchError(attachment_id.to_string(), "not found".to_string())
            });
        Box::pin(async move { result })
    }
}

/// The outcome of one resolution pass, owned by the resolver's cache.
/// Replaced wholesale when the active mail changes; never mutated in place.
#[derive(Debug, Clone)]
pub struct ResolvedContent {
    /// The raw markup as it arrived from the mail
    pub source_markup: String,
    /// Markup with every resolvable reference inlined
    pub resolved_markup: String,
    /// When this pass completed
    pub resolved_at: Instant,
}

/// Collect the distinct `cid:` reference ids found in element attributes,
/// in document order.
fn collect_reference_ids(markup: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    let all = Selector::parse("*").unwrap();
    let mut ids = Vec::new();
    for node in document.select(&all) {
        for (_, value) in node.value().attrs() {
            if let Some(id) = value.strip_prefix("cid:") {
                if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
                    ids.push(id.to_string());
                }
            }
        }
    }
    ids
}

/// Resolve embedded references in `markup` against the mail's attachment
/// index, fetching bytes through the injected fetcher.
///
/// Markup with zero references is returned unchanged without issuing a
/// single fetch call.
pub async fn resolve(
    markup: &str,
    attachment_index: &AttachmentIndex,
    fetcher: &dyn AttachmentFetcher,
) -> String {
    let mut ids = collect_reference_ids(markup);
    if ids.is_empty() {
        return markup.to_string();
    }

    // Substitute longer ids first so an id that is a prefix of another
    // (img1 vs img10) never rewrites the head of the longer reference.
    ids.sort_by_key(|id| std::cmp::Reverse(id.len()));

    let mut resolved = markup.to_string();
    for id in ids {
        let Some(meta) = attachment_index.get(&id) else {
            debug!("embedded reference 'cid:{}' has no attachment entry, leaving as-is", id);
            continue;
        };

        match fetcher.fetch_bytes(&id).await {
            Ok(bytes) => {
                let b64 = Base64Engine::encode(&base64::engine::general_purpose::STANDARD, &bytes);
                let inline = format!("data:{};base64,{}", meta.mime_type, b64);
                resolved = resolved.replace(&format!("cid:{}", id), &inline);
            }
            Err(e) => {
                warn!("failed to fetch attachment for 'cid:{}': {}", id, e);
            }
        }
    }

    resolved
}

/// Memoizing resolver keyed by mail id.
///
/// One entry is cached for the mail currently shown in the detail view.
/// Switching the active mail invalidates the previous entry but does not
/// cancel in-flight work; a late result is simply not cached and the
/// pipeline discards it before any registration side effect.
pub struct ContentResolver {
    cache: Mutex<Option<(String, Arc<ResolvedContent>)>>,
    active_mail: Mutex<Option<String>>,
}

impl ContentResolver {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(None),
            active_mail: Mutex::new(None),
        }
    }

    /// Mark a mail as the active detail view, invalidating the cache entry
    /// of any previously active mail.
    pub fn set_active_mail(&self, mail_id: &str) {
        if let Ok(mut active) = self.active_mail.lock() {
            *active = Some(mail_id.to_string());
        }
        if let Ok(mut cache) = self.cache.lock() {
            if cache.as_ref().map(|(id, _)| id.as_str()) != Some(mail_id) {
                *cache = None;
            }
        }
    }

    /// Whether the given mail is still the active detail view
    pub fn is_active(&self, mail_id: &str) -> bool {
        self.active_mail
            .lock()
            .map(|active| active.as_deref() == Some(mail_id))
            .unwrap_or(false)
    }

    /// Resolve the markup for a mail, reusing the cached result while the
    /// mail stays active.
    pub async fn resolve_for_mail(
        &self,
        mail_id: &str,
        markup: &str,
        attachment_index: &AttachmentIndex,
        fetcher: &dyn AttachmentFetcher,
    ) -> Arc<ResolvedContent> {
        if let Ok(cache) = self.cache.lock() {
            if let Some((cached_id, content)) = cache.as_ref() {
                if cached_id == mail_id {
                    return content.clone();
                }
            }
        }

        let resolved_markup = resolve(markup, attachment_index, fetcher).await;
        let content = Arc::new(ResolvedContent {
            source_markup: markup.to_string(),
            resolved_markup,
            resolved_at: Instant::now(),
        });

        // Only cache while the mail is still the active view; a superseded
        // result is returned to the caller but never stored.
        if self.is_active(mail_id) {
            if let Ok(mut cache) = self.cache.lock() {
                *cache = Some((mail_id.to_string(), content.clone()));
            }
        }

        content
    }
}

impl Default for ContentResolver {
    fn default() -> Self {
        Self::new()
    }
}
