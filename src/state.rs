use crate::config::LinkConfig;
use crate::db::Store;
use crate::services::SlugAllocator;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This struct is wrapped in `Arc` and shared across all request handlers
/// via Axum's State extraction. Nothing in it is mutated after startup;
/// cross-request coordination happens in the store.
#[derive(Clone)]
pub struct AppState {
    /// Persistence store for redirect mappings
    pub store: Arc<dyn Store>,

    /// Random slug generator bound to the configured length and attempt limit
    pub allocator: SlugAllocator,

    /// Short link base, fallback target and URL validation settings
    pub links: LinkConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, links: LinkConfig) -> Self {
        Self {
            store,
            allocator: SlugAllocator::new(links.slug_length, links.slug_max_attempts),
            links,
        }
    }
}
