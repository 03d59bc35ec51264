//! Shortening a URL: reuse an existing mapping or allocate and insert a new one.

use crate::db::Store;
use crate::error::{AppError, AppResult};
use crate::models::{InsertOutcome, Redirect, ShortenOutcome};
use crate::services::SlugAllocator;
use http::HeaderValue;
use tracing::{info, warn};
use url::Url as UrlParser;

/// A lost insert race is retried once with a fresh slug.
const INSERT_ATTEMPTS: u32 = 2;

/// Canonical form of a submitted URL, used for both the dedup lookup and the insert.
///
/// Surrounding whitespace is trimmed and the URL is otherwise kept verbatim.
/// It must always be usable as a `Location` header. With `strict` set the URL
/// must also parse and use http or https.
pub fn normalize_url(raw: &str, strict: bool) -> AppResult<String> {
    let url = raw.trim();

    if url.is_empty() {
        return Err(AppError::MissingUrl);
    }

    if HeaderValue::from_str(url).is_err() {
        return Err(AppError::InvalidUrl(
            "URL contains characters not allowed in a redirect".to_string(),
        ));
    }

    if strict {
        let parsed = UrlParser::parse(url)
            .map_err(|_| AppError::InvalidUrl("Invalid URL format".to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::InvalidUrl("URL must start with http:// or https://".to_string()));
        }
    }

    Ok(url.to_string())
}

/// Fully qualified short link for a slug
pub fn short_link(short_url: &str, slug: &str) -> String {
    format!("{}/{}", short_url, slug)
}

/// Shorten `raw_url`, returning the existing mapping when the URL was seen before.
pub async fn shorten(
    store: &dyn Store,
    allocator: &SlugAllocator,
    raw_url: &str,
    strict: bool,
) -> AppResult<ShortenOutcome> {
    let url = normalize_url(raw_url, strict)?;

    if let Some(existing) = store.find_by_url(&url).await? {
        return Ok(ShortenOutcome::Existing(existing));
    }

    let mut last_slug = String::new();

    for attempt in 1..=INSERT_ATTEMPTS {
        let slug = allocator.allocate(store).await?;
        let redirect = Redirect::new(slug, url.as_str());

        match store.insert(&redirect).await? {
            InsertOutcome::Inserted => {
                info!(slug = %redirect.slug, url = %redirect.url, "Created redirect");
                return Ok(ShortenOutcome::Created(redirect));
            }
            InsertOutcome::SlugTaken => {
                warn!(slug = %redirect.slug, attempt, "Slug claimed by a concurrent insert");
                last_slug = redirect.slug;
            }
            InsertOutcome::UrlTaken => {
                let existing = store.find_by_url(&url).await?.ok_or_else(|| {
                    AppError::Internal(format!("Mapping for {} vanished after insert conflict", url))
                })?;
                info!(slug = %existing.slug, url = %existing.url, "URL shortened by a concurrent request");
                return Ok(ShortenOutcome::Existing(existing));
            }
        }
    }

    Err(AppError::SlugCollision(last_slug))
}
