use crate::db::Store;
use crate::error::{AppError, AppResult};
use crate::models::Redirect;
use http::HeaderValue;

/// Look up a slug and count the hit.
///
/// The hit is recorded before the mapping is returned; if the counter update
/// fails the error propagates and no redirect is issued. A stored URL that
/// cannot be sent as `Location` is an error and is not counted.
pub async fn resolve(store: &dyn Store, slug: &str) -> AppResult<Redirect> {
    let mut redirect = store
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::SlugNotFound(slug.to_string()))?;

    if HeaderValue::from_str(&redirect.url).is_err() {
        return Err(AppError::Internal(format!(
            "Stored target of {} is not a valid redirect",
            slug
        )));
    }

    if !store.increment_hits(slug).await? {
        return Err(AppError::SlugNotFound(slug.to_string()));
    }

    redirect.hits += 1;
    Ok(redirect)
}
