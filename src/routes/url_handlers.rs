use crate::error::{AppError, AppResult};
use crate::models::ShortenQuery;
use crate::services::{self, fallback_target, short_link};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http::header::LOCATION;
use http::HeaderValue;
use regex::Regex;
use std::sync::Arc;
use validator::Validate;

use super::AppState;

/// Shorten `?url=` and answer with the short link as plain text.
///
/// `201 Created` for a new mapping, `200 OK` when the URL was already shortened.
pub async fn shorten_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShortenQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate().map_err(|_| AppError::MissingUrl)?;
    let url = query.url.as_deref().ok_or(AppError::MissingUrl)?;

    let short_url = state
        .links
        .short_url
        .as_deref()
        .ok_or(AppError::MissingConfigKey("short_url"))?;

    let outcome = services::shorten(
        state.store.as_ref(),
        &state.allocator,
        url,
        state.links.strict_url_validation,
    )
    .await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, short_link(short_url, &outcome.redirect().slug)))
}

/// Resolve a slug, count the hit and redirect
pub async fn resolve_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let slug_regex = Regex::new(r"^[A-Za-z0-9]+$")
        .map_err(|e| AppError::Internal(format!("Invalid regex pattern: {}", e)))?;

    // Not a slug route; behave like any other unmatched path
    if !slug_regex.is_match(&slug) {
        return fallback(State(state)).await;
    }

    let redirect = services::resolve(state.store.as_ref(), &slug).await?;

    moved_permanently(&redirect.url)
}

/// Catch-all for `/` and unmatched paths
pub async fn fallback(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let target = fallback_target(&state.links).ok_or(AppError::NoFallback)?;

    moved_permanently(target)
}

fn moved_permanently(target: &str) -> AppResult<Response> {
    let location = HeaderValue::try_from(target)
        .map_err(|_| AppError::Internal(format!("Redirect target is not a valid header value: {}", target)))?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response())
}
