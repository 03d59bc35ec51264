#![allow(dead_code)]

use async_trait::async_trait;
use slugly::config::LinkConfig;
use slugly::db::Store;
use slugly::error::{AppError, AppResult};
use slugly::models::{InsertOutcome, Redirect, Stats};
use slugly::routes::{create_router, AppState};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-process store with the same uniqueness rules as the `redirect` table.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Redirect>>,
    /// Inserts to reject as if another request had claimed the slug first
    pub lose_insert_races: AtomicUsize,
    /// Inserts to reject as if another request had stored the same URL first
    pub concurrent_url_inserts: AtomicUsize,
    pub fail_increments: AtomicBool,
    pub fail_pings: AtomicBool,
}

impl MemoryStore {
    pub fn get(&self, slug: &str) -> Option<Redirect> {
        self.rows.lock().unwrap().iter().find(|r| r.slug == slug).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn seed(&self, slug: &str, url: &str) {
        self.rows.lock().unwrap().push(Redirect::new(slug, url));
    }
}

fn unavailable() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Redirect>> {
        Ok(self.get(slug))
    }

    async fn find_by_url(&self, url: &str) -> AppResult<Option<Redirect>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.url == url).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        Ok(self.get(slug).is_some())
    }

    async fn insert(&self, redirect: &Redirect) -> AppResult<InsertOutcome> {
        let lost = self
            .lose_insert_races
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if lost {
            return Ok(InsertOutcome::SlugTaken);
        }

        let mut rows = self.rows.lock().unwrap();
        let rival = self
            .concurrent_url_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rival {
            rows.push(Redirect::new("rival1", redirect.url.as_str()));
        }

        if rows.iter().any(|r| r.slug == redirect.slug) {
            return Ok(InsertOutcome::SlugTaken);
        }
        if rows.iter().any(|r| r.url == redirect.url) {
            return Ok(InsertOutcome::UrlTaken);
        }
        rows.push(redirect.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn increment_hits(&self, slug: &str) -> AppResult<bool> {
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.slug == slug) {
            Some(row) => {
                row.hits += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> AppResult<()> {
        if self.fail_pings.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn stats(&self) -> AppResult<Stats> {
        let rows = self.rows.lock().unwrap();
        Ok(Stats {
            total_redirects: rows.len() as i64,
            total_hits: rows.iter().map(|r| r.hits).sum(),
        })
    }
}

pub fn link_config(short_url: Option<&str>, default_url: Option<&str>) -> LinkConfig {
    LinkConfig {
        short_url: short_url.map(str::to_string),
        default_url: default_url.map(str::to_string),
        slug_length: 6,
        slug_max_attempts: 100,
        strict_url_validation: false,
    }
}

pub fn create_test_app(store: Arc<MemoryStore>, links: LinkConfig) -> axum::Router {
    let state = Arc::new(AppState::new(store, links));
    create_router(state)
}

/// Router with `short_url = http://short.ly` and no fallback target
pub fn default_test_app(store: Arc<MemoryStore>) -> axum::Router {
    create_test_app(store, link_config(Some("http://short.ly"), None))
}
