use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::models::{InsertOutcome, Redirect, Stats};
use async_trait::async_trait;
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    ConnectOptions, MySqlPool,
};
use std::future::Future;
use std::time::Duration;

/// Unique key over the stored hash of `url`
const URL_UNIQUE_KEY: &str = "uq_redirect_url_hash";

/// Persistence operations the services rely on.
///
/// Slugs and URLs are both unique in the table; `insert` reports a violation
/// as [`InsertOutcome::SlugTaken`] or [`InsertOutcome::UrlTaken`] rather than
/// an error. Comparisons are exact: case and accents matter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Exact-match lookup by slug
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Redirect>>;

    /// Oldest mapping for a URL, if it was shortened before
    async fn find_by_url(&self, url: &str) -> AppResult<Option<Redirect>>;

    async fn slug_exists(&self, slug: &str) -> AppResult<bool>;

    async fn insert(&self, redirect: &Redirect) -> AppResult<InsertOutcome>;

    /// Add one hit. Returns `false` when no mapping has this slug.
    async fn increment_hits(&self, slug: &str) -> AppResult<bool>;

    async fn ping(&self) -> AppResult<()>;

    async fn stats(&self) -> AppResult<Stats>;
}

/// MySQL-backed store
#[derive(Clone)]
pub struct Repository {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl Repository {
    /// Create a new repository with a connection pool
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .charset("utf8mb4")
            .disable_statement_logging();

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool, config.query_timeout()))
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: MySqlPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn timed<T, F>(&self, query: F) -> AppResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| AppError::StoreTimeout(self.query_timeout))?
            .map_err(AppError::from)
    }
}

#[async_trait]
impl Store for Repository {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Redirect>> {
        self.timed(
            sqlx::query_as::<_, Redirect>(
                r#"
                SELECT slug, url, date, hits FROM redirect
                WHERE slug = ?
                "#,
            )
            .bind(slug)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find_by_url(&self, url: &str) -> AppResult<Option<Redirect>> {
        self.timed(
            sqlx::query_as::<_, Redirect>(
                r#"
                SELECT slug, url, date, hits FROM redirect
                WHERE url_hash = UNHEX(SHA2(?, 256)) AND url = ?
                ORDER BY id
                LIMIT 1
                "#,
            )
            .bind(url)
            .bind(url)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn slug_exists(&self, slug: &str) -> AppResult<bool> {
        let count = self
            .timed(
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM redirect WHERE slug = ?
                    "#,
                )
                .bind(slug)
                .fetch_one(&self.pool),
            )
            .await?;

        Ok(count > 0)
    }

    async fn insert(&self, redirect: &Redirect) -> AppResult<InsertOutcome> {
        let result = self
            .timed(
                sqlx::query(
                    r#"
                    INSERT INTO redirect (slug, url, date, hits)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(&redirect.slug)
                .bind(&redirect.url)
                .bind(redirect.created_at)
                .bind(redirect.hits)
                .execute(&self.pool),
            )
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(AppError::Database(sqlx::Error::Database(e))) if e.is_unique_violation() => {
                if e.message().contains(URL_UNIQUE_KEY) {
                    Ok(InsertOutcome::UrlTaken)
                } else {
                    Ok(InsertOutcome::SlugTaken)
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn increment_hits(&self, slug: &str) -> AppResult<bool> {
        let result = self
            .timed(
                sqlx::query(
                    r#"
                    UPDATE redirect
                    SET hits = hits + 1
                    WHERE slug = ?
                    "#,
                )
                .bind(slug)
                .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        self.timed(sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }

    async fn stats(&self) -> AppResult<Stats> {
        let row = self
            .timed(
                sqlx::query_as::<_, (i64, i64)>(
                    r#"
                    SELECT
                        COUNT(*) AS total_redirects,
                        CAST(COALESCE(SUM(hits), 0) AS SIGNED) AS total_hits
                    FROM redirect
                    "#,
                )
                .fetch_one(&self.pool),
            )
            .await?;

        Ok(Stats {
            total_redirects: row.0,
            total_hits: row.1,
        })
    }
}
