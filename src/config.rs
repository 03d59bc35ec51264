//! Typed service configuration.
//!
//! Values come from a file named `slugly` (`.toml`, `.yaml` or `.json`) looked
//! up in the search path, overridden by `SLUGLY_*` environment variables. Files
//! found later in [`search_paths`] take precedence over earlier ones.

mod database;
mod links;
mod server;

pub use database::DatabaseConfig;
pub use links::LinkConfig;
pub use server::{LogFormat, ServerConfig};

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Base name of the configuration file
pub const CONFIG_NAME: &str = "slugly";

/// Prefix for environment variable overrides (`SLUGLY_SHORT_URL`, ...)
pub const ENV_PREFIX: &str = "SLUGLY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub links: LinkConfig,
}

/// Flat key layout of the configuration file.
#[derive(Debug, Deserialize)]
struct Settings {
    mysql_user: String,
    mysql_password: String,
    mysql_host: String,
    mysql_port: u16,
    mysql_database: String,
    short_url: Option<String>,
    default_url: Option<String>,
    listen_host: String,
    listen_port: u16,
    db_max_connections: u32,
    db_min_connections: u32,
    db_acquire_timeout_seconds: u64,
    db_query_timeout_seconds: u64,
    slug_length: usize,
    slug_max_attempts: u32,
    strict_url_validation: bool,
    log_format: LogFormat,
}

/// Directories searched for the configuration file, lowest precedence first:
/// the working directory, `/etc/slugly`, `$HOME/.slugly`, then `explicit_dir`.
pub fn search_paths(explicit_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("."), PathBuf::from("/etc").join(CONFIG_NAME)];

    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(format!(".{}", CONFIG_NAME)));
    }

    if let Some(dir) = explicit_dir {
        paths.push(dir.to_path_buf());
    }

    paths
}

impl Config {
    /// Load configuration from the search path and the environment
    pub fn load(explicit_dir: Option<&Path>) -> AppResult<Self> {
        dotenvy::dotenv().ok();

        Self::load_from(&search_paths(explicit_dir), true)
    }

    fn load_from(dirs: &[PathBuf], with_env: bool) -> AppResult<Self> {
        let mut builder = config::Config::builder()
            .set_default("mysql_user", "")?
            .set_default("mysql_password", "")?
            .set_default("mysql_host", "")?
            .set_default("mysql_port", 3306_i64)?
            .set_default("mysql_database", "")?
            .set_default("listen_host", "0.0.0.0")?
            .set_default("listen_port", 8080_i64)?
            .set_default("db_max_connections", 10_i64)?
            .set_default("db_min_connections", 1_i64)?
            .set_default("db_acquire_timeout_seconds", 30_i64)?
            .set_default("db_query_timeout_seconds", 5_i64)?
            .set_default("slug_length", 6_i64)?
            .set_default("slug_max_attempts", 100_i64)?
            .set_default("strict_url_validation", false)?
            .set_default("log_format", "text")?;

        for dir in dirs {
            let path = dir.join(CONFIG_NAME);
            builder = builder.add_source(config::File::with_name(&path.to_string_lossy()).required(false));
        }

        if with_env {
            builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        let config = Self::from(settings);

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.server.validate().map_err(AppError::Configuration)?;
        self.database.validate().map_err(AppError::Configuration)?;
        self.links.validate().map_err(AppError::Configuration)?;

        Ok(())
    }
}

impl From<Settings> for Config {
    fn from(s: Settings) -> Self {
        Config {
            server: ServerConfig {
                host: s.listen_host,
                port: s.listen_port,
                log_format: s.log_format,
            },
            database: DatabaseConfig {
                user: s.mysql_user,
                password: s.mysql_password,
                host: s.mysql_host,
                port: s.mysql_port,
                database: s.mysql_database,
                max_connections: s.db_max_connections,
                min_connections: s.db_min_connections,
                acquire_timeout_seconds: s.db_acquire_timeout_seconds,
                query_timeout_seconds: s.db_query_timeout_seconds,
            },
            links: LinkConfig {
                short_url: non_empty(s.short_url).map(|u| u.trim_end_matches('/').to_string()),
                default_url: non_empty(s.default_url),
                slug_length: s.slug_length,
                slug_max_attempts: s.slug_max_attempts,
                strict_url_validation: s.strict_url_validation,
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
