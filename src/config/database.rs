use serde::Deserialize;
use std::time::Duration;

/// MySQL connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// MySQL user name
    pub user: String,

    /// MySQL password
    pub password: String,

    /// MySQL server host
    pub host: String,

    /// MySQL server port
    pub port: u16,

    /// Schema holding the `redirect` table
    pub database: String,

    /// Maximum number of database connections in the pool
    pub max_connections: u32,

    /// Minimum number of database connections to maintain
    pub min_connections: u32,

    /// Timeout in seconds for acquiring a connection from the pool
    pub acquire_timeout_seconds: u64,

    /// Timeout in seconds applied to every store call
    pub query_timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_seconds)
    }

    /// Connection target without credentials, safe to log
    pub fn describe(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }

    /// Validate database configuration values
    pub fn validate(&self) -> Result<(), String> {
        for (key, value) in [
            ("mysql_user", &self.user),
            ("mysql_host", &self.host),
            ("mysql_database", &self.database),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must be set", key));
            }
        }

        if self.min_connections > self.max_connections {
            return Err("db_min_connections cannot be greater than db_max_connections".to_string());
        }

        if self.acquire_timeout_seconds == 0 {
            return Err("db_acquire_timeout_seconds must be greater than 0".to_string());
        }

        if self.query_timeout_seconds == 0 {
            return Err("db_query_timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}
