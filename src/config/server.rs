use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to bind to (e.g., 8080)
    pub port: u16,

    /// Output format of the tracing subscriber
    pub log_format: LogFormat,
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl ServerConfig {
    /// Socket address string for the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate server configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("listen_host must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("listen_port must be greater than 0".to_string());
        }

        Ok(())
    }
}
