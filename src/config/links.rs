use serde::Deserialize;
use url::Url;

/// Short link construction and slug allocation settings
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Base URL that slugs are appended to (e.g., "http://short.ly")
    pub short_url: Option<String>,

    /// Redirect target for unmatched paths
    pub default_url: Option<String>,

    /// Length of randomly generated slugs
    pub slug_length: usize,

    /// Maximum number of candidates drawn before allocation gives up
    pub slug_max_attempts: u32,

    /// Whether submitted URLs must parse and use http:// or https://
    pub strict_url_validation: bool,
}

impl LinkConfig {
    /// Validate link configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.slug_length < 4 || self.slug_length > 16 {
            return Err("slug_length must be between 4 and 16".to_string());
        }

        if self.slug_max_attempts < 1 || self.slug_max_attempts > 1000 {
            return Err("slug_max_attempts must be between 1 and 1000".to_string());
        }

        if let Some(short_url) = &self.short_url {
            require_http_url("short_url", short_url)?;
        }

        if let Some(default_url) = &self.default_url {
            require_http_url("default_url", default_url)?;
        }

        Ok(())
    }
}

fn require_http_url(key: &str, value: &str) -> Result<(), String> {
    let parsed = Url::parse(value).map_err(|e| format!("{} is not a valid URL: {}", key, e))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("{} must use http or https, got {}", key, other)),
    }
}
