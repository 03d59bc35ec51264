use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Row of the `redirect` table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Redirect {
    pub slug: String,
    pub url: String,
    #[sqlx(rename = "date")]
    pub created_at: DateTime<Utc>,
    pub hits: i64,
}

impl Redirect {
    /// A freshly created mapping with no hits
    pub fn new(slug: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            url: url.into(),
            // DATETIME columns keep whole seconds
            created_at: Utc::now().trunc_subsecs(0),
            hits: 0,
        }
    }
}

/// Query string of `GET /s`
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenQuery {
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: Option<String>,
}

/// Result of a store insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The slug unique constraint rejected the row
    SlugTaken,
    /// A concurrent request stored the same URL first
    UrlTaken,
}

/// Whether shortening created a mapping or reused one
#[derive(Debug, Clone, PartialEq)]
pub enum ShortenOutcome {
    Created(Redirect),
    Existing(Redirect),
}

impl ShortenOutcome {
    pub fn redirect(&self) -> &Redirect {
        match self {
            ShortenOutcome::Created(r) | ShortenOutcome::Existing(r) => r,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, ShortenOutcome::Created(_))
    }
}

/// Totals across all mappings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_redirects: i64,
    pub total_hits: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_redirect_has_no_hits() {
        let redirect = Redirect::new("ab12cd", "https://example.com");

        assert_eq!(redirect.hits, 0);
        assert_eq!(redirect.slug, "ab12cd");
    }

    #[test]
    fn test_shorten_query_validation() {
        let empty = ShortenQuery { url: Some(String::new()) };
        assert!(empty.validate().is_err());

        let given = ShortenQuery { url: Some("https://example.com".to_string()) };
        assert!(given.validate().is_ok());
    }

    #[test]
    fn test_shorten_outcome_accessors() {
        let outcome = ShortenOutcome::Existing(Redirect::new("ab12cd", "https://example.com"));

        assert!(!outcome.is_created());
        assert_eq!(outcome.redirect().slug, "ab12cd");
    }
}
