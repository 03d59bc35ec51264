//! Administrative command handlers.
//!
//! CLI commands for running migrations, printing totals and inspecting a
//! single mapping. None of them change hit counters.

use crate::config::Config;
use crate::db::{Repository, Store};
use crate::error::{AppError, AppResult};
use crate::models::Redirect;
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Run database migrations
    Migrate,

    /// Show mapping and hit totals
    Stats,

    /// Show one mapping without counting a hit
    Lookup {
        /// Slug to inspect
        slug: String,
    },
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    let repository = Repository::new(&config.database).await?;

    match admin_command {
        AdminCommands::Migrate => migrate(&repository).await,
        AdminCommands::Stats => stats(&repository).await,
        AdminCommands::Lookup { slug } => lookup(&repository, &config, &slug).await,
    }
}

async fn migrate(repository: &Repository) -> AppResult<()> {
    info!("Running database migrations...");
    repository.run_migrations().await?;
    info!("Migrations completed successfully");
    Ok(())
}

async fn stats(store: &dyn Store) -> AppResult<()> {
    let stats = store.stats().await?;

    println!("Redirects: {}", stats.total_redirects);
    println!("Hits:      {}", stats.total_hits);
    Ok(())
}

async fn lookup(store: &dyn Store, config: &Config, slug: &str) -> AppResult<()> {
    let redirect = store
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::SlugNotFound(slug.to_string()))?;

    print!("{}", describe(&redirect, config.links.short_url.as_deref()));
    Ok(())
}

fn describe(redirect: &Redirect, short_url: Option<&str>) -> String {
    let mut out = format!("Slug:    {}\n", redirect.slug);
    if let Some(base) = short_url {
        out.push_str(&format!("Short:   {}/{}\n", base, redirect.slug));
    }
    out.push_str(&format!("URL:     {}\n", redirect.url));
    out.push_str(&format!("Created: {}\n", redirect.created_at.to_rfc3339()));
    out.push_str(&format!("Hits:    {}\n", redirect.hits));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_with_short_url() {
        let redirect = Redirect::new("ab12cd", "https://example.com");

        let text = describe(&redirect, Some("http://short.ly"));

        assert!(text.contains("Short:   http://short.ly/ab12cd"));
        assert!(text.contains("URL:     https://example.com"));
        assert!(text.contains("Hits:    0"));
    }

    #[test]
    fn test_describe_without_short_url() {
        let redirect = Redirect::new("ab12cd", "https://example.com");

        assert!(!describe(&redirect, None).contains("Short:"));
    }
}
