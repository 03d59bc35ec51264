use clap::{Parser, Subcommand};
use slugly::admin::{self, AdminCommands};
use slugly::config::{Config, LogFormat};
use slugly::error::AppResult;
use slugly::server;
use std::path::{Path, PathBuf};
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

/// slugly - a small URL shortener
#[derive(Parser, Debug)]
#[command(name = "slugly")]
#[command(version)]
#[command(about = "A small URL shortener", long_about = None)]
struct Cli {
    /// Directory holding the slugly config file (highest precedence)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Server {
        /// Host to bind to (overrides listen_host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides listen_port)
        #[arg(long)]
        port: Option<u16>,

        /// Run migrations on startup (default)
        #[arg(long, overrides_with = "no_migrate")]
        migrate: bool,

        /// Skip running migrations on startup
        #[arg(long, overrides_with = "migrate")]
        no_migrate: bool,
    },

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        admin_command: AdminCommands,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Server {
            host,
            port,
            no_migrate,
            ..
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate().inspect_err(|e| error!("Invalid configuration: {}", e))?;

            server::run_server(config, !no_migrate).await
        }
        Commands::Admin { admin_command } => admin::run(config, admin_command).await,
    }
}

/// Load the configuration and install the subscriber it asks for.
///
/// A configuration that fails to load is logged through a text subscriber
/// before the error is returned.
fn load_config(dir: Option<&Path>) -> AppResult<Config> {
    match Config::load(dir) {
        Ok(config) => {
            init_tracing(config.server.log_format);
            Ok(config)
        }
        Err(e) => {
            init_tracing(LogFormat::Text);
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    // A subscriber may already be installed (tests)
    let _ = match format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).try_init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };
}
