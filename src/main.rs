use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atp_proxy::api::state::AppState;
use atp_proxy::api::{build_router, cors_layer};
use atp_proxy::config::AppConfig;
use atp_proxy::fetch::AtpClient;
use atp_proxy::registry::build::{build_registry, save_calendar};

#[derive(Parser)]
#[command(name = "atp-proxy")]
#[command(about = "Proxy and reshaper for unofficial ATP Tour match data")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error), overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Download the tour calendar into the data directory
    FetchCalendar,

    /// Merge the latest downloaded calendar into the tournament registry
    BuildRegistry,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting atp-proxy v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let client = AtpClient::new(config.upstream.clone())?;
            let state = AppState::new(&config, Arc::new(client));

            let mut app = build_router(state).layer(cors_layer(&config.server.cors_origin));
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(
                "Serving on http://{} (registry: {})",
                addr,
                config.registry_path().display()
            );
            axum::serve(listener, app).await?;
        }
        Commands::FetchCalendar => {
            let client = AtpClient::new(config.upstream.clone())?;
            let calendar = client
                .fetch_calendar()
                .await
                .context("Failed to download tour calendar")?;

            let today = chrono::Utc::now().date_naive();
            let path = save_calendar(&config.data_dir, &calendar, today)?;
            tracing::info!("Saved raw calendar to {}", path.display());
        }
        Commands::BuildRegistry => match build_registry(&config.data_dir)? {
            Some(summary) => {
                tracing::info!(
                    "Merged {} into registry: {} new tournaments, {} total",
                    summary.source.display(),
                    summary.added,
                    summary.total
                );
            }
            None => {
                tracing::info!(
                    "No raw calendar found in {}, run fetch-calendar first",
                    config.data_dir.display()
                );
            }
        },
    }

    Ok(())
}
