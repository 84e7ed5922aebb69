use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spotify_playlist_proxy as lib;
use lib::api::spotify::SpotifyClient;
use lib::config::{Config, Credentials};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(name = "playlist-proxy", version)]
struct Cli {
    /// Path to config TOML (built-in defaults when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve GET /playlist/{id} (default)
    Serve {
        /// Address to bind, overrides `bind_addr` from the config
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Look up one playlist and print its summary as JSON
    Fetch {
        playlist_id: String,
    },
    /// Validate config file and exit
    ConfigValidate,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let mut cfg = match path {
        Some(p) => Config::from_path(p)
            .with_context(|| format!("loading config from {}", p.display()))?,
        None => Config::default(),
    };
    cfg.apply_env_overrides();
    cfg.validate().context("validating config after environment overrides")?;
    Ok(cfg)
}

/// An unconfigured process must not start.
fn credentials_or_exit() -> Credentials {
    match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Credentials check, config, logging and client, in that order.
fn startup(config: Option<&PathBuf>) -> Result<(Config, SpotifyClient, Option<WorkerGuard>)> {
    let credentials = credentials_or_exit();
    let cfg = load_config(config)?;
    let guard = lib::logging::init(cfg.log_dir.as_deref())?;
    let client = SpotifyClient::new(&cfg, credentials).context("building Spotify client")?;
    Ok((cfg, client, guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::ConfigValidate => match load_config(cli.config.as_ref()) {
            Ok(_) => println!("OK"),
            Err(e) => {
                eprintln!("Config validation failed: {:#}", e);
                std::process::exit(2);
            }
        },
        Commands::Fetch { playlist_id } => {
            let (_cfg, client, _guard) = startup(cli.config.as_ref())?;
            let summary = client.fetch_playlist(&playlist_id).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Serve { bind } => {
            let (cfg, client, _guard) = startup(cli.config.as_ref())?;
            run_server(&cfg, bind, client).await?;
        }
    }
    Ok(())
}

async fn run_server(cfg: &Config, bind: Option<String>, client: SpotifyClient) -> Result<()> {
    let addr = bind.unwrap_or_else(|| cfg.bind_addr.clone());
    info!("Spotify API base {}, auth base {}", cfg.api_base, cfg.auth_base);
    let app = lib::server::router(Arc::new(client));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    lib::server::serve(listener, app).await
}
