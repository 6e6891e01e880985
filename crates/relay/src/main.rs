//! Relay server
//!
//! Serves the room/relay HTTP API and sweeps idle rooms in the background.

use anyhow::{bail, Context, Result};
use relay::{router, sweeper, RelayConfig, RoomStore};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Board game relay");
    println!();
    println!("Usage:");
    println!("  relay [--config FILE] [--bind ADDR]");
    println!();
    println!("Options:");
    println!("  --config, -c   TOML config file (default: relay.toml, optional)");
    println!("  --bind, -b     Listen address, overrides the config file");
    println!();
    println!("Logging is controlled by RUST_LOG, e.g. RUST_LOG=relay=debug");
}

struct Args {
    config: PathBuf,
    bind: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let mut parsed = Args {
        config: PathBuf::from("relay.toml"),
        bind: None,
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("--config needs a file");
                };
                parsed.config = PathBuf::from(path);
                i += 1;
            }
            "--bind" | "-b" => {
                let Some(addr) = args.get(i + 1) else {
                    bail!("--bind needs an address");
                };
                parsed.bind = Some(addr.clone());
                i += 1;
            }
            "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }
    Ok(Some(parsed))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(args) = parse_args(&args)? else {
        print_usage();
        return Ok(());
    };

    let mut config = RelayConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let store = Arc::new(RoomStore::new());
    let housekeeping = sweeper::spawn(store.clone(), &config);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!(addr = %config.bind, "relay listening");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    housekeeping.abort();
    Ok(())
}
