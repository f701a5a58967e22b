// src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{fs::File, net::SocketAddr, path::PathBuf};
use tracing::info;

use boxoffice::{
    api::{build_api, AppState},
    store,
};

#[derive(Parser, Debug)]
#[command(name = "boxoffice", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the HTTP server.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
        /// SQLite URL, created on first use.
        #[arg(long, default_value = "sqlite:boxoffice.sqlite")]
        db: String,
    },
    /// Bulk-load events from an NDJSON file (one event per line).
    Seed {
        #[arg(long, default_value = "sqlite:boxoffice.sqlite")]
        db: String,
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Serve { bind, db } => serve(bind, db).await,
        Cmd::Seed { db, file } => seed(db, file).await,
    }
}

async fn serve(bind: SocketAddr, db: String) -> Result<()> {
    let pool = store::connect(&db).await?;
    let state = AppState::new(pool);

    info!("http: listening on {bind} db={db}");
    let app = build_api(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn seed(db: String, file: PathBuf) -> Result<()> {
    let pool = store::connect(&db).await?;
    let f = File::open(&file).with_context(|| format!("open seed file {:?}", file))?;

    let n = store::seed_ndjson(&pool, f).await?;
    info!("seeded {n} events into {db}");
    Ok(())
}
