use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sanjaya_cli::logging::init_logging;
use sanjaya_cli::server::{router, AppState};
use sanjaya_core::config::{expand_path, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "sanjaya-server",
    about = "HTTP front end that answers POST /api/query by running the sanjaya query tool"
)]
struct ServerCli {
    /// Address to bind (host:port); overrides server.bind
    #[arg(long)]
    bind: Option<String>,

    /// Query executable; overrides server.query_bin
    #[arg(long)]
    query_bin: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ServerCli::parse();
    let settings = Settings::load().context("failed to load configuration")?;
    init_logging(&settings.logging);

    let bind = cli.bind.unwrap_or_else(|| settings.server.bind.clone());
    let addr: SocketAddr = bind.parse().with_context(|| format!("invalid bind address {bind}"))?;
    let query_bin = match cli.query_bin.or_else(|| settings.server.query_bin.as_deref().map(expand_path)) {
        Some(path) => path,
        None => sibling_query_bin()?,
    };
    let workdir = std::env::current_dir().context("failed to resolve working directory")?;
    let app = router(AppState::new(query_bin.clone(), workdir), settings.server.cors);

    println!("🕉️  sanjaya-server listening on http://{addr}");
    println!("💡 Queries run {}", query_bin.display());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server shutdown")?;
    Ok(())
}

fn sibling_query_bin() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate server executable")?;
    Ok(exe.with_file_name(format!("sanjaya{}", std::env::consts::EXE_SUFFIX)))
}
