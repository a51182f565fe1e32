use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use score_state::Piece;

/// The shindig composition server: JSON-RPC tools over stdio.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Tracing filter, e.g. "info" or "shindig=debug,score_state=debug"
    #[arg(long, default_value = "info")]
    log_filter: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "shindig starting");

    let mut piece = Piece::new();
    shindig::server::serve_stdio(&mut piece)?;
    Ok(())
}
