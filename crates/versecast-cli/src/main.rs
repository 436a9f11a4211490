//! VerseCast command-line theme editor

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use versecast_cli::{commands, AppState, CliArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout carries command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    info!("VerseCast v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::open(&args.data_dir())?;
    let output = commands::run(&state, args.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
