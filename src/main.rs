use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod build;
mod bundler;
mod cli;
mod error;
mod model;
mod server;
mod store;
mod tagger;
mod watch;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.verbose {
                "ms2dev=debug"
            } else {
                "ms2dev=info"
            })
        }))
        .init();

    cli::dev::run(cli).await
}
