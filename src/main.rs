use clap::Parser;

use minihttpd::cli::Cli;
use minihttpd::{logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Cli::parse().into_config()?;

    logging::init(&cfg.log_level);

    server::listener::run(&cfg).await
}
