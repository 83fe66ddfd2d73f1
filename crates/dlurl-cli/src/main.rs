//! influxdb-download-url CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dlurl_cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for the URL
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let resolved = dlurl_cli::run(&cli).await?;

    if cli.verbose {
        eprintln!(
            "{} {} ({})",
            resolved.filename, resolved.version, resolved.channel
        );
    }
    println!("{}", resolved.url);
    Ok(())
}
