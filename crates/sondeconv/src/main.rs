use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sondeconv_core::convert::convert_file;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert a sonde flight log into GeoJSON and a windsond profile",
    long_about = None
)]
struct Cli {
    /// Flight log to convert (comma or asterisk separated)
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let summary = convert_file(&cli.input)
        .with_context(|| format!("failed to convert {}", cli.input.display()))?;

    let summary_json =
        serde_json::to_string(&summary).context("failed to serialize conversion summary")?;
    info!(
        parser = summary.parser,
        samples_emitted = summary.samples_emitted,
        summary = %summary_json,
        "Conversion complete"
    );

    Ok(())
}
