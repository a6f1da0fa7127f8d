use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use rssforge::config::{self, Config};
use rssforge::manifest::FeedManifest;
use rssforge::util::write_atomic;

#[derive(Parser, Debug)]
#[command(name = "rssforge", about = "Render an RSS 2.0 feed from a TOML manifest")]
struct Args {
    /// Feed manifest (TOML)
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Config file with default generator/docs values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the feed to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Defaults must be installed before the first feed is built
    if let Some(config_path) = &args.config {
        let config = Config::load(config_path)
            .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
        config::install(config).context("Failed to install feed defaults")?;
    }

    let manifest = FeedManifest::load(&args.manifest)
        .with_context(|| format!("Failed to load manifest: {}", args.manifest.display()))?;
    let feed = manifest
        .into_feed()
        .context("Manifest does not describe a valid feed")?;
    let xml = feed.to_xml().context("Failed to serialize feed")?;

    match &args.output {
        Some(path) => {
            write_atomic(path, xml.as_bytes())?;
            tracing::info!(
                path = %path.display(),
                items = feed.items().len(),
                "Wrote feed"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(xml.as_bytes())
                .context("Failed to write feed to stdout")?;
            writeln!(stdout).context("Failed to write feed to stdout")?;
        }
    }

    Ok(())
}
