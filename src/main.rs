use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use rss_aggregator::{aggregate, Config, Fetcher, FileSink, ValidationMode};

/// Get the default config file path (~/.config/rss-aggregator/config.toml)
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("rss-aggregator")
            .join("config.toml"),
    )
}

/// Ask the operator for a value on stdin.
fn prompt(question: &str) -> Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", question)?;
    stdout.flush()?;

    let mut answer = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read from stdin")?;
    if read == 0 {
        anyhow::bail!("No input provided");
    }

    let answer = answer.trim();
    if answer.is_empty() {
        anyhow::bail!("Empty input");
    }
    Ok(answer.to_string())
}

#[derive(Parser, Debug)]
#[command(
    name = "rss-aggregator",
    version,
    about = "Render RSS 2.0 feeds listed in an XML index into static HTML"
)]
struct Args {
    /// XML file or URL listing the feeds (prompted for when omitted)
    index: Option<String>,

    /// HTML file to write the index page to (prompted for when omitted)
    output: Option<String>,

    /// Config file (defaults to ~/.config/rss-aggregator/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to write pages under (overrides config)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Validate every item of each feed, not only the first
    #[arg(long)]
    strict_items: bool,

    /// Write a JSON report of per-feed outcomes
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match args.config.as_deref() {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => match default_config_path() {
            Some(path) => Config::load(&path).context("Failed to load config")?,
            None => Config::default(),
        },
    };
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if args.strict_items {
        config.strict_items = true;
    }

    let index = match args.index {
        Some(index) => index,
        None => prompt("Name of the XML file containing RSS 2.0 feed(s): ")?,
    };
    let output = match args.output {
        Some(output) => output,
        None => prompt("Name of the HTML file for the home page: ")?,
    };

    let mode = if config.strict_items {
        ValidationMode::AllItems
    } else {
        ValidationMode::FirstItem
    };

    let fetcher = Fetcher::new(&config).context("Failed to create HTTP client")?;
    let sink = FileSink::new(&config.output_dir);

    tracing::debug!(index = %index, output = %output, ?mode, "Starting run");
    let report = aggregate(&index, &output, &fetcher, &sink, mode).await?;

    for feed in report.feeds.iter().filter(|f| f.detail.is_some()) {
        eprintln!(
            "Skipped {}: {}",
            feed.name,
            feed.detail.as_deref().unwrap_or_default()
        );
    }
    println!(
        "Wrote {}: {} rendered, {} skipped",
        sink.resolve(&output).display(),
        report.rendered(),
        report.skipped()
    );

    if let Some(path) = args.report {
        let json = report.to_json().context("Failed to serialize run report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }

    Ok(())
}
