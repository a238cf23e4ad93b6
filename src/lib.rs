//! Renders RSS 2.0 feeds into static HTML.
//!
//! An index document lists feeds by URL, display name and output file.
//! Each feed is loaded, checked against a minimal RSS 2.0 shape, rendered
//! as a table of its items and written to its file; the index page then
//! links to every listed feed.
//!
//! ```ignore
//! use rss_aggregator::{aggregate, Config, FileSink, Fetcher, ValidationMode};
//!
//! let config = Config::default();
//! let fetcher = Fetcher::new(&config)?;
//! let sink = FileSink::new(&config.output_dir);
//! let report = aggregate("feeds.xml", "index.html", &fetcher, &sink, ValidationMode::FirstItem).await?;
//! println!("{} rendered, {} skipped", report.rendered(), report.skipped());
//! ```

pub mod config;
pub mod feed;
pub mod output;
pub mod render;
pub mod report;
pub mod xml;

pub use config::{Config, ConfigError};
pub use feed::{DocumentLoader, Fetcher, LoadError, ValidationMode};
pub use output::{FileSink, OutputError, OutputSink};
pub use render::aggregate;
pub use report::{FeedReport, FeedStatus, RunReport};
