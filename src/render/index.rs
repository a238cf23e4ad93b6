use anyhow::{Context, Result};
use thiserror::Error;

use super::page::{render_feed_page, RenderError, EMPTY_TITLE};
use crate::feed::{validate_with, DocumentLoader, InvalidFeed, LoadError, ValidationMode};
use crate::output::{OutputError, OutputSink};
use crate::report::{FeedReport, FeedStatus, RunReport};
use crate::xml::{children_by_tag, XmlNode};

/// Why a feed listed in the index produced no page.
#[derive(Debug, Error)]
pub enum FeedFailure {
    #[error("feed entry has no {0} attribute")]
    MissingAttribute(&'static str),
    #[error("failed to load feed: {0}")]
    Load(#[from] LoadError),
    #[error("not an RSS 2.0 feed: {0}")]
    Invalid(#[from] InvalidFeed),
    #[error("failed to render feed: {0}")]
    Render(#[from] RenderError),
    #[error("failed to write feed page: {0}")]
    Write(#[from] OutputError),
}

impl FeedFailure {
    pub fn status(&self) -> FeedStatus {
        match self {
            FeedFailure::MissingAttribute(_) => FeedStatus::MissingAttribute,
            FeedFailure::Load(_) => FeedStatus::LoadFailed,
            FeedFailure::Invalid(_) => FeedStatus::Invalid,
            FeedFailure::Render(_) => FeedStatus::RenderFailed,
            FeedFailure::Write(_) => FeedStatus::WriteFailed,
        }
    }
}

/// One `<feed>` entry of an index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub url: Option<String>,
    pub name: Option<String>,
    pub file: Option<String>,
}

impl FeedEntry {
    pub fn from_node<N: XmlNode>(node: &N) -> Self {
        let attr = |name: &str| node.attribute(name).map(str::to_string);
        Self {
            url: attr("url"),
            name: attr("name"),
            file: attr("file"),
        }
    }

    /// Link text: the `name`, else the `url`, else the `file`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.url.as_deref())
            .or(self.file.as_deref())
            .unwrap_or_default()
    }
}

/// A rendered index page and what happened to each listed feed.
#[derive(Debug, Clone)]
pub struct IndexPage {
    pub title: String,
    pub html: String,
    pub feeds: Vec<FeedReport>,
}

/// Renders the index page for `index`, rendering every listed feed on the way.
///
/// Each `<feed>` child of the root is loaded from its `url`, validated,
/// rendered and written to its `file` through `sink`, one after another.
/// Every entry gets a link in the index whether or not its page was
/// produced, so broken feeds show up as dead links. A failing feed never
/// stops the others.
pub async fn render_index_page<N, L, S>(
    index: &N,
    loader: &L,
    sink: &S,
    mode: ValidationMode,
) -> IndexPage
where
    N: XmlNode,
    L: DocumentLoader,
    S: OutputSink,
{
    let title = index.attribute("title").unwrap_or(EMPTY_TITLE).to_string();

    let mut html = format!(
        "<html>\n<head>\n<title>{title}</title>\n</head>\n<body>\n<h2>{title}</h2>\n<ul>\n"
    );
    let mut feeds = Vec::new();

    for node in children_by_tag(index, "feed") {
        let entry = FeedEntry::from_node(node);
        let result = process_feed(&entry, loader, sink, mode).await;

        let (status, detail) = match &result {
            Ok(()) => {
                tracing::info!(feed = %entry.display_name(), file = ?entry.file, "Rendered feed page");
                (FeedStatus::Rendered, None)
            }
            Err(e) => {
                tracing::warn!(
                    feed = %entry.display_name(),
                    url = ?entry.url,
                    error = %e,
                    "Skipping feed"
                );
                (e.status(), Some(e.to_string()))
            }
        };

        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            entry.file.as_deref().unwrap_or_default(),
            entry.display_name()
        ));
        feeds.push(FeedReport {
            name: entry.display_name().to_string(),
            url: entry.url,
            file: entry.file,
            status,
            detail,
        });
    }

    html.push_str("</ul>\n</body>\n</html>");

    IndexPage { title, html, feeds }
}

/// Load, validate, render and persist a single feed.
pub async fn process_feed<L, S>(
    entry: &FeedEntry,
    loader: &L,
    sink: &S,
    mode: ValidationMode,
) -> Result<(), FeedFailure>
where
    L: DocumentLoader,
    S: OutputSink,
{
    let url = entry
        .url
        .as_deref()
        .ok_or(FeedFailure::MissingAttribute("url"))?;
    let file = entry
        .file
        .as_deref()
        .ok_or(FeedFailure::MissingAttribute("file"))?;

    let document = loader.load(url).await?;
    let feed = validate_with(&document, mode).into_result()?;
    let html = render_feed_page(&feed)?;
    sink.persist(file, &html)?;
    Ok(())
}

/// Loads the index at `index_location`, renders every listed feed and
/// writes the index page to `index_destination`.
///
/// Per-feed failures end up in the returned report; only failing to load
/// the index itself or to write the index page is an error.
pub async fn aggregate<L, S>(
    index_location: &str,
    index_destination: &str,
    loader: &L,
    sink: &S,
    mode: ValidationMode,
) -> Result<RunReport>
where
    L: DocumentLoader,
    S: OutputSink,
{
    let index = loader
        .load(index_location)
        .await
        .with_context(|| format!("Failed to load index document: {}", index_location))?;

    let page = render_index_page(&index, loader, sink, mode).await;

    sink.persist(index_destination, &page.html)
        .with_context(|| format!("Failed to write index page: {}", index_destination))?;
    tracing::info!(
        destination = %index_destination,
        feeds = page.feeds.len(),
        "Wrote index page"
    );

    Ok(RunReport {
        index_title: page.title,
        index_destination: index_destination.to_string(),
        feeds: page.feeds,
    })
}
