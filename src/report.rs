//! Per-run summary of what happened to each feed.
use serde::Serialize;

/// What happened to one feed listed in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    Rendered,
    Invalid,
    LoadFailed,
    RenderFailed,
    WriteFailed,
    MissingAttribute,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedReport {
    pub name: String,
    pub url: Option<String>,
    pub file: Option<String>,
    pub status: FeedStatus,
    /// Failure message, absent for rendered feeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub index_title: String,
    pub index_destination: String,
    /// One entry per `<feed>`, in index order.
    pub feeds: Vec<FeedReport>,
}

impl RunReport {
    pub fn rendered(&self) -> usize {
        self.feeds
            .iter()
            .filter(|f| f.status == FeedStatus::Rendered)
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.feeds.len() - self.rendered()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
