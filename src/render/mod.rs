//! HTML rendering for feeds and the index page.
//!
//! - [`item`] - One `<item>` into one table row
//! - [`page`] - A validated feed into a complete page
//! - [`index`] - The index document into the index page, driving every feed
//!
//! Text is copied into the markup as-is; nothing is escaped.

mod index;
mod item;
mod page;

pub use index::{aggregate, process_feed, render_index_page, FeedEntry, FeedFailure, IndexPage};
pub use item::{render_item_row, NO_DATE, NO_SOURCE, NO_TITLE};
pub use page::{render_feed_page, RenderError, EMPTY_TITLE, NO_DESCRIPTION};
