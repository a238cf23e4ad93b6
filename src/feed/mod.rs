//! Feed documents: where they come from and whether they can be rendered.
//!
//! - [`loader`] - Load a document from a local path or an HTTP(S) URL
//! - [`validator`] - Decide whether a document has the minimal RSS 2.0 shape
//!
//! # Example
//!
//! ```ignore
//! use rss_aggregator::feed::{validate, DocumentLoader, Fetcher, Validation};
//!
//! let fetcher = Fetcher::new(&config)?;
//! let doc = fetcher.load("https://example.com/rss.xml").await?;
//! if let Validation::Valid(feed) = validate(&doc) {
//!     // render it
//! }
//! ```

mod loader;
mod validator;

pub use loader::{DocumentLoader, Fetcher, LoadError, Location};
pub use validator::{
    is_valid_feed, validate, validate_with, InvalidFeed, ValidFeed, Validation, ValidationMode,
};
