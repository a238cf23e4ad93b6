use thiserror::Error;

use crate::xml::{child_by_tag, children_by_tag, XmlNode};

/// Reasons a document is not a renderable RSS 2.0 feed.
///
/// Variants are listed in the order the checks run; the first failing
/// check is the one reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidFeed {
    #[error("no <channel> element under the document root")]
    MissingChannel,

    #[error("channel has no <title>")]
    MissingChannelTitle,

    #[error("channel has no <description>")]
    MissingChannelDescription,

    #[error("channel has no <link>")]
    MissingChannelLink,

    #[error("channel <link> is empty")]
    EmptyChannelLink,

    #[error("channel has no <item> elements")]
    NoItems,

    /// `position` is the 0-based index of the item among the channel's items.
    #[error("item {position} has neither <title> nor <description>")]
    ItemWithoutTitleOrDescription { position: usize },

    #[error("item {position} has a <source> without a url attribute")]
    SourceWithoutUrl { position: usize },
}

/// How many items the item-level checks look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Only the first item is checked, as a representative sample.
    #[default]
    FirstItem,
    /// Every item must pass the item-level checks.
    AllItems,
}

/// A document that passed validation, with its channel already located.
///
/// Rendering only accepts this type, so a page can never be produced from
/// a document that was not validated first.
#[derive(Debug)]
pub struct ValidFeed<'a, N> {
    root: &'a N,
    channel: &'a N,
}

impl<N> Clone for ValidFeed<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for ValidFeed<'_, N> {}

impl<'a, N: XmlNode> ValidFeed<'a, N> {
    pub fn root(&self) -> &'a N {
        self.root
    }

    pub fn channel(&self) -> &'a N {
        self.channel
    }

    /// Channel `<item>` elements in document order.
    pub fn items(&self) -> impl Iterator<Item = &'a N> + 'a {
        children_by_tag(self.channel, "item")
    }
}

/// Outcome of validating a document.
#[derive(Debug)]
pub enum Validation<'a, N> {
    Valid(ValidFeed<'a, N>),
    Invalid(InvalidFeed),
}

impl<'a, N> Validation<'a, N> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn into_result(self) -> Result<ValidFeed<'a, N>, InvalidFeed> {
        match self {
            Validation::Valid(feed) => Ok(feed),
            Validation::Invalid(reason) => Err(reason),
        }
    }
}

/// Validates `document` against the minimal RSS 2.0 shape, checking only
/// the first item.
pub fn validate<N: XmlNode>(document: &N) -> Validation<'_, N> {
    validate_with(document, ValidationMode::FirstItem)
}

/// Boolean view of [`validate`].
pub fn is_valid_feed<N: XmlNode>(document: &N) -> bool {
    validate(document).is_valid()
}

/// Validates `document`, applying the item-level checks per `mode`.
///
/// A document is a feed when:
/// 1. the root has a `<channel>` child;
/// 2. the channel has `<title>`, `<description>`, and a `<link>` with content;
/// 3. the channel has at least one `<item>`;
/// 4. the checked item(s) have a `<title>` or a `<description>`;
/// 5. a `<source>` on a checked item carries a `url` attribute.
pub fn validate_with<N: XmlNode>(document: &N, mode: ValidationMode) -> Validation<'_, N> {
    match check(document, mode) {
        Ok(channel) => Validation::Valid(ValidFeed {
            root: document,
            channel,
        }),
        Err(reason) => Validation::Invalid(reason),
    }
}

fn check<N: XmlNode>(document: &N, mode: ValidationMode) -> Result<&N, InvalidFeed> {
    let channel = child_by_tag(document, "channel").ok_or(InvalidFeed::MissingChannel)?;

    if child_by_tag(channel, "title").is_none() {
        return Err(InvalidFeed::MissingChannelTitle);
    }
    if child_by_tag(channel, "description").is_none() {
        return Err(InvalidFeed::MissingChannelDescription);
    }
    let link = child_by_tag(channel, "link").ok_or(InvalidFeed::MissingChannelLink)?;
    if link.children().is_empty() {
        return Err(InvalidFeed::EmptyChannelLink);
    }

    let mut items = children_by_tag(channel, "item").enumerate().peekable();
    if items.peek().is_none() {
        return Err(InvalidFeed::NoItems);
    }

    let limit = match mode {
        ValidationMode::FirstItem => 1,
        ValidationMode::AllItems => usize::MAX,
    };
    for (position, item) in items.take(limit) {
        check_item(item, position)?;
    }

    Ok(channel)
}

fn check_item<N: XmlNode>(item: &N, position: usize) -> Result<(), InvalidFeed> {
    if child_by_tag(item, "title").is_none() && child_by_tag(item, "description").is_none() {
        return Err(InvalidFeed::ItemWithoutTitleOrDescription { position });
    }
    if let Some(source) = child_by_tag(item, "source") {
        if !source.has_attribute("url") {
            return Err(InvalidFeed::SourceWithoutUrl { position });
        }
    }
    Ok(())
}
