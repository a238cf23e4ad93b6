use thiserror::Error;

use super::item::render_item_row;
use crate::feed::ValidFeed;
use crate::xml::{child_by_tag, child_text, leaf_text, XmlNode};

/// Page title when the channel has no `<title>` text.
pub const EMPTY_TITLE: &str = "Empty Title";
/// Paragraph text when the channel `<description>` has no content.
pub const NO_DESCRIPTION: &str = "No description";

/// Content that validation let through but rendering cannot do without.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("<{element}> has no text content")]
    MissingContent { element: &'static str },
}

/// Renders a validated feed as a complete HTML page.
///
/// The page holds the channel title in `<head>`, an `<h1>` linking the
/// title to the channel link (left out when there is no `<link>`), the
/// description paragraph, and a table with one row per item in document
/// order.
///
/// # Errors
///
/// [`RenderError::MissingContent`] when the channel `<link>` has children
/// but its first child is not text.
pub fn render_feed_page<N: XmlNode>(feed: &ValidFeed<'_, N>) -> Result<String, RenderError> {
    let channel = feed.channel();
    let title = child_text(channel, "title");

    let head = format!(
        "<head>\n\t<title>\n\t\t{}\n\t</title>\n</head>",
        title.unwrap_or(EMPTY_TITLE)
    );

    let heading = match child_by_tag(channel, "link") {
        Some(link) => {
            let href = leaf_text(link).ok_or(RenderError::MissingContent { element: "link" })?;
            format!(
                "<h1>\n\t<a href=\"{href}\">{}</a>\n</h1>",
                title.unwrap_or(href)
            )
        }
        None => String::new(),
    };

    let description = child_text(channel, "description").unwrap_or(NO_DESCRIPTION);
    let paragraph = format!("<p>\n\t{description}\n</p>");

    let mut html = format!(
        "<html>\n{head}\n<body>\n{heading}\n{paragraph}\n\
         <table border=\"1\">\n\t<tbody>\n\
         \t<tr>\n\t<th>Date</th>\n\t<th>Source</th>\n\t<th>News</th>\n\t</tr>\n"
    );
    for item in feed.items() {
        html.push_str(&render_item_row(item));
        html.push('\n');
    }
    html.push_str("\t</tbody>\n</table>\n</body>\n</html>");

    Ok(html)
}
