use crate::xml::{child_by_tag, child_text, leaf_text, XmlNode};

/// Date cell text when an item has no `<pubDate>` content.
pub const NO_DATE: &str = "No date";
/// Source cell text when an item has no `<source>`.
pub const NO_SOURCE: &str = "No source available";
/// Anchor text for a `<title>` element with no content.
pub const NO_TITLE: &str = "No title";

/// Renders one `<item>` as a table row of date, source and title/link cells.
///
/// - Date: the `<pubDate>` text, or [`NO_DATE`].
/// - Source: an anchor to the source's `url` attribute labelled with its
///   text (the URL itself when the element is empty), or [`NO_SOURCE`].
/// - Title/link: when `<link>` has text, an anchor to it labelled with the
///   title text, falling back to the link text. Without a usable link, a
///   bare anchor with the title text or [`NO_TITLE`]. With neither element
///   the cell is left out.
pub fn render_item_row<N: XmlNode>(item: &N) -> String {
    let date = child_text(item, "pubDate").unwrap_or(NO_DATE);

    let mut row = String::from("<tr>\n");
    row.push_str(&format!("\t<td>{date}</td>"));

    match child_by_tag(item, "source") {
        Some(source) => {
            let url = source.attribute("url").unwrap_or_default();
            let label = leaf_text(source).unwrap_or(url);
            row.push_str(&format!(
                "\n\t<td>\n\t\t<a href=\"{url}\">{label}</a>\n\t</td>"
            ));
        }
        None => {
            row.push_str(&format!("\n\t<td>{NO_SOURCE}</td>"));
        }
    }

    if let Some(anchor) = title_anchor(item) {
        row.push_str(&format!("\n\t<td>\n\t\t{anchor}\n\t</td>"));
    }

    row.push_str("\n</tr>");
    row
}

fn title_anchor<N: XmlNode>(item: &N) -> Option<String> {
    let title = child_by_tag(item, "title");
    let title_text = title.and_then(leaf_text);

    if let Some(href) = child_text(item, "link") {
        let label = title_text.unwrap_or(href);
        return Some(format!("<a href=\"{href}\">{label}</a>"));
    }

    title.map(|_| format!("<a>{}</a>", title_text.unwrap_or(NO_TITLE)))
}
