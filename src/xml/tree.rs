use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use super::XmlNode;

/// Maximum element nesting depth accepted by [`parse_document`].
/// Guards against pathological documents blowing up memory.
pub const MAX_DEPTH: usize = 256;

/// Errors that can occur while building a tree from XML text.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The underlying reader rejected the input.
    #[error("XML parse error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    /// Element or attribute name is not valid UTF-8.
    #[error("Invalid UTF-8 in XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Closing tag does not match the open element.
    #[error("Mismatched closing tag </{found}> (expected </{expected}>)")]
    MismatchedTag { expected: String, found: String },

    /// Document ended with elements still open.
    #[error("Unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    /// No root element was found.
    #[error("Document has no root element")]
    NoRoot,

    /// Element nesting exceeds [`MAX_DEPTH`].
    #[error("XML nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
}

/// An owned element of an XML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// A node of an owned XML tree: an element or a text leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn element(
        name: impl Into<String>,
        attributes: Vec<(String, String)>,
        children: Vec<Node>,
    ) -> Self {
        Node::Element(Element {
            name: name.into(),
            attributes,
            children,
        })
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }
}

impl XmlNode for Node {
    fn label(&self) -> &str {
        match self {
            Node::Element(e) => &e.name,
            Node::Text(t) => t,
        }
    }

    fn is_tag(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Text(_) => &[],
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element(e) => e
                .attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            Node::Text(_) => None,
        }
    }
}

/// Builds an owned tree from XML text and returns its root element.
///
/// Adjacent text and CDATA runs inside one element are merged into a single
/// leaf, so an element with simple content always has exactly one leaf as its
/// first child. Runs are merged as read; once the leaf is complete its edges
/// are trimmed, and leaves that are only whitespace are dropped. Comments,
/// processing instructions and the doctype are skipped.
///
/// Entity references are limited to the five XML builtins and numeric
/// character references; quick-xml never expands `<!ENTITY>` declarations.
pub fn parse_document(content: &str) -> Result<Node, XmlError> {
    let mut reader = Reader::from_str(content);

    // Open elements, innermost last
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Syntax {
            position: reader.error_position(),
            message: e.to_string(),
        })?;

        match event {
            Event::Start(e) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(XmlError::MaxDepthExceeded(MAX_DEPTH));
                }
                if let Some(parent) = stack.last_mut() {
                    settle_text(parent);
                }
                stack.push(start_element(&e, &reader)?);
            }
            Event::Empty(e) => {
                let element = start_element(&e, &reader)?;
                if let Some(parent) = stack.last_mut() {
                    settle_text(parent);
                }
                attach(&mut stack, &mut root, Node::Element(element));
            }
            Event::End(e) => {
                let found = std::str::from_utf8(e.name().as_ref())?.to_string();
                let mut element = match stack.pop() {
                    Some(element) => element,
                    None => {
                        return Err(XmlError::MismatchedTag {
                            expected: String::new(),
                            found,
                        })
                    }
                };
                if element.name != found {
                    return Err(XmlError::MismatchedTag {
                        expected: element.name,
                        found,
                    });
                }
                settle_text(&mut element);
                attach(&mut stack, &mut root, Node::Element(element));
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| XmlError::Syntax {
                    position: reader.buffer_position(),
                    message: err.to_string(),
                })?;
                push_text(&mut stack, &text);
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                push_text(&mut stack, std::str::from_utf8(&bytes)?);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnexpectedEof(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}

fn start_element(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, XmlError> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();

    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(err) => {
                tracing::warn!(element = %name, error = %err, "Skipping malformed XML attribute");
                continue;
            }
        };
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| XmlError::Syntax {
                position: reader.buffer_position(),
                message: err.to_string(),
            })?;
        attributes.push((key, value.into_owned()));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Appends a finished node to the innermost open element, or makes it the root.
/// Anything after the first root element is ignored.
fn attach(stack: &mut [Element], root: &mut Option<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

/// Appends a raw text or CDATA run to the innermost open element, extending
/// its trailing leaf when there is one.
fn push_text(stack: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    // Text outside the root element is not part of the tree
    let Some(parent) = stack.last_mut() else {
        return;
    };
    match parent.children.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => parent.children.push(Node::Text(text.to_string())),
    }
}

/// Finishes the trailing leaf of `element`: trims its edges, or removes it
/// when nothing but whitespace is left.
fn settle_text(element: &mut Element) {
    let Some(Node::Text(text)) = element.children.last_mut() else {
        return;
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        element.children.pop();
    } else if trimmed.len() != text.len() {
        *text = trimmed.to_string();
    }
}
