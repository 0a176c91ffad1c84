use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::node::{Attributes, LeafNode};

/// Inline text spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSpan {
    Plain(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { text: String, url: String },
    Image { text: String, url: String },
}

/// The kind of a [`TextSpan`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

impl SpanKind {
    pub const ALL: [SpanKind; 6] = [
        SpanKind::Plain,
        SpanKind::Bold,
        SpanKind::Italic,
        SpanKind::Code,
        SpanKind::Link,
        SpanKind::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpanKind::Plain => "text",
            SpanKind::Bold => "bold",
            SpanKind::Italic => "italic",
            SpanKind::Code => "code",
            SpanKind::Link => "link",
            SpanKind::Image => "image",
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpanKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpanKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownSpanKind(s.to_string()))
    }
}

impl TextSpan {
    /// Build a span from a kind name, its text and an optional URL.
    ///
    /// A missing URL for a link or image becomes an empty string.
    pub fn from_kind(
        kind: &str,
        text: impl Into<String>,
        url: Option<String>,
    ) -> Result<Self, Error> {
        let text = text.into();
        let span = match kind.parse::<SpanKind>()? {
            SpanKind::Plain => TextSpan::Plain(text),
            SpanKind::Bold => TextSpan::Bold(text),
            SpanKind::Italic => TextSpan::Italic(text),
            SpanKind::Code => TextSpan::Code(text),
            SpanKind::Link => TextSpan::Link {
                text,
                url: url.unwrap_or_default(),
            },
            SpanKind::Image => TextSpan::Image {
                text,
                url: url.unwrap_or_default(),
            },
        };
        Ok(span)
    }

    pub fn kind(&self) -> SpanKind {
        match self {
            TextSpan::Plain(_) => SpanKind::Plain,
            TextSpan::Bold(_) => SpanKind::Bold,
            TextSpan::Italic(_) => SpanKind::Italic,
            TextSpan::Code(_) => SpanKind::Code,
            TextSpan::Link { .. } => SpanKind::Link,
            TextSpan::Image { .. } => SpanKind::Image,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            TextSpan::Plain(text)
            | TextSpan::Bold(text)
            | TextSpan::Italic(text)
            | TextSpan::Code(text)
            | TextSpan::Link { text, .. }
            | TextSpan::Image { text, .. } => text,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            TextSpan::Link { url, .. } | TextSpan::Image { url, .. } => Some(url.as_str()),
            _ => None,
        }
    }
}

/// Map a text span onto the leaf node that renders it.
///
/// Images carry their text as `alt` and render with an empty body.
pub fn text_span_to_leaf(span: &TextSpan) -> LeafNode {
    match span {
        TextSpan::Plain(text) => LeafNode::text(text.as_str()),
        TextSpan::Bold(text) => LeafNode::new("b", text.as_str()),
        TextSpan::Italic(text) => LeafNode::new("i", text.as_str()),
        TextSpan::Code(text) => LeafNode::new("code", text.as_str()),
        TextSpan::Link { text, url } => LeafNode::new("a", text.as_str())
            .with_attributes(Attributes::from([("href", url.as_str())])),
        TextSpan::Image { text, url } => LeafNode::new("img", "").with_attributes(
            Attributes::from([("src", url.as_str()), ("alt", text.as_str())]),
        ),
    }
}

impl From<&TextSpan> for LeafNode {
    fn from(span: &TextSpan) -> Self {
        text_span_to_leaf(span)
    }
}
