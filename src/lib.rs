//! Render markdown and inline text spans to HTML through a small tree of
//! markup nodes.
//!
//! Output is not escaped: text is written exactly as given.

mod block;
mod config;
mod error;
mod html;
mod node;
mod parser;
mod span;

pub use block::{Block, List, ListItem};
pub use config::{CodeConfig, Config, DocumentConfig};
pub use error::{Error, Result};
pub use html::{blocks_to_html, blocks_to_node};
pub use node::{Attributes, HtmlNode, LeafNode, ParentNode, attributes_to_html};
pub use span::{SpanKind, TextSpan, text_span_to_leaf};

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Convert markdown to HTML using default config.
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    markdown_to_html_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to HTML with custom config.
pub fn markdown_to_html_with_config(markdown: &str, config: &Config) -> Result<String> {
    let blocks = parse(markdown);
    html::blocks_to_html(&blocks, config)
}
