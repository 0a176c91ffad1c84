use crate::block::{Block, List};
use crate::config::Config;
use crate::error::Result;
use crate::node::{Attributes, HtmlNode, LeafNode, ParentNode};
use crate::span::{TextSpan, text_span_to_leaf};

/// Convert blocks to HTML
pub fn blocks_to_html(blocks: &[Block], config: &Config) -> Result<String> {
    let html = blocks_to_node(blocks, config).to_html()?;
    tracing::debug!(blocks = blocks.len(), bytes = html.len(), "rendered document");
    Ok(html)
}

/// Build the node tree for a whole document, wrapped in the configured root tag.
pub fn blocks_to_node(blocks: &[Block], config: &Config) -> ParentNode {
    let children = blocks.iter().map(|block| block_to_node(block, config)).collect();
    ParentNode::new(config.document.root_tag.as_str(), children)
}

fn block_to_node(block: &Block, config: &Config) -> HtmlNode {
    match block {
        Block::Heading { level, content } => {
            ParentNode::new(format!("h{level}"), spans_to_nodes(content)).into()
        }
        Block::Paragraph { content } => ParentNode::new("p", spans_to_nodes(content)).into(),
        Block::CodeBlock { language, content } => {
            let mut code = LeafNode::new("code", content.as_str());
            if let Some(class) = config.code.class_for(language.as_deref()) {
                code = code.with_attributes(Attributes::from([("class", class)]));
            }
            ParentNode::new("pre", vec![code.into()]).into()
        }
        Block::List(list) => list_to_node(list, config).into(),
        Block::Table { headers, rows } => table_to_node(headers, rows).into(),
        Block::Html(raw) => LeafNode::text(raw.as_str()).into(),
        Block::Rule => LeafNode::new("hr", "").into(),
    }
}

fn spans_to_nodes(spans: &[TextSpan]) -> Vec<HtmlNode> {
    spans.iter().map(|span| text_span_to_leaf(span).into()).collect()
}

fn list_to_node(list: &List, config: &Config) -> ParentNode {
    let tag = if list.ordered { "ol" } else { "ul" };
    let items: Vec<HtmlNode> = list
        .items
        .iter()
        .map(|item| {
            let mut children = spans_to_nodes(&item.content);
            children.extend(item.children.iter().map(|block| block_to_node(block, config)));
            ParentNode::new("li", children).into()
        })
        .collect();
    ParentNode::new(tag, items)
}

fn table_row(cells: &[Vec<TextSpan>], cell_tag: &str) -> HtmlNode {
    let cells: Vec<HtmlNode> = cells
        .iter()
        .map(|cell| ParentNode::new(cell_tag, spans_to_nodes(cell)).into())
        .collect();
    ParentNode::new("tr", cells).into()
}

fn table_to_node(headers: &[Vec<TextSpan>], rows: &[Vec<Vec<TextSpan>>]) -> ParentNode {
    let head = ParentNode::new("thead", vec![table_row(headers, "th")]);
    let body = ParentNode::new("tbody", rows.iter().map(|row| table_row(row, "td")).collect());
    ParentNode::new("table", vec![head.into(), body.into()])
}
