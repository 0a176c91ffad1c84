use crate::span::TextSpan;

/// A single list item: leading inline content, then any blocks nested in it
/// (sub-lists, code blocks, later paragraphs) in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: Vec<TextSpan>,
    pub children: Vec<Block>,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// Block-level elements parsed from Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<TextSpan>,
    },
    Paragraph {
        content: Vec<TextSpan>,
    },
    CodeBlock {
        language: Option<String>,
        content: String,
    },
    List(List),
    Table {
        headers: Vec<Vec<TextSpan>>,
        rows: Vec<Vec<Vec<TextSpan>>>,
    },
    /// Raw HTML, emitted verbatim
    Html(String),
    Rule,
}
