use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::block::{Block, List, ListItem};
use crate::span::TextSpan;

/// Strip YAML frontmatter from the beginning of markdown content
fn strip_frontmatter(markdown: &str) -> &str {
    let Some(rest) = markdown.strip_prefix("---\n") else {
        return markdown;
    };
    // Front matter opens with a `key:` line; anything else is a thematic break
    let opens_with_key = rest.lines().next().is_some_and(|line| line.contains(':'));
    if !opens_with_key {
        return markdown;
    }
    // Find the closing ---
    if let Some(end) = rest.find("\n---") {
        // Skip past the closing --- and any trailing newline
        let after_frontmatter = &rest[end + 4..];
        after_frontmatter.trim_start_matches('\n')
    } else {
        markdown
    }
}

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    let markdown = strip_frontmatter(markdown);
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(markdown, options);
    let mut blocks = Vec::new();
    let mut state = ParseState::default();

    for event in parser {
        process_event(event, &mut state, &mut blocks);
    }

    blocks
}

#[derive(Default)]
struct ParseState {
    // Current inline content being built
    spans: Vec<TextSpan>,
    // Active emphasis, innermost last
    format_stack: Vec<FormatKind>,

    // Link or image whose text is being collected
    link: Option<PendingSpan>,
    image: Option<PendingSpan>,

    // Current heading level (if in a heading)
    heading_level: Option<u8>,

    // Code block state
    in_code_block: bool,
    code_language: Option<String>,
    code_content: String,

    // Raw HTML block state
    in_html_block: bool,
    html_content: String,

    // List state
    list_stack: Vec<ListBuilder>,

    // Table state
    in_table: bool,
    table_headers: Vec<Vec<TextSpan>>,
    table_rows: Vec<Vec<Vec<TextSpan>>>,
    current_row: Vec<Vec<TextSpan>>,
    in_table_head: bool,
}

#[derive(Clone, Copy)]
enum FormatKind {
    Bold,
    Italic,
}

struct PendingSpan {
    url: String,
    text: String,
}

struct ListBuilder {
    ordered: bool,
    items: Vec<ListItem>,
    current_item_spans: Vec<TextSpan>,
    current_item_children: Vec<Block>,
}

impl ListBuilder {
    /// Inline content leads the item until its first block; later text
    /// becomes a paragraph so document order is kept.
    fn push_content(&mut self, content: Vec<TextSpan>) {
        if content.is_empty() {
            return;
        }
        if self.current_item_children.is_empty() {
            self.current_item_spans.extend(content);
        } else {
            self.current_item_children.push(Block::Paragraph { content });
        }
    }
}

impl ParseState {
    /// Route inline text to the pending image or link, or emit a span
    /// formatted by the innermost emphasis.
    fn push_text(&mut self, text: &str) {
        if let Some(image) = self.image.as_mut() {
            image.text.push_str(text);
        } else if let Some(link) = self.link.as_mut() {
            link.text.push_str(text);
        } else {
            let text = text.to_string();
            let span = match self.format_stack.last() {
                Some(FormatKind::Bold) => TextSpan::Bold(text),
                Some(FormatKind::Italic) => TextSpan::Italic(text),
                None => TextSpan::Plain(text),
            };
            self.spans.push(span);
        }
    }

    fn push_code(&mut self, code: &str) {
        if self.image.is_some() || self.link.is_some() {
            self.push_text(code);
        } else {
            self.spans.push(TextSpan::Code(code.to_string()));
        }
    }

    fn push_break(&mut self, text: &str) {
        if self.image.is_some() || self.link.is_some() {
            self.push_text(" ");
        } else {
            self.spans.push(TextSpan::Plain(text.to_string()));
        }
    }

    /// Move text of a tight list item into the open item before a block
    /// starts inside it.
    fn flush_item_text(&mut self) {
        let pending = std::mem::take(&mut self.spans);
        match self.list_stack.last_mut() {
            Some(list) => list.push_content(pending),
            None => self.spans = pending,
        }
    }

    /// Add a finished block to the open list item, or to the document.
    fn emit_block(&mut self, block: Block, blocks: &mut Vec<Block>) {
        match self.list_stack.last_mut() {
            Some(list) => list.current_item_children.push(block),
            None => blocks.push(block),
        }
    }
}

fn process_event(event: Event, state: &mut ParseState, blocks: &mut Vec<Block>) {
    match event {
        // Headings
        Event::Start(Tag::Heading { level, .. }) => {
            state.flush_item_text();
            state.heading_level = Some(heading_level_to_u8(level));
        }
        Event::End(TagEnd::Heading(_)) => {
            if let Some(level) = state.heading_level.take() {
                let content = std::mem::take(&mut state.spans);
                state.emit_block(Block::Heading { level, content }, blocks);
            }
        }

        // Paragraphs
        Event::Start(Tag::Paragraph) => {}
        Event::End(TagEnd::Paragraph) => {
            let content = std::mem::take(&mut state.spans);
            if !content.is_empty() {
                // If we're in a list item, add to that instead
                if let Some(list) = state.list_stack.last_mut() {
                    list.push_content(content);
                } else if state.in_table {
                    // Ignore paragraphs in tables, handled by cell
                } else {
                    blocks.push(Block::Paragraph { content });
                }
            }
        }

        // Text content
        Event::Text(text) => {
            if state.in_code_block {
                state.code_content.push_str(&text);
            } else {
                state.push_text(&text);
            }
        }

        // Inline code
        Event::Code(code) => {
            state.push_code(&code);
        }

        // Inline HTML passes through untouched
        Event::InlineHtml(html) => {
            state.push_text(&html);
        }

        // Block HTML, likewise
        Event::Start(Tag::HtmlBlock) => {
            state.flush_item_text();
            state.in_html_block = true;
            state.html_content.clear();
        }
        Event::Html(html) => {
            if state.in_html_block {
                state.html_content.push_str(&html);
            } else {
                state.push_text(&html);
            }
        }
        Event::End(TagEnd::HtmlBlock) => {
            state.in_html_block = false;
            let html = std::mem::take(&mut state.html_content);
            state.emit_block(Block::Html(html), blocks);
        }

        // Bold
        Event::Start(Tag::Strong) => {
            state.format_stack.push(FormatKind::Bold);
        }
        Event::End(TagEnd::Strong) => {
            state.format_stack.pop();
        }

        // Italic
        Event::Start(Tag::Emphasis) => {
            state.format_stack.push(FormatKind::Italic);
        }
        Event::End(TagEnd::Emphasis) => {
            state.format_stack.pop();
        }

        // Links
        Event::Start(Tag::Link { dest_url, .. }) => {
            state.link = Some(PendingSpan {
                url: dest_url.into_string(),
                text: String::new(),
            });
        }
        Event::End(TagEnd::Link) => {
            if let Some(PendingSpan { url, text }) = state.link.take() {
                state.spans.push(TextSpan::Link { text, url });
            }
        }

        // Images
        Event::Start(Tag::Image { dest_url, .. }) => {
            state.image = Some(PendingSpan {
                url: dest_url.into_string(),
                text: String::new(),
            });
        }
        Event::End(TagEnd::Image) => {
            if let Some(PendingSpan { url, text }) = state.image.take() {
                // A linked image is emitted ahead of its link, which takes the alt text
                if let Some(link) = state.link.as_mut() {
                    link.text.push_str(&text);
                }
                state.spans.push(TextSpan::Image { text, url });
            }
        }

        // Code blocks
        Event::Start(Tag::CodeBlock(kind)) => {
            state.flush_item_text();
            state.in_code_block = true;
            state.code_language = match kind {
                pulldown_cmark::CodeBlockKind::Fenced(lang) => {
                    let lang = lang.into_string();
                    if lang.is_empty() { None } else { Some(lang) }
                }
                pulldown_cmark::CodeBlockKind::Indented => None,
            };
            state.code_content.clear();
        }
        Event::End(TagEnd::CodeBlock) => {
            state.in_code_block = false;
            let content = std::mem::take(&mut state.code_content);
            let language = state.code_language.take();
            state.emit_block(Block::CodeBlock { language, content }, blocks);
        }

        // Lists
        Event::Start(Tag::List(first_item)) => {
            state.flush_item_text();
            state.list_stack.push(ListBuilder {
                ordered: first_item.is_some(),
                items: Vec::new(),
                current_item_spans: Vec::new(),
                current_item_children: Vec::new(),
            });
        }
        Event::End(TagEnd::List(_)) => {
            if let Some(list_builder) = state.list_stack.pop() {
                let list = List {
                    ordered: list_builder.ordered,
                    items: list_builder.items,
                };
                // A nested list lands in the parent's open item
                state.emit_block(Block::List(list), blocks);
            }
        }

        Event::Start(Tag::Item) => {
            if let Some(list) = state.list_stack.last_mut() {
                list.current_item_spans.clear();
                list.current_item_children.clear();
            }
        }
        Event::End(TagEnd::Item) => {
            // Collect any remaining spans
            state.flush_item_text();

            if let Some(list) = state.list_stack.last_mut() {
                let content = std::mem::take(&mut list.current_item_spans);
                let children = std::mem::take(&mut list.current_item_children);
                list.items.push(ListItem { content, children });
            }
        }

        // Tables
        Event::Start(Tag::Table(_)) => {
            state.flush_item_text();
            state.in_table = true;
            state.table_headers.clear();
            state.table_rows.clear();
        }
        Event::End(TagEnd::Table) => {
            state.in_table = false;
            let headers = std::mem::take(&mut state.table_headers);
            let rows = std::mem::take(&mut state.table_rows);
            state.emit_block(Block::Table { headers, rows }, blocks);
        }

        Event::Start(Tag::TableHead) => {
            state.in_table_head = true;
            state.current_row.clear();
        }
        Event::End(TagEnd::TableHead) => {
            state.in_table_head = false;
            state.table_headers = std::mem::take(&mut state.current_row);
        }

        Event::Start(Tag::TableRow) => {
            state.current_row.clear();
        }
        Event::End(TagEnd::TableRow) => {
            if !state.in_table_head {
                let row = std::mem::take(&mut state.current_row);
                state.table_rows.push(row);
            }
        }

        Event::Start(Tag::TableCell) => {
            state.spans.clear();
        }
        Event::End(TagEnd::TableCell) => {
            let cell_content = std::mem::take(&mut state.spans);
            state.current_row.push(cell_content);
        }

        // Horizontal rule
        Event::Rule => {
            state.flush_item_text();
            state.emit_block(Block::Rule, blocks);
        }

        // Soft/hard breaks
        Event::SoftBreak => {
            state.push_break(" ");
        }
        Event::HardBreak => {
            state.push_break("\n");
        }

        // Ignore other events
        _ => {}
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(text: &str) -> TextSpan {
        TextSpan::Plain(text.to_string())
    }

    #[test]
    fn heading() {
        assert_eq!(
            parse("## Title"),
            vec![Block::Heading {
                level: 2,
                content: vec![plain("Title")],
            }]
        );
    }

    #[test]
    fn inline_formats() {
        let blocks = parse("a **b** *c* `d`");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                content: vec![
                    plain("a "),
                    TextSpan::Bold("b".into()),
                    plain(" "),
                    TextSpan::Italic("c".into()),
                    plain(" "),
                    TextSpan::Code("d".into()),
                ],
            }]
        );
    }

    #[test]
    fn innermost_emphasis_wins() {
        let blocks = parse("**bold *both* bold**");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                content: vec![
                    TextSpan::Bold("bold ".into()),
                    TextSpan::Italic("both".into()),
                    TextSpan::Bold(" bold".into()),
                ],
            }]
        );
    }

    #[test]
    fn link_and_image() {
        let blocks = parse("[**home** page](/) ![a `logo`](/logo.png)");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                content: vec![
                    TextSpan::Link {
                        text: "home page".into(),
                        url: "/".into(),
                    },
                    plain(" "),
                    TextSpan::Image {
                        text: "a logo".into(),
                        url: "/logo.png".into(),
                    },
                ],
            }]
        );
    }

    #[test]
    fn breaks() {
        let blocks = parse("one\ntwo  \nthree");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                content: vec![
                    plain("one"),
                    plain(" "),
                    plain("two"),
                    plain("\n"),
                    plain("three"),
                ],
            }]
        );
    }

    #[test]
    fn code_block() {
        assert_eq!(
            parse("```rust\nlet x = 1;\n```"),
            vec![Block::CodeBlock {
                language: Some("rust".into()),
                content: "let x = 1;\n".into(),
            }]
        );
    }

    #[test]
    fn nested_list() {
        let blocks = parse("- one\n  - inner\n- two");
        let inner = List {
            ordered: false,
            items: vec![ListItem {
                content: vec![plain("inner")],
                children: vec![],
            }],
        };
        assert_eq!(
            blocks,
            vec![Block::List(List {
                ordered: false,
                items: vec![
                    ListItem {
                        content: vec![plain("one")],
                        children: vec![Block::List(inner)],
                    },
                    ListItem {
                        content: vec![plain("two")],
                        children: vec![],
                    },
                ],
            })]
        );
    }

    #[test]
    fn ordered_list() {
        let blocks = parse("1. first\n2. second");
        let Block::List(list) = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert!(list.ordered);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn table() {
        let blocks = parse("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            blocks,
            vec![Block::Table {
                headers: vec![vec![plain("A")], vec![plain("B")]],
                rows: vec![vec![vec![plain("1")], vec![plain("2")]]],
            }]
        );
    }

    #[test]
    fn frontmatter_is_stripped() {
        assert_eq!(
            parse("---\ntitle: x\n---\n\nBody"),
            vec![Block::Paragraph {
                content: vec![plain("Body")],
            }]
        );
    }

    #[test]
    fn rule() {
        assert_eq!(
            parse("a\n\n---\n"),
            vec![
                Block::Paragraph {
                    content: vec![plain("a")],
                },
                Block::Rule,
            ]
        );
    }

    #[test]
    fn rule_at_start_is_not_frontmatter() {
        assert_eq!(
            parse("---\n\nIntro\n\n---\n\nBody"),
            vec![
                Block::Rule,
                Block::Paragraph {
                    content: vec![plain("Intro")],
                },
                Block::Rule,
                Block::Paragraph {
                    content: vec![plain("Body")],
                },
            ]
        );
    }

    #[test]
    fn linked_image() {
        assert_eq!(
            parse("[![logo](/l.png)](https://x.org)"),
            vec![Block::Paragraph {
                content: vec![
                    TextSpan::Image {
                        text: "logo".into(),
                        url: "/l.png".into(),
                    },
                    TextSpan::Link {
                        text: "logo".into(),
                        url: "https://x.org".into(),
                    },
                ],
            }]
        );
    }

    #[test]
    fn code_block_stays_in_list_item() {
        let blocks = parse("- item\n\n  ```\n  code\n  ```\n- two");
        assert_eq!(
            blocks,
            vec![Block::List(List {
                ordered: false,
                items: vec![
                    ListItem {
                        content: vec![plain("item")],
                        children: vec![Block::CodeBlock {
                            language: None,
                            content: "code\n".into(),
                        }],
                    },
                    ListItem {
                        content: vec![plain("two")],
                        children: vec![],
                    },
                ],
            })]
        );
    }

    #[test]
    fn sibling_sublists_are_kept() {
        let blocks = parse("- a\n  - x\n\n  1. y\n- b");
        let Block::List(list) = &blocks[0] else {
            panic!("expected list, got {blocks:?}");
        };
        assert_eq!(list.items.len(), 2);
        let first = &list.items[0];
        assert_eq!(first.content, vec![plain("a")]);
        assert_eq!(first.children.len(), 2);
        let (Block::List(x), Block::List(y)) = (&first.children[0], &first.children[1]) else {
            panic!("expected two sublists, got {:?}", first.children);
        };
        assert!(!x.ordered);
        assert_eq!(x.items[0].content, vec![plain("x")]);
        assert!(y.ordered);
        assert_eq!(y.items[0].content, vec![plain("y")]);
    }

    #[test]
    fn loose_list_paragraphs_merge_into_item() {
        let blocks = parse("- first\n\n  second\n\n- third\n");
        assert_eq!(
            blocks,
            vec![Block::List(List {
                ordered: false,
                items: vec![
                    ListItem {
                        content: vec![plain("first"), plain("second")],
                        children: vec![],
                    },
                    ListItem {
                        content: vec![plain("third")],
                        children: vec![],
                    },
                ],
            })]
        );
    }

    #[test]
    fn inline_html_passes_through() {
        assert_eq!(
            parse("a <span>b</span> c"),
            vec![Block::Paragraph {
                content: vec![
                    plain("a "),
                    plain("<span>"),
                    plain("b"),
                    plain("</span>"),
                    plain(" c"),
                ],
            }]
        );
    }

    #[test]
    fn html_block_is_kept() {
        let blocks = parse("<div>raw</div>\n\npara");
        assert_eq!(blocks.len(), 2);
        let Block::Html(raw) = &blocks[0] else {
            panic!("expected html block, got {blocks:?}");
        };
        assert_eq!(raw.trim_end(), "<div>raw</div>");
        assert_eq!(
            blocks[1],
            Block::Paragraph {
                content: vec![plain("para")],
            }
        );
    }
}
