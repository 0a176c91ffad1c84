use crate::error::{Error, Result};

/// Element attributes, kept in insertion order.
///
/// Inserting a key that is already present replaces its value in place, so
/// every key renders exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Serialize attributes as ` key="value"` pairs.
///
/// Absent or empty attributes produce an empty string. Values are written
/// verbatim, without escaping.
pub fn attributes_to_html(attributes: Option<&Attributes>) -> String {
    let mut out = String::new();
    if let Some(attributes) = attributes {
        for (key, value) in attributes.iter() {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
    }
    out
}

fn open_tag(tag: &str, attributes: Option<&Attributes>, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push_str(&attributes_to_html(attributes));
    out.push('>');
}

fn close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// A node without children: an optional tag wrapped around a literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    tag: Option<String>,
    value: Option<String>,
    attributes: Option<Attributes>,
}

impl LeafNode {
    /// A tagged leaf, rendered as `<tag>value</tag>`.
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self::from_parts(Some(tag.into()), Some(value.into()), None)
    }

    /// An untagged leaf, rendered as its bare value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::from_parts(None, Some(value.into()), None)
    }

    pub fn from_parts(
        tag: Option<String>,
        value: Option<String>,
        attributes: Option<Attributes>,
    ) -> Self {
        Self {
            tag,
            value,
            attributes,
        }
    }

    pub fn with_attributes(self, attributes: Attributes) -> Self {
        Self {
            attributes: Some(attributes),
            ..self
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_ref()
    }

    pub fn to_html(&self) -> Result<String> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    fn write_html(&self, out: &mut String) -> Result<()> {
        let value = self.value.as_deref().ok_or(Error::MissingValue)?;
        match self.tag.as_deref() {
            None => out.push_str(value),
            Some(tag) => {
                open_tag(tag, self.attributes.as_ref(), out);
                out.push_str(value);
                close_tag(tag, out);
            }
        }
        Ok(())
    }
}

/// A node whose content is entirely the rendered output of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentNode {
    tag: Option<String>,
    children: Option<Vec<HtmlNode>>,
    attributes: Option<Attributes>,
}

impl ParentNode {
    pub fn new(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        Self::from_parts(Some(tag.into()), Some(children), None)
    }

    pub fn from_parts(
        tag: Option<String>,
        children: Option<Vec<HtmlNode>>,
        attributes: Option<Attributes>,
    ) -> Self {
        Self {
            tag,
            children,
            attributes,
        }
    }

    pub fn with_attributes(self, attributes: Attributes) -> Self {
        Self {
            attributes: Some(attributes),
            ..self
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn children(&self) -> Option<&[HtmlNode]> {
        self.children.as_deref()
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_ref()
    }

    /// Render the element and, recursively, all of its children.
    ///
    /// The first failing child aborts the whole render.
    pub fn to_html(&self) -> Result<String> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    fn write_html(&self, out: &mut String) -> Result<()> {
        let tag = self.tag.as_deref().ok_or(Error::MissingTag)?;
        let children = self.children.as_deref().ok_or(Error::MissingChildren)?;

        open_tag(tag, self.attributes.as_ref(), out);
        for child in children {
            child.write_html(out)?;
        }
        close_tag(tag, out);
        Ok(())
    }
}

/// Either shape of markup node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Leaf(LeafNode),
    Parent(ParentNode),
}

impl HtmlNode {
    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf(leaf) => leaf.tag(),
            HtmlNode::Parent(parent) => parent.tag(),
        }
    }

    pub fn to_html(&self) -> Result<String> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    // Children write into the parent's buffer; a failed render discards it.
    fn write_html(&self, out: &mut String) -> Result<()> {
        match self {
            HtmlNode::Leaf(leaf) => leaf.write_html(out),
            HtmlNode::Parent(parent) => parent.write_html(out),
        }
    }
}

impl From<LeafNode> for HtmlNode {
    fn from(leaf: LeafNode) -> Self {
        HtmlNode::Leaf(leaf)
    }
}

impl From<ParentNode> for HtmlNode {
    fn from(parent: ParentNode) -> Self {
        HtmlNode::Parent(parent)
    }
}
