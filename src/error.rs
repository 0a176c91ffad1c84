/// Errors raised while mapping text spans or rendering a node tree.
///
/// All of these describe a malformed tree or input; none are transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A leaf node was rendered without a value.
    #[error("leaf node must have a value")]
    MissingValue,
    /// A parent node was rendered without a tag.
    #[error("parent node must have a tag")]
    MissingTag,
    /// A parent node was rendered without a child sequence.
    #[error("parent node must have children")]
    MissingChildren,
    /// A span kind name outside the supported set.
    #[error("unknown text span kind: {0}")]
    UnknownSpanKind(String),
}

pub type Result<T> = std::result::Result<T, Error>;
