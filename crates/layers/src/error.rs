#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocError {
    /// No group (or root) with this id exists in the tree.
    UnknownNode(String),
    /// A sort order that is not a permutation of the target's child indices.
    InvalidOrder { len: usize, order: Vec<usize> },
    /// A group references a layer id absent from the flat layer list.
    MissingLayer(String),
}

impl std::fmt::Display for TocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TocError::UnknownNode(id) => write!(f, "unknown node: {id}"),
            TocError::InvalidOrder { len, order } => {
                write!(f, "order {order:?} is not a permutation of {len} children")
            }
            TocError::MissingLayer(id) => write!(f, "group references missing layer: {id}"),
        }
    }
}

impl std::error::Error for TocError {}
