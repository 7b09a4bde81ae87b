use super::node::NodeId;

/// Kind of change observed in the document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// The text content of a text node changed
    CharacterData,
    /// A child was added to or removed from an element
    ChildList,
    /// An attribute was set on an element
    Attributes,
}

/// A single change notification emitted by the document
///
/// `target` is the node the change happened on: the text node for
/// `CharacterData`, the parent element for `ChildList`, the element for
/// `Attributes`.
#[derive(Debug, Clone, Copy)]
pub struct Mutation {
    pub kind: MutationKind,
    pub target: NodeId,
}
