use super::mutation::{Mutation, MutationKind};
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Capacity of the mutation broadcast channel; slow subscribers lag rather
/// than block document mutation.
const MUTATION_CHANNEL_CAPACITY: usize = 256;

/// Opaque handle to a node in a [`Document`]
///
/// Ids index into the document arena and are never reused, so a stale id held
/// across an await point stays stale: every lookup re-checks liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: HashMap<String, String>,
    },
    Text {
        content: String,
    },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of nodes; removed slots stay `None` so ids are never recycled
#[derive(Debug)]
struct Tree {
    nodes: Vec<Option<NodeData>>,
    root: NodeId,
}

impl Tree {
    fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(data));
        id
    }

    /// Depth-first, document-order traversal starting below `id`
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(id) {
            Some(data) => data.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            if let Some(data) = self.get(next) {
                out.push(next);
                stack.extend(data.children.iter().rev().copied());
            }
        }
        out
    }
}

/// Cloneable handle to a mutable document tree
///
/// All accessors are total: a dead or unknown id yields `None`/`false`/empty,
/// never a panic. Mutating operations emit [`Mutation`] notifications on a
/// broadcast channel; subscribers that fall behind lag, they never block the
/// mutator.
#[derive(Clone)]
pub struct Document {
    tree: Arc<Mutex<Tree>>,
    mutations: broadcast::Sender<Mutation>,
}

impl Document {
    /// Create a document with a single root element
    pub fn new(root_tag: &str) -> Self {
        let root_data = NodeData {
            kind: NodeKind::Element {
                tag: root_tag.to_string(),
                attrs: HashMap::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        let tree = Tree {
            nodes: vec![Some(root_data)],
            root: NodeId(0),
        };
        let (mutations, _) = broadcast::channel(MUTATION_CHANNEL_CAPACITY);
        Self {
            tree: Arc::new(Mutex::new(tree)),
            mutations,
        }
    }

    pub fn root(&self) -> NodeId {
        self.tree.lock().unwrap().root
    }

    /// Subscribe to change notifications for the whole document
    pub fn subscribe(&self) -> broadcast::Receiver<Mutation> {
        self.mutations.subscribe()
    }

    fn emit(&self, kind: MutationKind, target: NodeId) {
        // No subscribers is fine; the send result is intentionally ignored.
        let _ = self.mutations.send(Mutation { kind, target });
    }

    /// Create a detached element node
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut tree = self.tree.lock().unwrap();
        tree.alloc(NodeData {
            kind: NodeKind::Element {
                tag: tag.to_string(),
                attrs: HashMap::new(),
            },
            parent: None,
            children: Vec::new(),
        })
    }

    /// Create a detached text node
    pub fn create_text(&self, content: &str) -> NodeId {
        let mut tree = self.tree.lock().unwrap();
        tree.alloc(NodeData {
            kind: NodeKind::Text {
                content: content.to_string(),
            },
            parent: None,
            children: Vec::new(),
        })
    }

    /// Append a detached node under `parent`
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        {
            let mut tree = self.tree.lock().unwrap();
            if tree.get(parent).is_none() {
                bail!("append_child: parent {parent} does not exist");
            }
            match tree.get(child) {
                None => bail!("append_child: child {child} does not exist"),
                Some(data) if data.parent.is_some() => {
                    bail!("append_child: child {child} is already attached")
                }
                Some(_) => {}
            }
            if let Some(child_data) = tree.get_mut(child) {
                child_data.parent = Some(parent);
            }
            if let Some(parent_data) = tree.get_mut(parent) {
                parent_data.children.push(child);
            }
        }
        self.emit(MutationKind::ChildList, parent);
        Ok(())
    }

    /// Remove a node and its whole subtree; a no-op for dead ids
    pub fn remove(&self, id: NodeId) {
        let parent = {
            let mut tree = self.tree.lock().unwrap();
            let Some(data) = tree.get(id) else { return };
            let parent = data.parent;
            if let Some(parent) = parent {
                if let Some(parent_data) = tree.get_mut(parent) {
                    parent_data.children.retain(|&c| c != id);
                }
            }
            for descendant in tree.descendants(id) {
                tree.nodes[descendant.0] = None;
            }
            tree.nodes[id.0] = None;
            parent
        };
        if let Some(parent) = parent {
            self.emit(MutationKind::ChildList, parent);
        }
    }

    /// Overwrite the content of a text node, emitting a `CharacterData`
    /// notification; a no-op on elements and dead ids
    pub fn set_text(&self, id: NodeId, content: &str) {
        let changed = {
            let mut tree = self.tree.lock().unwrap();
            match tree.get_mut(id) {
                Some(NodeData {
                    kind: NodeKind::Text { content: current },
                    ..
                }) => {
                    *current = content.to_string();
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.emit(MutationKind::CharacterData, id);
        }
    }

    /// Set an attribute on an element; a no-op on text nodes and dead ids
    pub fn set_attr(&self, id: NodeId, name: &str, value: &str) {
        let changed = {
            let mut tree = self.tree.lock().unwrap();
            match tree.get_mut(id) {
                Some(NodeData {
                    kind: NodeKind::Element { attrs, .. },
                    ..
                }) => {
                    attrs.insert(name.to_string(), value.to_string());
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.emit(MutationKind::Attributes, id);
        }
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.tree.lock().unwrap().get(id).is_some()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.tree.lock().unwrap().get(id),
            Some(NodeData {
                kind: NodeKind::Element { .. },
                ..
            })
        )
    }

    pub fn tag(&self, id: NodeId) -> Option<String> {
        match self.tree.lock().unwrap().get(id) {
            Some(NodeData {
                kind: NodeKind::Element { tag, .. },
                ..
            }) => Some(tag.clone()),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        match self.tree.lock().unwrap().get(id) {
            Some(NodeData {
                kind: NodeKind::Element { attrs, .. },
                ..
            }) => attrs.get(name).cloned(),
            _ => None,
        }
    }

    /// Content of a text node; `None` for elements and dead ids
    pub fn own_text(&self, id: NodeId) -> Option<String> {
        match self.tree.lock().unwrap().get(id) {
            Some(NodeData {
                kind: NodeKind::Text { content },
                ..
            }) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.lock().unwrap().get(id).and_then(|data| data.parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .lock()
            .unwrap()
            .get(id)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    /// Whether `id` is `ancestor` or lies anywhere below it
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let tree = self.tree.lock().unwrap();
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = tree.get(node).and_then(|data| data.parent);
        }
        false
    }

    /// Concatenated text of the subtree rooted at `id`, in document order
    pub fn text_content(&self, id: NodeId) -> String {
        let tree = self.tree.lock().unwrap();
        let mut out = String::new();
        if let Some(NodeData {
            kind: NodeKind::Text { content },
            ..
        }) = tree.get(id)
        {
            out.push_str(content);
        }
        for descendant in tree.descendants(id) {
            if let Some(NodeData {
                kind: NodeKind::Text { content },
                ..
            }) = tree.get(descendant)
            {
                out.push_str(content);
            }
        }
        out
    }

    /// All nodes below `id`, document order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.lock().unwrap().descendants(id)
    }

    /// Whether any element below `id` carries the given tag
    pub fn has_descendant_tag(&self, id: NodeId, tag: &str) -> bool {
        let tree = self.tree.lock().unwrap();
        tree.descendants(id).into_iter().any(|d| {
            matches!(
                tree.get(d),
                Some(NodeData {
                    kind: NodeKind::Element { tag: t, .. },
                    ..
                }) if t == tag
            )
        })
    }

    /// First element in document order carrying `attrs[name] == value`
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        let tree = self.tree.lock().unwrap();
        let root = tree.root;
        std::iter::once(root)
            .chain(tree.descendants(root))
            .find(|&id| {
                matches!(
                    tree.get(id),
                    Some(NodeData {
                        kind: NodeKind::Element { attrs, .. },
                        ..
                    }) if attrs.get(name).map(String::as_str) == Some(value)
                )
            })
    }

    /// Every element in document order carrying `attrs[name] == value`
    pub fn find_all_by_attr(&self, name: &str, value: &str) -> Vec<NodeId> {
        let tree = self.tree.lock().unwrap();
        let root = tree.root;
        std::iter::once(root)
            .chain(tree.descendants(root))
            .filter(|&id| {
                matches!(
                    tree.get(id),
                    Some(NodeData {
                        kind: NodeKind::Element { attrs, .. },
                        ..
                    }) if attrs.get(name).map(String::as_str) == Some(value)
                )
            })
            .collect()
    }

    /// Number of elements carrying the given attribute at all
    pub fn count_with_attr(&self, name: &str) -> usize {
        let tree = self.tree.lock().unwrap();
        let root = tree.root;
        std::iter::once(root)
            .chain(tree.descendants(root))
            .filter(|&id| {
                matches!(
                    tree.get(id),
                    Some(NodeData {
                        kind: NodeKind::Element { attrs, .. },
                        ..
                    }) if attrs.contains_key(name)
                )
            })
            .count()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree.lock().unwrap();
        f.debug_struct("Document")
            .field("nodes", &tree.nodes.len())
            .finish()
    }
}
