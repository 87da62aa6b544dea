//! MCTS node types for tree storage.
//!
//! Uses arena allocation with indices: children are owned by the arena and
//! listed on their parent, and the parent link is a plain index.

use tictac_core::Mark;

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the search tree.
///
/// Each node holds one board state reached by a specific move sequence
/// from the root, plus the statistics backpropagation accumulates there.
#[derive(Clone, Debug)]
pub struct Node<S> {
    /// Board state at this node.
    pub state: S,

    /// Mark attribute, read according to the configured `MoverConvention`.
    pub mover: Mark,

    /// Cell played to reach this node (None for root).
    pub action: Option<usize>,

    /// Accumulated reward.
    pub value: f32,

    /// Number of backpropagation walks through this node.
    pub visit_count: u32,

    /// Children in creation order.
    pub children: Vec<NodeId>,

    /// Parent node (None for root).
    pub parent: Option<NodeId>,
}

impl<S> Node<S> {
    /// Create the root node.
    pub fn root(state: S, mover: Mark) -> Self {
        Self {
            state,
            mover,
            action: None,
            value: 0.0,
            visit_count: 0,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Create an unvisited child node.
    pub fn child(state: S, mover: Mark, action: usize, parent: NodeId) -> Self {
        Self {
            state,
            mover,
            action: Some(action),
            value: 0.0,
            visit_count: 0,
            children: Vec::new(),
            parent: Some(parent),
        }
    }

    /// A node without children: unexpanded or terminal.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Mean value, 0.0 before the first visit.
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value / self.visit_count as f32
        }
    }
}
