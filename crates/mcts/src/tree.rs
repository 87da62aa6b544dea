//! Arena-allocated search tree.
//!
//! A `Vec<Node>` with indices keeps the parent links free of ownership:
//! dropping the tree drops every node at once.

use crate::node::{Node, NodeId};
use tictac_core::Mark;

/// Arena-allocated search tree.
#[derive(Debug)]
pub struct Tree<S> {
    nodes: Vec<Node<S>>,
}

impl<S> Tree<S> {
    /// Create a tree holding only a root.
    pub fn new(state: S, mover: Mark) -> Self {
        Self {
            nodes: vec![Node::root(state, mover)],
        }
    }

    /// Drop every node and start again from a fresh root.
    pub fn reset(&mut self, state: S, mover: Mark) {
        self.nodes.clear();
        self.nodes.push(Node::root(state, mover));
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.0]
    }

    /// Append a child under `parent`, returning its ID.
    pub fn add_child(&mut self, parent: NodeId, state: S, mover: Mark, action: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::child(state, mover, action, parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Children of a node in creation order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Parent of a node (None for root).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    /// Nodes from `id` up to the root, inclusive.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Depth below the root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.path_to_root(id).len() - 1
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree keeps its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<S> {
        self.get(NodeId::ROOT)
    }
}
