//! Upper Confidence bound applied to Trees.
//!
//! UCT(n) = value(n) / visits(n) + C * sqrt(ln(visits(parent)) / visits(n))
//!
//! Unvisited nodes score `+∞`, so every child is simulated once before any
//! sibling is revisited.

use crate::node::NodeId;
use crate::tree::Tree;

/// UCT score from raw statistics.
///
/// The exploration term is dropped when the parent has no visits.
pub fn uct_value(value: f32, visits: u32, parent_visits: u32, c: f32) -> f32 {
    if visits == 0 {
        return f32::INFINITY;
    }
    let visits = visits as f32;
    let exploitation = value / visits;
    if parent_visits == 0 {
        return exploitation;
    }
    exploitation + c * ((parent_visits as f32).ln() / visits).sqrt()
}

/// UCT score of a node, reading the visit count through its parent link.
///
/// The root has no parent and scores on exploitation alone.
pub fn score<S>(tree: &Tree<S>, id: NodeId, c: f32) -> f32 {
    let node = tree.get(id);
    let parent_visits = node
        .parent
        .map(|parent| tree.get(parent).visit_count)
        .unwrap_or(0);
    uct_value(node.value, node.visit_count, parent_visits, c)
}

/// Child with the highest UCT score; the first one wins ties.
///
/// Returns None for a leaf.
pub fn best_child<S>(tree: &Tree<S>, id: NodeId, c: f32) -> Option<NodeId> {
    let mut best = None;
    let mut best_score = f32::NEG_INFINITY;

    for &child in tree.children(id) {
        let s = score(tree, child, c);
        if best.is_none() || s > best_score {
            best = Some(child);
            best_score = s;
        }
    }
    best
}
