//! Monte Carlo Tree Search implementation.
//!
//! Runs selection, expansion, rollout and backpropagation over an arena
//! tree that is rebuilt for every search.

use crate::{
    config::{FinalSelection, MctsConfig, MoverConvention, RewardTable},
    error::{MctsError, Result},
    node::NodeId,
    rollout::Evaluator,
    tree::Tree,
    uct,
};
use std::marker::PhantomData;
use tictac_core::{Game, Mark, Outcome};
use tracing::{debug, trace};

/// Statistics for one root child after a search.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildStats<S> {
    /// Cell played from the root.
    pub action: usize,

    /// Board after the move.
    pub state: S,

    /// Visit count.
    pub visits: u32,

    /// Accumulated reward, credited to the mark that moved.
    pub value: f32,

    /// Final UCT score.
    pub score: f32,
}

/// Result of an MCTS search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<S> {
    /// Recommended next board.
    pub best_state: S,

    /// Cell played to reach `best_state`.
    pub best_move: usize,

    /// Root children in creation order (ascending cell index).
    pub children: Vec<ChildStats<S>>,

    /// Iterations actually run.
    pub iterations: usize,

    /// Root visit count; equals `iterations`.
    pub root_visits: u32,

    /// Nodes in the tree when the search stopped.
    pub tree_size: usize,
}

/// Monte Carlo Tree Search with UCT selection.
///
/// Generic over:
/// - `G`: The game being played
/// - `E`: The leaf evaluator (random rollouts by default)
pub struct Mcts<G: Game, E: Evaluator<G>> {
    config: MctsConfig,
    evaluator: E,
    tree: Option<Tree<G::State>>,
    _game: PhantomData<G>,
}

impl<G, E> Mcts<G, E>
where
    G: Game,
    E: Evaluator<G>,
{
    /// Create a new MCTS instance.
    pub fn new(config: MctsConfig, evaluator: E) -> Self {
        Self {
            config,
            evaluator,
            tree: None,
            _game: PhantomData,
        }
    }

    /// Search configuration.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Tree built by the most recent search.
    pub fn tree(&self) -> Option<&Tree<G::State>> {
        self.tree.as_ref()
    }

    /// Search from `state` with `to_move` to play and return the chosen board.
    pub fn run(&mut self, game: &G, state: &G::State, to_move: Mark) -> Result<G::State> {
        Ok(self.search(game, state, to_move)?.best_state)
    }

    /// Apply an externally chosen move for `mark`, then search the reply.
    ///
    /// # Errors
    /// `MctsError::Game` if the move is off the board or the cell is taken;
    /// `NoLegalMove` if the move ended the game.
    pub fn reply(&mut self, game: &G, state: &G::State, index: usize, mark: Mark) -> Result<G::State> {
        let after = game.apply(state, index, mark)?;
        self.run(game, &after, mark.opposite())
    }

    /// Run MCTS from the given state, returning search results.
    ///
    /// # Errors
    /// `InvalidBudget` for a zero budget, `NoLegalMove` for a terminal
    /// `state` or when the budget leaves the root unexpanded.
    pub fn search(
        &mut self,
        game: &G,
        state: &G::State,
        to_move: Mark,
    ) -> Result<SearchResult<G::State>> {
        if self.config.iterations == 0 {
            return Err(MctsError::InvalidBudget(self.config.iterations));
        }
        if game.is_terminal(state) {
            return Err(MctsError::NoLegalMove);
        }

        let convention = self.config.mover_convention;
        let c = self.config.exploration;
        let rewards = self.config.rewards;
        let iterations = self.config.effective_iterations();

        let root_mover = convention.stored(to_move.opposite());
        let tree = self
            .tree
            .get_or_insert_with(|| Tree::new(state.clone(), root_mover));
        tree.reset(state.clone(), root_mover);

        for iteration in 0..iterations {
            let leaf = select(tree, c);
            let node = expand(game, tree, leaf, convention);
            let mover = to_move_at(tree, node, convention);
            let outcome = self.evaluator.evaluate(game, &tree.get(node).state, mover);
            backpropagate(tree, node, outcome, convention, &rewards);

            trace!(
                iteration,
                leaf = leaf.index(),
                depth = tree.depth(leaf),
                node = node.index(),
                %outcome,
                "MCTS iteration complete"
            );
        }

        let best = final_choice(tree, self.config.final_selection, c).ok_or(MctsError::NoLegalMove)?;

        let children: Vec<ChildStats<G::State>> = tree
            .children(NodeId::ROOT)
            .iter()
            .map(|&id| {
                let child = tree.get(id);
                ChildStats {
                    action: child
                        .action
                        .expect("BUG: root child without an action"),
                    state: child.state.clone(),
                    visits: child.visit_count,
                    value: child.value,
                    score: uct::score(tree, id, c),
                }
            })
            .collect();

        let best_node = tree.get(best);
        let result = SearchResult {
            best_state: best_node.state.clone(),
            best_move: best_node.action.expect("BUG: root child without an action"),
            children,
            iterations,
            root_visits: tree.root().visit_count,
            tree_size: tree.len(),
        };

        debug!(
            iterations,
            root_visits = result.root_visits,
            tree_size = result.tree_size,
            best_move = result.best_move,
            best_visits = best_node.visit_count,
            best_value = best_node.value,
            "MCTS search complete"
        );

        Ok(result)
    }
}

/// SELECT: descend by highest UCT score until a leaf.
pub(crate) fn select<S>(tree: &Tree<S>, c: f32) -> NodeId {
    let mut current = NodeId::ROOT;
    while let Some(child) = uct::best_child(tree, current, c) {
        current = child;
    }
    current
}

/// EXPAND: pick the node this iteration simulates from.
///
/// A non-root leaf that has never been visited is simulated as is. Any
/// other non-terminal leaf gets its children and hands over the first one.
pub(crate) fn expand<G: Game>(
    game: &G,
    tree: &mut Tree<G::State>,
    id: NodeId,
    convention: MoverConvention,
) -> NodeId {
    let node = tree.get(id);
    if node.visit_count == 0 && id != NodeId::ROOT {
        return id;
    }

    expand_children(game, tree, id, convention);
    tree.children(id).first().copied().unwrap_or(id)
}

/// Add one child per empty cell. Returns the number of children created;
/// zero for terminal or already expanded nodes.
pub(crate) fn expand_children<G: Game>(
    game: &G,
    tree: &mut Tree<G::State>,
    id: NodeId,
    convention: MoverConvention,
) -> usize {
    let node = tree.get(id);
    if !node.is_leaf() || game.is_terminal(&node.state) {
        return 0;
    }

    let state = node.state.clone();
    let mark = to_move_at(tree, id, convention);
    let empty = game.empty_positions(&state);

    for &index in &empty {
        let next = game
            .apply(&state, index, mark)
            .expect("BUG: expansion applied a move to a non-empty cell");
        tree.add_child(id, next, convention.stored(mark), index);
    }
    empty.len()
}

/// BACKPROPAGATE: update every node from `id` up to the root.
pub(crate) fn backpropagate<S>(
    tree: &mut Tree<S>,
    id: NodeId,
    outcome: Outcome,
    convention: MoverConvention,
    rewards: &RewardTable,
) {
    let mut current = Some(id);
    while let Some(node_id) = current {
        let node = tree.get_mut(node_id);
        node.visit_count += 1;
        node.value += rewards.reward(outcome, convention.last_moved(node.mover));
        current = node.parent;
    }
}

/// Mark to play from a node's state.
fn to_move_at<S>(tree: &Tree<S>, id: NodeId, convention: MoverConvention) -> Mark {
    convention.last_moved(tree.get(id).mover).opposite()
}

/// Recommended root child; the first one wins ties.
fn final_choice<S>(tree: &Tree<S>, selection: FinalSelection, c: f32) -> Option<NodeId> {
    let children = tree.children(NodeId::ROOT);
    let key = |id: NodeId| -> f32 {
        let node = tree.get(id);
        match selection {
            FinalSelection::Uct => uct::score(tree, id, c),
            FinalSelection::MostVisited => node.visit_count as f32,
            FinalSelection::HighestValue => node.value,
        }
    };

    let mut best: Option<(NodeId, f32)> = None;
    for &id in children {
        let k = key(id);
        match best {
            Some((_, best_key)) if k <= best_key => {}
            _ => best = Some((id, k)),
        }
    }
    best.map(|(id, _)| id)
}
