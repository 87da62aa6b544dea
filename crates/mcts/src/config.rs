//! MCTS configuration parameters.
//!
//! Several behaviours that earlier revisions of the engine disagreed on are
//! explicit settings here: the reward for draws, the exploration constant,
//! whether the last budgeted iteration runs, and what a node's mark means.

use serde::{Deserialize, Serialize};
use tictac_core::{Mark, Outcome};

/// Default iteration budget.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Default UCT exploration constant (close to √2).
pub const DEFAULT_EXPLORATION: f32 = 1.4;

/// How many loop bodies a budget buys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetMode {
    /// Iterations run from 1 up to, not including, the budget: `budget - 1`.
    Legacy,
    /// Exactly `budget` iterations.
    Exact,
}

impl BudgetMode {
    /// Effective number of iterations for a budget.
    pub fn iterations(self, budget: usize) -> usize {
        match self {
            BudgetMode::Legacy => budget.saturating_sub(1),
            BudgetMode::Exact => budget,
        }
    }
}

/// Meaning of the mark stored on each node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoverConvention {
    /// The node stores the mark whose move produced its state.
    LastMoved,
    /// The node stores the mark about to move from its state.
    ToMove,
}

impl MoverConvention {
    /// Mark stored on a node whose state was produced by `last_moved`.
    pub fn stored(self, last_moved: Mark) -> Mark {
        match self {
            MoverConvention::LastMoved => last_moved,
            MoverConvention::ToMove => last_moved.opposite(),
        }
    }

    /// Recover the mark that produced a node's state from its stored mark.
    pub fn last_moved(self, stored: Mark) -> Mark {
        match self {
            MoverConvention::LastMoved => stored,
            MoverConvention::ToMove => stored.opposite(),
        }
    }
}

/// How the recommended root child is chosen after the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalSelection {
    /// Highest UCT score, same formula as selection.
    Uct,
    /// Most visited child.
    MostVisited,
    /// Highest accumulated value.
    HighestValue,
}

/// Reward added to a node's value during backpropagation.
///
/// Rewards are credited to the mark that moved into the node: a win for
/// that mark adds `win`, a win for the opponent adds `loss`, and a draw adds
/// `draw_o` or `draw_x` depending on which mark it is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTable {
    pub win: f32,
    pub loss: f32,
    pub draw_o: f32,
    pub draw_x: f32,
}

impl RewardTable {
    /// +1 / -1, draws neutral.
    pub const fn symmetric() -> Self {
        Self {
            win: 1.0,
            loss: -1.0,
            draw_o: 0.0,
            draw_x: 0.0,
        }
    }

    /// +2 / -2, draws worth +1 to X only.
    pub const fn x_favoured_draws() -> Self {
        Self {
            win: 2.0,
            loss: -2.0,
            draw_o: 0.0,
            draw_x: 1.0,
        }
    }

    /// Reward for `outcome` seen from `mark`.
    pub fn reward(&self, outcome: Outcome, mark: Mark) -> f32 {
        match outcome {
            Outcome::Win(winner) if winner == mark => self.win,
            Outcome::Win(_) => self.loss,
            Outcome::Draw => match mark {
                Mark::O => self.draw_o,
                Mark::X => self.draw_x,
            },
        }
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self::symmetric()
    }
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Iteration budget per search.
    pub iterations: usize,

    /// UCT exploration constant C.
    pub exploration: f32,

    /// Whether the budget runs `budget - 1` or `budget` iterations.
    pub budget_mode: BudgetMode,

    /// Meaning of `Node::mover`.
    pub mover_convention: MoverConvention,

    /// Backpropagation rewards.
    pub rewards: RewardTable,

    /// Rule for the recommended move.
    pub final_selection: FinalSelection,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            exploration: DEFAULT_EXPLORATION,
            budget_mode: BudgetMode::Legacy,
            mover_convention: MoverConvention::LastMoved,
            rewards: RewardTable::symmetric(),
            final_selection: FinalSelection::Uct,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified iteration budget.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Settings of the draw-favouring revision: C = 2, ±2 for wins and
    /// losses, +1 to X for draws, recommend the highest-value child.
    pub fn legacy() -> Self {
        Self {
            exploration: 2.0,
            rewards: RewardTable::x_favoured_draws(),
            final_selection: FinalSelection::HighestValue,
            ..Default::default()
        }
    }

    /// Set the iteration budget.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the UCT exploration constant.
    pub fn with_exploration(mut self, c: f32) -> Self {
        self.exploration = c;
        self
    }

    /// Set the reward table.
    pub fn with_rewards(mut self, rewards: RewardTable) -> Self {
        self.rewards = rewards;
        self
    }

    /// Set how the budget maps to iterations.
    pub fn with_budget_mode(mut self, mode: BudgetMode) -> Self {
        self.budget_mode = mode;
        self
    }

    /// Set the node mark convention.
    pub fn with_mover_convention(mut self, convention: MoverConvention) -> Self {
        self.mover_convention = convention;
        self
    }

    /// Set how the recommended child is picked.
    pub fn with_final_selection(mut self, selection: FinalSelection) -> Self {
        self.final_selection = selection;
        self
    }

    /// Number of loop bodies this configuration runs.
    pub fn effective_iterations(&self) -> usize {
        self.budget_mode.iterations(self.iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.iterations, 1000);
        assert!((config.exploration - 1.4).abs() < 1e-6);
        assert_eq!(config.budget_mode, BudgetMode::Legacy);
        assert_eq!(config.mover_convention, MoverConvention::LastMoved);
        assert_eq!(config.rewards, RewardTable::symmetric());
        assert_eq!(config.final_selection, FinalSelection::Uct);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .iterations(50)
            .with_exploration(0.5)
            .with_budget_mode(BudgetMode::Exact)
            .with_mover_convention(MoverConvention::ToMove)
            .with_rewards(RewardTable::x_favoured_draws())
            .with_final_selection(FinalSelection::MostVisited);

        assert_eq!(config.iterations, 50);
        assert_eq!(config.exploration, 0.5);
        assert_eq!(config.effective_iterations(), 50);
        assert_eq!(config.mover_convention, MoverConvention::ToMove);
        assert_eq!(config.rewards.draw_x, 1.0);
        assert_eq!(config.final_selection, FinalSelection::MostVisited);
    }

    #[test]
    fn test_legacy_budget_runs_one_short() {
        assert_eq!(BudgetMode::Legacy.iterations(1000), 999);
        assert_eq!(BudgetMode::Legacy.iterations(1), 0);
        assert_eq!(BudgetMode::Legacy.iterations(0), 0);
        assert_eq!(BudgetMode::Exact.iterations(7), 7);
        assert_eq!(MctsConfig::with_iterations(10).effective_iterations(), 9);
    }

    #[test]
    fn test_legacy_preset() {
        let config = MctsConfig::legacy();
        assert_eq!(config.exploration, 2.0);
        assert_eq!(config.rewards, RewardTable::x_favoured_draws());
        assert_eq!(config.final_selection, FinalSelection::HighestValue);
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
    }

    #[test]
    fn test_rewards() {
        let table = RewardTable::symmetric();
        assert_eq!(table.reward(Outcome::Win(Mark::X), Mark::X), 1.0);
        assert_eq!(table.reward(Outcome::Win(Mark::X), Mark::O), -1.0);
        assert_eq!(table.reward(Outcome::Draw, Mark::O), 0.0);

        let table = RewardTable::x_favoured_draws();
        assert_eq!(table.reward(Outcome::Win(Mark::O), Mark::O), 2.0);
        assert_eq!(table.reward(Outcome::Win(Mark::O), Mark::X), -2.0);
        assert_eq!(table.reward(Outcome::Draw, Mark::X), 1.0);
        assert_eq!(table.reward(Outcome::Draw, Mark::O), 0.0);
    }

    #[test]
    fn test_mover_convention() {
        let last = MoverConvention::LastMoved;
        let to_move = MoverConvention::ToMove;

        assert_eq!(last.stored(Mark::X), Mark::X);
        assert_eq!(to_move.stored(Mark::X), Mark::O);
        for mark in [Mark::O, Mark::X] {
            assert_eq!(last.last_moved(last.stored(mark)), mark);
            assert_eq!(to_move.last_moved(to_move.stored(mark)), mark);
        }
    }
}
