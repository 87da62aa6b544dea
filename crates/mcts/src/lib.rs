//! Monte Carlo Tree Search with UCT selection.
//!
//! This crate provides an MCTS engine for two-player placement games
//! implementing the `tictac_core::Game` trait, with tic-tac-toe built in.
//!
//! Each iteration runs four phases:
//!
//! 1. **Selection**: descend by highest UCT score until a leaf
//! 2. **Expansion**: add one child per empty cell (a first visit is
//!    simulated without expanding)
//! 3. **Rollout**: random playout to the end of the game
//! 4. **Backpropagation**: update visits and rewards up to the root
//!
//! # Example
//!
//! ```
//! use tictac_mcts::{games::{Board, TicTacToe}, Mcts, MctsConfig, RandomRollout};
//! use tictac_core::Mark;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let board: Board = "OO-------".parse().unwrap();
//! let config = MctsConfig::with_iterations(2000);
//! let rollout = RandomRollout::new(ChaCha8Rng::seed_from_u64(42));
//! let mut mcts = Mcts::new(config, rollout);
//!
//! let next = mcts.run(&TicTacToe, &board, Mark::X).unwrap();
//! assert_eq!(next.count(Mark::X), 1);
//! assert_eq!(next.empty_positions().len(), 6);
//! ```

pub mod config;
mod error;
pub mod games;
mod node;
pub mod rollout;
pub mod search;
mod tree;
pub mod uct;

pub use config::{BudgetMode, FinalSelection, MctsConfig, MoverConvention, RewardTable};
pub use error::{MctsError, Result};
pub use node::{Node, NodeId};
pub use rollout::{pick_random, Evaluator, RandomRollout, RandomSource};
pub use search::{ChildStats, Mcts, SearchResult};
pub use tree::Tree;
