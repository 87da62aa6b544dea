use crate::{Mark, Outcome, Result};
use std::fmt;

/// Rules for a two-player placement game.
///
/// Players alternately put their mark on an empty cell. The search engine
/// only ever talks to the board through this trait, so an N-in-a-row
/// variant needs nothing beyond its own `is_win` and cell layout.
pub trait Game: Clone + Send + Sync {
    /// The board state. Values are never mutated in place; `apply`
    /// returns a fresh state.
    type State: Clone + Send + PartialEq + fmt::Debug;

    /// Returns the empty starting board
    fn initial_state(&self) -> Self::State;

    /// Returns the indices of all empty cells in ascending order
    fn empty_positions(&self, state: &Self::State) -> Vec<usize>;

    /// Places `mark` on `index`, returning the new state.
    ///
    /// # Errors
    /// Fails if `index` is off the board or the cell is already occupied.
    fn apply(&self, state: &Self::State, index: usize, mark: Mark) -> Result<Self::State>;

    /// Returns true if `mark` has completed a line
    fn is_win(&self, mark: Mark, state: &Self::State) -> bool;

    /// Returns true if either mark has won or the board is full
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.is_win(Mark::O, state)
            || self.is_win(Mark::X, state)
            || self.empty_positions(state).is_empty()
    }

    /// Returns the outcome of a finished game, `None` while play continues.
    ///
    /// If both marks somehow hold a line, `O` is reported first.
    fn outcome(&self, state: &Self::State) -> Option<Outcome> {
        if self.is_win(Mark::O, state) {
            Some(Outcome::Win(Mark::O))
        } else if self.is_win(Mark::X, state) {
            Some(Outcome::Win(Mark::X))
        } else if self.empty_positions(state).is_empty() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }
}
