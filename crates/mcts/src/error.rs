use thiserror::Error;
use tictac_core::GameError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MctsError {
    #[error("Iteration budget must be positive, got {0}")]
    InvalidBudget(usize),

    #[error("No legal move: the position is terminal or the search produced no children")]
    NoLegalMove,

    #[error("Board error: {0}")]
    Game(#[from] GameError),
}

pub type Result<T> = std::result::Result<T, MctsError>;
