use thiserror::Error;

/// Errors raised by board rules and board parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index {index} is outside the board")]
    OutOfRange { index: usize },

    #[error("Cell {index} is already occupied")]
    Occupied { index: usize },

    #[error("Invalid board: {0}")]
    InvalidBoard(String),
}

/// Convenience Result type for board operations
pub type Result<T> = std::result::Result<T, GameError>;
