//! Board games the engine ships with.
//!
//! Other placement games plug in by implementing `tictac_core::Game`.

pub mod tictactoe;

pub use tictactoe::{Board, TicTacToe, LINES};
