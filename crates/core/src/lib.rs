//! tictac core - marks, outcomes and the game abstraction
//!
//! This crate provides the `Game` trait the search engine is written
//! against. A game is a grid of cells that two players fill with their
//! marks; the rules decide when a line is complete and when play stops.
//!
//! # Types
//!
//! - [`Game`] - Trait for pluggable board rules (win and terminal checks)
//! - [`Mark`] - One of the two player marks, `O` or `X`
//! - [`Outcome`] - Result of a finished game

mod error;
mod game;
mod types;

pub use error::{GameError, Result};
pub use game::Game;
pub use types::{Mark, Outcome};
