//! Random rollout policy.
//!
//! The `Evaluator` trait is the seam between the tree search and the way a
//! leaf is scored. `RandomRollout` plays uniformly random moves until the
//! game ends; the random source is injected so runs can be seeded.

use rand::Rng;
use std::cell::RefCell;
use tictac_core::{Game, Mark, Outcome};

/// Source of uniform indices.
pub trait RandomSource {
    /// Uniform index in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// Uniform choice among `positions`.
///
/// # Panics
/// Panics if `positions` is empty.
pub fn pick_random<R: RandomSource + ?Sized>(positions: &[usize], rng: &mut R) -> usize {
    positions[rng.next_index(positions.len())]
}

/// Trait for scoring a leaf state.
pub trait Evaluator<G: Game> {
    /// Play out `state` with `to_move` moving first and report how it ends.
    fn evaluate(&self, game: &G, state: &G::State, to_move: Mark) -> Outcome;
}

impl<G: Game, E: Evaluator<G> + ?Sized> Evaluator<G> for &E {
    fn evaluate(&self, game: &G, state: &G::State, to_move: Mark) -> Outcome {
        (**self).evaluate(game, state, to_move)
    }
}

/// Evaluator playing uniformly random legal moves to the end of the game.
pub struct RandomRollout<R: RandomSource> {
    /// Random source (wrapped in RefCell for interior mutability).
    rng: RefCell<R>,
}

impl<R: RandomSource> RandomRollout<R> {
    /// Create a new rollout evaluator.
    pub fn new(rng: R) -> Self {
        Self {
            rng: RefCell::new(rng),
        }
    }

    /// Give back the random source.
    pub fn into_inner(self) -> R {
        self.rng.into_inner()
    }

    /// Perform a random playout on a scratch copy of `initial_state`.
    fn rollout<G: Game>(&self, game: &G, initial_state: &G::State, to_move: Mark) -> Outcome {
        let mut state = initial_state.clone();
        let mut mover = to_move;
        let mut rng = self.rng.borrow_mut();

        loop {
            if let Some(outcome) = game.outcome(&state) {
                return outcome;
            }
            let empty = game.empty_positions(&state);
            let index = pick_random(&empty, &mut *rng);
            state = game
                .apply(&state, index, mover)
                .expect("BUG: rollout picked a cell outside the empty set");
            mover = mover.opposite();
        }
    }
}

impl<G: Game, R: RandomSource> Evaluator<G> for RandomRollout<R> {
    fn evaluate(&self, game: &G, state: &G::State, to_move: Mark) -> Outcome {
        self.rollout(game, state, to_move)
    }
}
