//! Playing-strength and boundary tests on real tic-tac-toe positions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tictac_core::{Game, Mark, Outcome};
use tictac_mcts::{
    games::{Board, TicTacToe},
    FinalSelection, Mcts, MctsConfig, MctsError, RandomRollout,
};

fn create_mcts(seed: u64, config: MctsConfig) -> Mcts<TicTacToe, RandomRollout<ChaCha8Rng>> {
    Mcts::new(config, RandomRollout::new(ChaCha8Rng::seed_from_u64(seed)))
}

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

/// X takes the open end of its top row.
#[test]
fn test_finds_winning_move() {
    let mut mcts = create_mcts(42, MctsConfig::with_iterations(3000));
    let next = mcts.run(&TicTacToe, &board("XX-OO----"), Mark::X).unwrap();
    assert_eq!(next.get(2), Some(Mark::X), "got\n{}", next.pretty());
}

/// O must take cell 1 between X's corners.
#[test]
fn test_blocks_open_threat() {
    let mut mcts = create_mcts(42, MctsConfig::with_iterations(3000));
    let next = mcts.run(&TicTacToe, &board("X-X-O----"), Mark::O).unwrap();
    assert_eq!(next.get(1), Some(Mark::O), "got\n{}", next.pretty());
}

/// From `OO-------` only cell 2 delays the loss.
///
/// O wins this position by force (it forks on its next move), so every
/// child drifts towards the same losing value and the final UCT scores
/// level out. Visit counts still separate the block from the rest.
#[test]
fn test_blocks_in_lost_position() {
    let config = MctsConfig::with_iterations(5000).with_final_selection(FinalSelection::MostVisited);
    let mut mcts = create_mcts(7, config);
    let next = mcts.run(&TicTacToe, &board("OO-------"), Mark::X).unwrap();
    assert_eq!(next, board("OOX------"));
}

#[test]
fn test_terminal_input_rejected() {
    let mut mcts = create_mcts(1, MctsConfig::with_iterations(1000));
    assert_eq!(
        mcts.run(&TicTacToe, &board("OOOXX----"), Mark::X),
        Err(MctsError::NoLegalMove)
    );
    // O already holds the anti-diagonal 2-4-6
    assert_eq!(
        mcts.run(&TicTacToe, &board("OXOXOXOX-"), Mark::X),
        Err(MctsError::NoLegalMove)
    );
    assert_eq!(
        mcts.run(&TicTacToe, &board("XOXXOOOXX"), Mark::O),
        Err(MctsError::NoLegalMove)
    );
}

#[test]
fn test_zero_budget_rejected() {
    let mut mcts = create_mcts(1, MctsConfig::with_iterations(0));
    assert_eq!(
        mcts.run(&TicTacToe, &Board::new(), Mark::X),
        Err(MctsError::InvalidBudget(0))
    );
}

#[test]
fn test_last_cell_draw() {
    let mut mcts = create_mcts(3, MctsConfig::with_iterations(2));
    let next = mcts.run(&TicTacToe, &board("XOXXOOOX-"), Mark::X).unwrap();

    assert_eq!(next, board("XOXXOOOXX"));
    assert!(TicTacToe.is_terminal(&next));
    assert_eq!(TicTacToe.outcome(&next), Some(Outcome::Draw));
}

#[test]
fn test_last_cell_win() {
    let mut mcts = create_mcts(3, MctsConfig::with_iterations(10));
    let next = mcts.run(&TicTacToe, &board("XOXOXOOX-"), Mark::X).unwrap();

    assert_eq!(next, board("XOXOXOOXX"));
    assert_eq!(TicTacToe.outcome(&next), Some(Outcome::Win(Mark::X)));
}

/// Plays one game; `engine` decides which mark the engine plays.
fn play_vs_random(seed: u64, engine: Mark, iterations: usize) -> Board {
    let game = TicTacToe;
    let mut mcts = create_mcts(seed, MctsConfig::with_iterations(iterations));
    let mut rng = ChaCha8Rng::seed_from_u64(seed + 1000);

    let mut state = game.initial_state();
    let mut mover = Mark::X;
    while !game.is_terminal(&state) {
        state = if mover == engine {
            mcts.run(&game, &state, mover).unwrap()
        } else {
            let empty = game.empty_positions(&state);
            let index = empty[rng.gen_range(0..empty.len())];
            game.apply(&state, index, mover).unwrap()
        };
        mover = mover.opposite();
    }
    state
}

#[test]
fn test_never_loses_to_random_as_x() {
    for seed in 0..10 {
        let state = play_vs_random(seed, Mark::X, 2000);
        assert_ne!(
            TicTacToe.outcome(&state),
            Some(Outcome::Win(Mark::O)),
            "engine (X) lost with seed {}:\n{}",
            seed,
            state.pretty()
        );
    }
}

#[test]
fn test_never_loses_to_random_as_o() {
    for seed in 0..10 {
        let state = play_vs_random(seed, Mark::O, 2000);
        assert_ne!(
            TicTacToe.outcome(&state),
            Some(Outcome::Win(Mark::X)),
            "engine (O) lost with seed {}:\n{}",
            seed,
            state.pretty()
        );
    }
}

/// Two engines ranking moves by visits should always draw.
#[test]
fn test_engine_vs_engine_draws() {
    let game = TicTacToe;
    let config = MctsConfig::with_iterations(3000).with_final_selection(FinalSelection::MostVisited);

    for seed in 0..5 {
        let mut mcts_x = create_mcts(seed, config.clone());
        let mut mcts_o = create_mcts(seed + 500, config.clone());

        let mut state = game.initial_state();
        let mut mover = Mark::X;
        while !game.is_terminal(&state) {
            let engine = if mover == Mark::X { &mut mcts_x } else { &mut mcts_o };
            state = engine.run(&game, &state, mover).unwrap();
            mover = mover.opposite();
        }

        assert_eq!(
            game.outcome(&state),
            Some(Outcome::Draw),
            "seed {} ended:\n{}",
            seed,
            state.pretty()
        );
    }
}

#[test]
fn test_same_seed_same_game() {
    let play = |seed: u64| -> Vec<Board> {
        let mut mcts = create_mcts(seed, MctsConfig::with_iterations(200));
        let mut state = Board::new();
        let mut mover = Mark::X;
        let mut history = Vec::new();
        while !TicTacToe.is_terminal(&state) {
            state = mcts.run(&TicTacToe, &state, mover).unwrap();
            history.push(state);
            mover = mover.opposite();
        }
        history
    };

    assert_eq!(play(12345), play(12345));
}
