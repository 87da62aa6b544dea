//! Command-line driver for the tictac UCT engine.
//!
//! `suggest` answers a single position, the way an interactive front end
//! would call the engine. `arena` plays whole games against a random or a
//! second engine opponent, in parallel, and reports the results.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tictac_core::{Game, Mark, Outcome};
use tictac_mcts::{
    games::{Board, TicTacToe},
    FinalSelection, Mcts, MctsConfig, RandomRollout,
};
use tracing::{debug, info};

/// UCT tic-tac-toe engine.
#[derive(Parser)]
#[command(name = "tictac")]
#[command(about = "Monte Carlo Tree Search tic-tac-toe engine")]
struct Cli {
    /// Log search summaries (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that builds an engine.
#[derive(clap::Args, Clone, Debug)]
struct EngineArgs {
    /// TOML file with an [mcts] table.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Iteration budget per move.
    #[arg(short, long)]
    iterations: Option<usize>,

    /// UCT exploration constant.
    #[arg(long)]
    exploration: Option<f32>,

    /// How the engine picks its move once the budget is spent.
    #[arg(long, value_enum)]
    pick: Option<Pick>,

    /// Start from the draw-favouring legacy settings.
    #[arg(long)]
    legacy: bool,

    /// Random seed for reproducibility.
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the engine's move for one position.
    Suggest {
        /// Board in row-major order over '-', 'O', 'X', e.g. "OO-------".
        #[arg(short, long)]
        board: Board,

        /// Mark to play. Inferred from the mark counts when omitted.
        #[arg(short, long)]
        to_move: Option<Mark>,

        /// Also print the board as a grid.
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Play engine games and report the results.
    Arena {
        /// Number of games to play.
        #[arg(short, long, default_value = "20")]
        games: usize,

        /// Who the engine plays against.
        #[arg(long, value_enum, default_value = "random")]
        opponent: Opponent,

        /// Write game records as JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Pick {
    Uct,
    Visits,
    Value,
}

impl From<Pick> for FinalSelection {
    fn from(pick: Pick) -> Self {
        match pick {
            Pick::Uct => FinalSelection::Uct,
            Pick::Visits => FinalSelection::MostVisited,
            Pick::Value => FinalSelection::HighestValue,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Opponent {
    Random,
    Mcts,
}

/// Layout of the `--config` file.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct FileConfig {
    mcts: MctsConfig,
}

/// A finished arena game.
#[derive(Serialize, Deserialize, Debug)]
struct GameRecord {
    seed: u64,

    /// Mark the engine played.
    engine: Mark,

    opponent: Opponent,

    /// Cells in the order they were filled.
    moves: Vec<usize>,

    /// Final board in text form.
    board: String,

    outcome: Outcome,
}

impl GameRecord {
    fn engine_won(&self) -> bool {
        self.outcome == Outcome::Win(self.engine)
    }

    fn engine_lost(&self) -> bool {
        self.outcome == Outcome::Win(self.engine.opposite())
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_file_config(text: &str) -> Result<MctsConfig> {
    let file: FileConfig = toml::from_str(text).context("Failed to parse config")?;
    Ok(file.mcts)
}

fn load_file_config(path: &Path) -> Result<MctsConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    parse_file_config(&text).with_context(|| format!("Invalid config file: {:?}", path))
}

/// Build the engine configuration: preset or file first, flags on top.
fn resolve_config(args: &EngineArgs) -> Result<MctsConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_file_config(path)?
        }
        None if args.legacy => MctsConfig::legacy(),
        None => MctsConfig::default(),
    };

    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(c) = args.exploration {
        config.exploration = c;
    }
    if let Some(pick) = args.pick {
        config.final_selection = pick.into();
    }

    if config.iterations == 0 {
        bail!("--iterations must be positive");
    }
    debug!(?config, "Engine configuration");
    Ok(config)
}

/// Mark to play when the caller did not say: the side that is behind.
fn infer_to_move(board: &Board) -> Mark {
    if board.count(Mark::X) > board.count(Mark::O) {
        Mark::O
    } else {
        Mark::X
    }
}

fn engine(config: &MctsConfig, seed: u64) -> Mcts<TicTacToe, RandomRollout<ChaCha8Rng>> {
    Mcts::new(
        config.clone(),
        RandomRollout::new(ChaCha8Rng::seed_from_u64(seed)),
    )
}

fn cmd_suggest(board: Board, to_move: Option<Mark>, pretty: bool, args: &EngineArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let to_move = to_move.unwrap_or_else(|| infer_to_move(&board));
    let mut mcts = engine(&config, args.seed);

    let result = mcts
        .search(&TicTacToe, &board, to_move)
        .with_context(|| format!("No move for {} on {}", to_move, board))?;

    info!(
        best_move = result.best_move,
        iterations = result.iterations,
        tree_size = result.tree_size,
        "{} to move",
        to_move
    );
    for child in &result.children {
        debug!(
            action = child.action,
            visits = child.visits,
            value = child.value,
            score = child.score,
            "Root child"
        );
    }

    println!("{}", result.best_state);
    if pretty {
        print!("{}", result.best_state.pretty());
    }
    Ok(())
}

/// Play one arena game. The engine plays `engine_mark`; X opens.
fn play_game(
    config: &MctsConfig,
    opponent: Opponent,
    engine_mark: Mark,
    seed: u64,
) -> Result<GameRecord> {
    let game = TicTacToe;
    let mut player = engine(config, seed);
    let mut rival = engine(config, seed.wrapping_add(500));
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1000));

    let mut state = game.initial_state();
    let mut mover = Mark::X;
    let mut moves = Vec::new();

    while !game.is_terminal(&state) {
        let index = if mover == engine_mark || opponent == Opponent::Mcts {
            let mcts = if mover == engine_mark { &mut player } else { &mut rival };
            mcts.search(&game, &state, mover)
                .with_context(|| format!("Search failed for {} on {}", mover, state))?
                .best_move
        } else {
            let empty = game.empty_positions(&state);
            empty[rng.gen_range(0..empty.len())]
        };

        state = game.apply(&state, index, mover)?;
        moves.push(index);
        mover = mover.opposite();
    }

    let outcome = game
        .outcome(&state)
        .expect("BUG: finished game without an outcome");
    debug!(seed, %engine_mark, %outcome, board = %state, "Arena game finished");

    Ok(GameRecord {
        seed,
        engine: engine_mark,
        opponent,
        moves,
        board: state.to_string(),
        outcome,
    })
}

fn cmd_arena(
    games: usize,
    opponent: Opponent,
    output: Option<PathBuf>,
    args: &EngineArgs,
) -> Result<()> {
    let config = resolve_config(args)?;
    println!(
        "Playing {} games: engine ({} iterations) vs {:?}",
        games, config.iterations, opponent
    );

    let start = Instant::now();

    // Alternate marks for fairness
    let records = (0..games)
        .into_par_iter()
        .map(|i| {
            let engine_mark = if i % 2 == 0 { Mark::X } else { Mark::O };
            let seed = args.seed.wrapping_add(i as u64 * 1000);
            play_game(&config, opponent, engine_mark, seed)
        })
        .collect::<Result<Vec<_>>>()?;

    let elapsed = start.elapsed();
    let wins = records.iter().filter(|r| r.engine_won()).count();
    let losses = records.iter().filter(|r| r.engine_lost()).count();
    let draws = games - wins - losses;
    let pct = |n: usize| n as f32 / games.max(1) as f32 * 100.0;

    println!("\nCompleted in {:.2}s", elapsed.as_secs_f64());
    println!("Engine wins:   {} ({:.1}%)", wins, pct(wins));
    println!("Engine losses: {} ({:.1}%)", losses, pct(losses));
    println!("Draws:         {} ({:.1}%)", draws, pct(draws));

    if let Some(path) = output {
        let file =
            File::create(&path).with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &records)
            .with_context(|| format!("Failed to write game records to {:?}", path))?;
        println!("Records saved to: {:?}", path);
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Suggest {
            board,
            to_move,
            pretty,
            engine,
        } => cmd_suggest(board, to_move, pretty, &engine),

        Commands::Arena {
            games,
            opponent,
            output,
            engine,
        } => cmd_arena(games, opponent, output, &engine),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictac_mcts::{BudgetMode, RewardTable};

    fn engine_args() -> EngineArgs {
        EngineArgs {
            config: None,
            iterations: None,
            exploration: None,
            pick: None,
            legacy: false,
            seed: 42,
        }
    }

    #[test]
    fn test_cli_parses_suggest() {
        let cli = Cli::try_parse_from([
            "tictac", "suggest", "--board", "OO-------", "--to-move", "X", "-i", "500",
        ])
        .unwrap();

        match cli.command {
            Commands::Suggest { board, to_move, engine, .. } => {
                assert_eq!(board.to_string(), "OO-------");
                assert_eq!(to_move, Some(Mark::X));
                assert_eq!(engine.iterations, Some(500));
            }
            _ => panic!("expected suggest"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_board() {
        assert!(Cli::try_parse_from(["tictac", "suggest", "--board", "OO-"]).is_err());
    }

    #[test]
    fn test_parse_file_config() {
        let config = parse_file_config(
            r#"
            [mcts]
            iterations = 250
            exploration = 2.0
            budget_mode = "exact"
            final_selection = "most_visited"

            [mcts.rewards]
            win = 2.0
            loss = -2.0
            draw_x = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(config.iterations, 250);
        assert_eq!(config.exploration, 2.0);
        assert_eq!(config.budget_mode, BudgetMode::Exact);
        assert_eq!(config.final_selection, FinalSelection::MostVisited);
        assert_eq!(config.rewards, RewardTable::x_favoured_draws());
    }

    #[test]
    fn test_empty_file_config_is_default() {
        assert_eq!(parse_file_config("").unwrap(), MctsConfig::default());
        assert!(parse_file_config("[mcts]\niterations = \"many\"").is_err());
    }

    #[test]
    fn test_flags_override_preset() {
        let mut args = engine_args();
        args.legacy = true;
        args.iterations = Some(77);
        args.pick = Some(Pick::Visits);

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.iterations, 77);
        assert_eq!(config.exploration, 2.0);
        assert_eq!(config.final_selection, FinalSelection::MostVisited);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut args = engine_args();
        args.iterations = Some(0);
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_infer_to_move() {
        assert_eq!(infer_to_move(&Board::new()), Mark::X);
        assert_eq!(infer_to_move(&"X--------".parse().unwrap()), Mark::O);
        assert_eq!(infer_to_move(&"OO-------".parse().unwrap()), Mark::X);
    }

    #[test]
    fn test_play_game_records_full_game() {
        let config = MctsConfig::with_iterations(200);
        let record = play_game(&config, Opponent::Random, Mark::O, 42).unwrap();

        let board: Board = record.board.parse().unwrap();
        assert!(TicTacToe.is_terminal(&board));
        assert_eq!(TicTacToe.outcome(&board), Some(record.outcome));
        assert_eq!(record.moves.len(), 9 - board.empty_positions().len());
        assert_eq!(board.get(record.moves[0]), Some(Mark::X));
    }

    #[test]
    fn test_play_game_engine_vs_engine() {
        let config = MctsConfig::with_iterations(100);
        let a = play_game(&config, Opponent::Mcts, Mark::X, 7).unwrap();
        let b = play_game(&config, Opponent::Mcts, Mark::X, 7).unwrap();
        assert_eq!(a.moves, b.moves);
    }

    #[test]
    fn test_record_json_roundtrip() {
        let record = play_game(&MctsConfig::with_iterations(50), Opponent::Random, Mark::X, 1).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: GameRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.moves, record.moves);
        assert_eq!(back.outcome, record.outcome);
    }
}
