use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect_four_engine::ai::{Agent, MinimaxAgent, RandomAgent};
use connect_four_engine::config::EngineConfig;
use connect_four_engine::game::{GameOutcome, GameState, Player};
use connect_four_engine::service::{Engine, GameRequest};

/// Connect Four engine: win checks, legal moves and computer moves.
#[derive(Parser)]
#[command(name = "c4", about = "Connect Four decision engine")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "engine.toml", global = true)]
    config: PathBuf,

    /// Override search depth
    #[arg(long, global = true)]
    depth: Option<u32>,

    /// Search root moves in parallel
    #[arg(long, global = true)]
    parallel: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report the winner of a board: 1, -1 or 0
    CheckWin(RequestArgs),
    /// List the columns that can still take a disc
    ValidMoves(RequestArgs),
    /// Drop `player`'s disc into `column`
    UserMove(RequestArgs),
    /// Let the engine choose and play a column for `player` (default -1)
    ComputerMove(RequestArgs),
    /// Play a full game with the engine as Red
    Play {
        /// Who plays Yellow
        #[arg(long, value_enum, default_value = "random")]
        opponent: Opponent,

        /// Seed for the random opponent
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the default configuration as TOML
    DefaultConfig,
}

#[derive(Args)]
struct RequestArgs {
    /// JSON request file; read from stdin when absent
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Opponent {
    Random,
    Engine,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    if let Some(depth) = cli.depth {
        config.search.depth = depth;
    }
    if cli.parallel {
        config.search.parallel = true;
    }
    config.validate().context("validating overrides")?;

    let engine = Engine::from_config(&config);

    match cli.command {
        Command::CheckWin(args) => emit(&engine.check_win(&read_request(&args)?)?),
        Command::ValidMoves(args) => emit(&engine.valid_moves(&read_request(&args)?)?),
        Command::UserMove(args) => emit(&engine.user_move(&read_request(&args)?)?),
        Command::ComputerMove(args) => emit(&engine.computer_move(&read_request(&args)?)?),
        Command::Play { opponent, seed } => play(&config, opponent, seed),
        Command::DefaultConfig => {
            print!("{}", EngineConfig::default_toml().context("serializing defaults")?);
            Ok(())
        }
    }
}

fn read_request(args: &RequestArgs) -> Result<GameRequest> {
    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading request from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("decoding request JSON")
}

fn emit<T: Serialize>(response: &T) -> Result<()> {
    println!("{}", serde_json::to_string(response)?);
    Ok(())
}

fn play(config: &EngineConfig, opponent: Opponent, seed: Option<u64>) -> Result<()> {
    let board = config.board.empty_board().context("creating board")?;
    let mut state = GameState::from_board(board, Player::Red);

    let mut red = MinimaxAgent::new(config.search.clone());
    let mut yellow: Box<dyn Agent> = match opponent {
        Opponent::Random => Box::new(seed.map_or_else(RandomAgent::new, RandomAgent::with_seed)),
        Opponent::Engine => Box::new(MinimaxAgent::new(config.search.clone())),
    };

    let mut turn = 0;
    while !state.is_terminal() {
        let player = state.current_player();
        let agent: &mut dyn Agent = match player {
            Player::Red => &mut red,
            Player::Yellow => yellow.as_mut(),
        };
        let Some(column) = agent.select_action(&state) else {
            break;
        };
        state = state.apply_move(column)?;
        turn += 1;
        info!(turn, player = player.name(), agent = agent.name(), column, "move played");
    }

    print!("{}", state.board());
    match state.outcome() {
        Some(GameOutcome::Winner(player)) => println!("{} wins after {turn} moves", player.name()),
        Some(GameOutcome::Draw) => println!("Draw after {turn} moves"),
        None => println!("Stopped after {turn} moves"),
    }
    Ok(())
}
