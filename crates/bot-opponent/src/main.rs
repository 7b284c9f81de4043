//! Bot Opponent - picks a move for a position from the command line.
//!
//! Loads a position from FEN plus an optional list of UCI moves, runs the
//! opponent on the blocking pool and prints the decision as text or JSON.

use anyhow::Context;
use chess_opponent::{mate_distance, Opponent, OpponentPool, SearchConfig, SearchResult};
use chess_rules::Board;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Bot Opponent - chooses a move with alpha-beta search.
#[derive(Parser)]
#[command(name = "bot-opponent")]
#[command(about = "Chooses a chess move with alpha-beta search")]
struct Args {
    /// Starting position in FEN (defaults to the standard start)
    #[arg(long)]
    fen: Option<String>,

    /// UCI moves to play from the starting position
    #[arg(long, num_args = 1..)]
    moves: Vec<String>,

    /// Search configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search exactly this many plies instead of choosing a depth
    #[arg(long)]
    depth: Option<u32>,

    /// Give up waiting for the search after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn load_board(args: &Args) -> anyhow::Result<Board> {
    let mut board = match &args.fen {
        Some(fen) => Board::from_fen(fen).with_context(|| format!("invalid FEN: {fen}"))?,
        None => Board::startpos(),
    };
    for uci in &args.moves {
        board
            .play_uci(uci)
            .with_context(|| format!("cannot play {uci} in {}", board.to_fen()))?;
    }
    Ok(board)
}

fn load_config(args: &Args) -> anyhow::Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(depth) = args.depth {
        config = config.with_fixed_depth(depth);
    }
    config.validate()?;
    Ok(config)
}

fn print_text(board: &Board, result: Option<&SearchResult>) {
    match result {
        Some(r) => {
            let score = match mate_distance(r.score) {
                Some(plies) if r.score > 0 => format!("mate +{plies}"),
                Some(plies) => format!("mate -{plies}"),
                None => r.score.to_string(),
            };
            println!(
                "bestmove {} score {} depth {} nodes {} ({:?})",
                r.best_move, score, r.depth, r.nodes, r.selection
            );
        }
        None if board.is_checkmate() => println!("bestmove (none) checkmate"),
        None if board.is_stalemate() => println!("bestmove (none) stalemate"),
        None => println!("bestmove (none)"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let board = load_board(&args)?;
    let config = load_config(&args)?;
    tracing::info!("Position: {}", board.to_fen());
    tracing::debug!("Config: {:?}", config);

    let mut pool = OpponentPool::new(Opponent::new(config), 1);
    if let Some(ms) = args.timeout_ms {
        pool = pool.with_timeout(Duration::from_millis(ms));
    }
    let result = pool.select_move(board.clone()).await?;

    if args.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        print_text(&board, result.as_ref());
    }
    Ok(())
}
