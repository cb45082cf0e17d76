//! Terminal omok client.
//!
//! Plays against an in-memory shared store, so both seats are taken from the
//! same terminal by switching identity with `as <name>`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin omok -- --player alice
//! cargo run --bin omok -- -p alice --seed 7 --log-level debug
//! ```

use std::sync::Arc;

use clap::Parser;

use omok_client::repl::{GameClient, ReplSession, run_repl};
use omok_core::{
    domain::{GameStore, PlayerId, RoomIdAllocator},
    infrastructure::InMemoryGameStore,
};
use omok_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "omok")]
#[command(about = "Five-in-a-row played through a shared document store", long_about = None)]
struct Args {
    /// Initial player identity (defaults to a random id)
    #[arg(short = 'p', long)]
    player: Option<String>,

    /// Default log level when RUST_LOG is not set
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,

    /// Seed for room identifier allocation
    #[arg(short = 's', long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let player = match args.player {
        Some(name) => match PlayerId::new(name) {
            Ok(player) => player,
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => PlayerId::generate(),
    };

    let store: Arc<dyn GameStore> = Arc::new(InMemoryGameStore::new());
    let allocator = match args.seed {
        Some(seed) => RoomIdAllocator::with_seed(store.clone(), seed),
        None => RoomIdAllocator::new(store.clone()),
    };
    let client = GameClient::new(store, allocator, Arc::new(SystemClock));

    if let Err(e) = run_repl(ReplSession::new(client, player)).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
