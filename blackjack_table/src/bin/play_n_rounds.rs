use blackjack_table::prelude::*;
use blackjack_table::write::{write_summary, write_summary_json};
use clap::Parser;
use env_logger::Env;
use log::{debug, error, info};
use std::convert::TryFrom;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Plays a number of rounds automatically, following the advisor on every hand.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of rounds to play
    rounds: u32,
    /// Bet per hand, defaults to the table's default bet
    #[arg(long)]
    bet: Option<u32>,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    hands: u8,
    #[arg(long)]
    decks: Option<u32>,
    #[arg(long)]
    threshold: Option<usize>,
    #[arg(long)]
    bankroll: Option<i64>,
    /// Seed for the shoe, a random one is picked and reported when missing
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    console: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
    /// Write the summary to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn table_config(args: &Args) -> Result<TableConfig, SessionError> {
    let mut config = match (&args.config, args.console) {
        (Some(path), _) => TableConfig::from_json_file(path)?,
        (None, true) => TableConfig::console(),
        (None, false) => TableConfig::default(),
    };
    if let Some(decks) = args.decks {
        config.num_decks = decks;
    }
    if let Some(threshold) = args.threshold {
        config.reshuffle_threshold = threshold;
    }
    if let Some(bankroll) = args.bankroll {
        config.starting_bankroll = bankroll;
    }
    if let Some(bet) = args.bet {
        config.default_bet = bet;
    }
    config.seed = Some(args.seed.or(config.seed).unwrap_or_else(rand::random));
    Ok(config)
}

/// Plays one round to the end, taking the advisor's recommendation for each hand in turn.
fn play_round(
    game: &mut BlackjackGame,
    bet: u32,
    hands: HandCount,
) -> Result<RoundSnapshot, SessionError> {
    let mut snapshot = game.start_round(bet, hands)?;
    while !snapshot.round_over {
        let index = match snapshot.hands.iter().position(|h| h.active) {
            Some(index) => index,
            None => break,
        };
        let decision = game
            .advice(index)
            .map(|a| a.strategy)
            .unwrap_or(Decision::Stand);
        debug!(
            "hand #{} at {}: advisor says {}",
            index + 1,
            snapshot.hands[index].value,
            decision
        );
        snapshot = match decision {
            Decision::Hit => game.hit(index)?,
            Decision::Stand => game.stand(index)?,
        };
    }
    Ok(snapshot)
}

fn run(args: Args) -> Result<(), SessionError> {
    let config = table_config(&args)?;
    let hands = HandCount::try_from(args.hands).unwrap_or(HandCount::One);
    let mut game = BlackjackGame::new(config)?;
    let mut summary = SessionSummary::new(game.bankroll());
    let seed = config.seed.unwrap_or_default();
    info!("playing {} rounds with seed {}", args.rounds, seed);

    for _ in 0..args.rounds {
        if game.bankroll() < 1 {
            info!("bankroll exhausted after {} rounds", summary.rounds);
            break;
        }
        let bet = (config.default_bet as i64).min(game.bankroll()) as u32;
        let snapshot = play_round(&mut game, bet, hands)?;
        summary.record(&snapshot);
    }

    let label = format!("{} rounds, seed {}", summary.rounds, seed);
    match (&args.out, args.json) {
        (Some(path), true) => write_summary_json(&summary, BufWriter::new(File::create(path)?))?,
        (Some(path), false) => write_summary(&label, &summary, BufWriter::new(File::create(path)?))?,
        (None, true) => write_summary_json(&summary, std::io::stdout())?,
        (None, false) => write_summary(&label, &summary, std::io::stdout())?,
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
