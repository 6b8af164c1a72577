use blackjack_table::prelude::*;
use clap::Parser;
use env_logger::Env;
use log::error;
use std::convert::TryFrom;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Play blackjack at a single table with a Hi-Lo count and a strategy advisor at your side.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of decks in the shoe
    #[arg(long)]
    decks: Option<u32>,
    /// Rebuild the shoe when fewer cards than this remain
    #[arg(long)]
    threshold: Option<usize>,
    #[arg(long)]
    bankroll: Option<i64>,
    /// Bet used when the bet prompt is left empty
    #[arg(long)]
    bet: Option<u32>,
    /// Hands played each round
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    hands: u8,
    /// Single deck game, shuffled fresh every round
    #[arg(long)]
    console: bool,
    /// JSON table configuration, flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn table_config(&self) -> Result<TableConfig, SessionError> {
        let mut config = match (&self.config, self.console) {
            (Some(path), _) => TableConfig::from_json_file(path)?,
            (None, true) => TableConfig::console(),
            (None, false) => TableConfig::default(),
        };
        if let Some(decks) = self.decks {
            config.num_decks = decks;
        }
        if let Some(threshold) = self.threshold {
            config.reshuffle_threshold = threshold;
        }
        if let Some(bankroll) = self.bankroll {
            config.starting_bankroll = bankroll;
        }
        if let Some(bet) = self.bet {
            config.default_bet = bet;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

enum Command {
    Hit,
    Stand,
    Deal,
    Quit,
}

fn prompt(message: &str, input: &mut impl BufRead) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

fn read_command(index: usize, input: &mut impl BufRead) -> io::Result<Command> {
    loop {
        let line = match prompt(
            &format!("hand #{}: (h)it, (s)tand, (d)eal a new round, (q)uit > ", index + 1),
            input,
        )? {
            Some(line) => line,
            None => return Ok(Command::Quit),
        };
        match line.as_str() {
            "h" | "hit" => return Ok(Command::Hit),
            "s" | "stand" => return Ok(Command::Stand),
            "d" | "deal" => return Ok(Command::Deal),
            "q" | "quit" => return Ok(Command::Quit),
            other => println!("'{}' is not a command", other),
        }
    }
}

/// Asks for a bet until a valid one is given. `None` means the player wants to leave the table.
fn read_bet(game: &BlackjackGame, input: &mut impl BufRead) -> io::Result<Option<u32>> {
    let default_bet = game.config().default_bet;
    loop {
        let message = format!(
            "bankroll {}, bet (enter for {}, q to quit) > ",
            game.bankroll(),
            default_bet
        );
        let line = match prompt(&message, input)? {
            Some(line) if line == "q" => return Ok(None),
            Some(line) if line.is_empty() => default_bet.to_string(),
            Some(line) => line,
            None => return Ok(None),
        };
        match parse_bet(&line, game.bankroll()) {
            Ok(bet) => return Ok(Some(bet)),
            Err(e) => println!("{}", e),
        }
    }
}

fn print_advice(game: &BlackjackGame, index: usize) {
    if let Some(advice) = game.advice(index) {
        println!(
            "advisor: {} ({} count)",
            advice.strategy, advice.count_band.level
        );
    }
}

fn play(game: &mut BlackjackGame, hands: HandCount) -> Result<(), SessionError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    'rounds: while game.bankroll() > 0 {
        println!("{}", game.count_advice().guidance);
        let bet = match read_bet(game, &mut input)? {
            Some(bet) => bet,
            None => break,
        };
        let mut snapshot = game.start_round(bet, hands)?;
        println!("{}", snapshot);

        while !snapshot.round_over {
            let index = match snapshot.hands.iter().position(|h| h.active) {
                Some(index) => index,
                None => break,
            };
            print_advice(game, index);
            let result = match read_command(index, &mut input)? {
                Command::Hit => game.hit(index),
                Command::Stand => game.stand(index),
                Command::Deal => continue 'rounds,
                Command::Quit => break 'rounds,
            };
            match result {
                Ok(next) => {
                    snapshot = next;
                    println!("{}", snapshot);
                }
                Err(e) => println!("{}", e),
            }
        }
    }

    println!("leaving the table with {}", game.bankroll());
    Ok(())
}

fn run(args: Args) -> Result<(), SessionError> {
    let config = args.table_config()?;
    let hands = HandCount::try_from(args.hands).unwrap_or(HandCount::One);
    let mut game = BlackjackGame::new(config)?;
    play(&mut game, hands)
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
