pub mod config;
pub mod game;
pub mod write;

pub use config::{CountReset, TableConfig, TableConfigBuilder};
pub use game::prelude::*;
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

pub mod prelude {
    pub use super::{
        config::{CountReset, TableConfig, TableConfigBuilder},
        game::prelude::*,
        SessionError, SessionSummary,
    };
}

/// Errors of a whole playing session: loading the configuration, or a rejected action at the table.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Game(#[from] BlackjackGameError),
}

/// Simple struct for recording the results of every hand played during a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub rounds: u32,
    pub wins: u32,
    pub pushes: u32,
    pub losses: u32,
    pub busts: u32,
    pub all_busted_rounds: u32,
    pub starting_bankroll: i64,
    pub final_bankroll: i64,
}

impl SessionSummary {
    pub fn new(starting_bankroll: i64) -> Self {
        SessionSummary {
            starting_bankroll,
            final_bankroll: starting_bankroll,
            ..Default::default()
        }
    }

    /// Adds the hands of a finished round to the totals. Rounds that are still open are ignored.
    pub fn record(&mut self, snapshot: &RoundSnapshot) {
        if !snapshot.round_over || snapshot.outcome.is_none() {
            return;
        }
        self.rounds += 1;
        for hand in snapshot.hands.iter() {
            match hand.outcome {
                Some(HandOutcome::Win) => self.wins += 1,
                Some(HandOutcome::Push) => self.pushes += 1,
                Some(HandOutcome::Loss) => self.losses += 1,
                Some(HandOutcome::Bust) => self.busts += 1,
                None => {}
            }
        }
        if snapshot.outcome == Some(RoundOutcome::AllBusted) {
            self.all_busted_rounds += 1;
        }
        self.final_bankroll = snapshot.bankroll;
    }

    pub fn hands(&self) -> u32 {
        self.wins + self.pushes + self.losses + self.busts
    }

    pub fn net(&self) -> i64 {
        self.final_bankroll - self.starting_bankroll
    }
}

impl Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 60;
        const TEXT_WIDTH: usize = "rounds where every hand busted".len() + 4;
        const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;
        let hands = self.hands().max(1) as f32;
        write!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
            {:<TEXT_WIDTH$}{:>+NUM_WIDTH$}",
            "rounds played",
            self.rounds,
            "hands won",
            self.wins,
            "hands pushed",
            self.pushes,
            "hands lost",
            self.losses,
            "hands busted",
            self.busts,
            "rounds where every hand busted",
            self.all_busted_rounds,
            "win percentage",
            self.wins as f32 / hands,
            "starting bankroll",
            self.starting_bankroll,
            "final bankroll",
            self.final_bankroll,
            "net",
            self.net(),
        )
    }
}
