//! Configuration of a blackjack table: the shoe, when the count is reset, the advice thresholds and the bankroll.

use crate::game::strategy::{AdviceThresholds, ShiftThresholds};
use crate::SessionError;
use blackjack_lib::{ShoeConfig, CARDS_PER_DECK};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// When the running count goes back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountReset {
    /// Whenever the shoe is rebuilt, the count then describes a fresh population of cards.
    OnReshuffle,
    /// At the start of every round, whether the shoe was rebuilt or not.
    EveryRound,
}

lazy_static! {
    static ref PRESETS: BTreeMap<&'static str, TableConfig> = {
        let mut presets = BTreeMap::new();
        presets.insert("shoe", TableConfig::default());
        presets.insert("console", TableConfig::console());
        presets
    };
}

/// Struct holding every tunable of a table. Deserializes from JSON, missing fields take their default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub num_decks: u32,
    pub reshuffle_threshold: usize,
    pub count_reset: CountReset,
    pub fresh_shoe_each_round: bool,
    pub advice_thresholds: AdviceThresholds,
    pub shift_thresholds: ShiftThresholds,
    pub starting_bankroll: i64,
    pub default_bet: u32,
    pub seed: Option<u64>,
}

impl TableConfig {
    /// Associated method for returning a new `TableConfigBuilder` object.
    pub fn new() -> TableConfigBuilder {
        TableConfigBuilder::default()
    }

    /// The single deck console game: a new shuffled deck and a zeroed count every round, +2/-2 advice bands.
    pub fn console() -> TableConfig {
        TableConfig::new()
            .num_decks(1)
            .reshuffle_threshold(0)
            .count_reset(CountReset::EveryRound)
            .fresh_shoe_each_round(true)
            .advice_thresholds(AdviceThresholds::console())
            .build()
    }

    /// Looks up a named preset, `"shoe"` or `"console"`.
    pub fn preset(name: &str) -> Option<TableConfig> {
        PRESETS.get(name).copied()
    }

    pub fn preset_names() -> Vec<&'static str> {
        PRESETS.keys().copied().collect()
    }

    pub fn shoe_config(&self) -> ShoeConfig {
        ShoeConfig {
            num_decks: self.num_decks,
            reshuffle_threshold: self.reshuffle_threshold,
            seed: self.seed,
        }
    }

    pub fn from_json_str(json: &str) -> Result<TableConfig, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<TableConfig, SessionError> {
        let contents = fs::read_to_string(path)?;
        TableConfig::from_json_str(&contents)
    }
}

impl Default for TableConfig {
    /// The multi-deck shoe game.
    fn default() -> Self {
        TableConfig::new().build()
    }
}

/// Struct to implement builder pattern for `TableConfig`
#[derive(Debug, Clone, Copy, Default)]
pub struct TableConfigBuilder {
    num_decks: Option<u32>,
    reshuffle_threshold: Option<usize>,
    count_reset: Option<CountReset>,
    fresh_shoe_each_round: Option<bool>,
    advice_thresholds: Option<AdviceThresholds>,
    shift_thresholds: Option<ShiftThresholds>,
    starting_bankroll: Option<i64>,
    default_bet: Option<u32>,
    seed: Option<u64>,
}

impl TableConfigBuilder {
    /// Method for choosing the number of decks in the shoe
    pub fn num_decks(&mut self, decks: u32) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    /// Method for setting how few cards may remain before the shoe is rebuilt
    pub fn reshuffle_threshold(&mut self, threshold: usize) -> &mut Self {
        self.reshuffle_threshold = Some(threshold);
        self
    }

    pub fn count_reset(&mut self, count_reset: CountReset) -> &mut Self {
        self.count_reset = Some(count_reset);
        self
    }

    /// Method for setting a flag, if true the shoe is rebuilt at the start of every round.
    pub fn fresh_shoe_each_round(&mut self, fresh: bool) -> &mut Self {
        self.fresh_shoe_each_round = Some(fresh);
        self
    }

    pub fn advice_thresholds(&mut self, thresholds: AdviceThresholds) -> &mut Self {
        self.advice_thresholds = Some(thresholds);
        self
    }

    pub fn shift_thresholds(&mut self, thresholds: ShiftThresholds) -> &mut Self {
        self.shift_thresholds = Some(thresholds);
        self
    }

    /// Method for changing the starting bankroll of the player.
    pub fn starting_bankroll(&mut self, bankroll: i64) -> &mut Self {
        self.starting_bankroll = Some(bankroll);
        self
    }

    pub fn default_bet(&mut self, bet: u32) -> &mut Self {
        self.default_bet = Some(bet);
        self
    }

    /// Method for seeding the shoe's rng, useful for reproducible games.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Method for building a `TableConfig` object from the given `TableConfigBuilder` object.
    pub fn build(&mut self) -> TableConfig {
        TableConfig {
            num_decks: self.num_decks.unwrap_or(6),
            reshuffle_threshold: self.reshuffle_threshold.unwrap_or(CARDS_PER_DECK),
            count_reset: self.count_reset.unwrap_or(CountReset::OnReshuffle),
            fresh_shoe_each_round: self.fresh_shoe_each_round.unwrap_or(false),
            advice_thresholds: self.advice_thresholds.unwrap_or(AdviceThresholds::shoe()),
            shift_thresholds: self.shift_thresholds.unwrap_or_default(),
            starting_bankroll: self.starting_bankroll.unwrap_or(100),
            default_bet: self.default_bet.unwrap_or(1),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TableConfig::default();
        assert_eq!(config.num_decks, 6);
        assert_eq!(config.reshuffle_threshold, 52);
        assert_eq!(config.count_reset, CountReset::OnReshuffle);
        assert!(!config.fresh_shoe_each_round);
        assert_eq!(config.advice_thresholds, AdviceThresholds::shoe());
        assert_eq!(config.starting_bankroll, 100);
        assert_eq!(config.default_bet, 1);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_console_preset() {
        let config = TableConfig::preset("console").unwrap();
        assert_eq!(config.num_decks, 1);
        assert_eq!(config.count_reset, CountReset::EveryRound);
        assert!(config.fresh_shoe_each_round);
        assert_eq!(config.advice_thresholds, AdviceThresholds::console());
        assert!(TableConfig::preset("casino").is_none());
        assert_eq!(TableConfig::preset_names(), vec!["console", "shoe"]);
    }

    #[test]
    fn test_builder_overrides() {
        let config = TableConfig::new()
            .num_decks(2)
            .reshuffle_threshold(20)
            .starting_bankroll(500)
            .default_bet(5)
            .seed(42)
            .build();
        assert_eq!(config.num_decks, 2);
        assert_eq!(config.reshuffle_threshold, 20);
        assert_eq!(config.starting_bankroll, 500);
        assert_eq!(config.default_bet, 5);
        assert_eq!(config.shoe_config().seed, Some(42));
    }

    #[test]
    fn test_partial_json() {
        let config = TableConfig::from_json_str(
            r#"{ "num_decks": 2, "count_reset": "every_round", "shift_thresholds": { "raise_at": 3, "lower_at": -3 } }"#,
        )
        .unwrap();
        assert_eq!(config.num_decks, 2);
        assert_eq!(config.count_reset, CountReset::EveryRound);
        assert_eq!(config.shift_thresholds.raise_at, 3);
        assert_eq!(config.starting_bankroll, 100);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            TableConfig::from_json_str("{ \"num_decks\": -1 }"),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            TableConfig::from_json_file("/definitely/not/here.json"),
            Err(SessionError::Io(_))
        ));
    }
}
