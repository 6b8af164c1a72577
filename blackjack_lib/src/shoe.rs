use crate::card::{Card, Rank, Suit};
use crate::error::BlackjackGameError;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const CARDS_PER_DECK: usize = 52;

/// Parameters needed to build a `Shoe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoeConfig {
    pub num_decks: u32,
    /// The shoe is rebuilt before a draw when fewer than this many cards remain.
    pub reshuffle_threshold: usize,
    /// Seed for the shuffling rng, `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for ShoeConfig {
    fn default() -> Self {
        ShoeConfig {
            num_decks: 6,
            reshuffle_threshold: CARDS_PER_DECK,
            seed: None,
        }
    }
}

/// The result of a single draw from the shoe. `reshuffled` is set when the shoe had to be rebuilt
/// before `card` could be drawn, in which case `card` came from the fresh shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub card: Card,
    pub reshuffled: bool,
}

/// A multi-deck pool of cards. Cards are drawn from the top (the back of `cards`) and never come back
/// until the whole shoe is rebuilt.
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: u32,
    reshuffle_threshold: usize,
    dealt_since_rebuild: usize,
    rebuilds: u32,
    rng: StdRng,
}

impl Shoe {
    /// Associated method for building and shuffling a new shoe. Fails if the configuration has no decks.
    pub fn new(config: ShoeConfig) -> Result<Shoe, BlackjackGameError> {
        if config.num_decks == 0 {
            return Err(BlackjackGameError::InvalidShoeConfig {
                deck_count: config.num_decks,
            });
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut shoe = Shoe {
            cards: Vec::with_capacity(config.num_decks as usize * CARDS_PER_DECK),
            num_decks: config.num_decks,
            reshuffle_threshold: config.reshuffle_threshold,
            dealt_since_rebuild: 0,
            rebuilds: 0,
            rng,
        };
        shoe.fill();
        Ok(shoe)
    }

    /// Builds a shuffled shoe whose next draws are cards of `ranks`, in that order. The stacked cards are
    /// taken out of the shoe itself so the composition stays that of `num_decks` full decks.
    pub fn stacked(config: ShoeConfig, ranks: &[Rank]) -> Result<Shoe, BlackjackGameError> {
        let mut shoe = Shoe::new(config)?;
        let mut top = Vec::with_capacity(ranks.len());
        for rank in ranks {
            match shoe.cards.iter().position(|c| c.rank == *rank) {
                Some(idx) => top.push(shoe.cards.remove(idx)),
                None => {
                    return Err(BlackjackGameError::InvalidShoeConfig {
                        deck_count: config.num_decks,
                    })
                }
            }
        }
        shoe.cards.extend(top.into_iter().rev());
        Ok(shoe)
    }

    fn build_cards(num_decks: u32) -> Vec<Card> {
        let mut cards = Vec::with_capacity(num_decks as usize * CARDS_PER_DECK);
        for _ in 0..num_decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    cards.push(Card::new(suit, rank));
                }
            }
        }
        cards
    }

    fn fill(&mut self) {
        self.cards = Shoe::build_cards(self.num_decks);
        self.cards.shuffle(&mut self.rng);
        self.dealt_since_rebuild = 0;
    }

    /// Throws away whatever is left and builds a fresh shuffled shoe.
    pub fn rebuild(&mut self) {
        self.fill();
        self.rebuilds += 1;
        info!(
            "shoe rebuilt: {} decks, {} cards (rebuild #{})",
            self.num_decks,
            self.cards.len(),
            self.rebuilds
        );
    }

    /// True when the next draw has to rebuild the shoe first.
    pub fn needs_rebuild(&self) -> bool {
        self.cards.is_empty() || self.cards.len() < self.reshuffle_threshold
    }

    /// Draws the top card, rebuilding the shoe first if it has run below the reshuffle threshold.
    pub fn draw(&mut self) -> Draw {
        let reshuffled = self.needs_rebuild();
        if reshuffled {
            self.rebuild();
        }
        let card = self
            .cards
            .pop()
            .expect("a freshly built shoe always holds at least one deck");
        self.dealt_since_rebuild += 1;
        debug!("drew {} ({} left in shoe)", card, self.cards.len());
        Draw { card, reshuffled }
    }

    /// Number of cards left to draw
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Number of cards in a full shoe
    pub fn capacity(&self) -> usize {
        self.num_decks as usize * CARDS_PER_DECK
    }

    pub fn dealt_since_rebuild(&self) -> usize {
        self.dealt_since_rebuild
    }

    pub fn rebuilds(&self) -> u32 {
        self.rebuilds
    }

    pub fn num_decks(&self) -> u32 {
        self.num_decks
    }

    pub fn reshuffle_threshold(&self) -> usize {
        self.reshuffle_threshold
    }
}
