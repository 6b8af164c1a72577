use crate::game::hand::Hand;
use blackjack_lib::Rank;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod prelude {
    pub use super::{
        danger_rank, AdviceLevel, AdviceThresholds, CountAdvice, CountShiftStrategy,
        CountingStrategy, Decision, DecisionStrategy, HiLo, ShiftThresholds,
    };
}

/// Trait for a specific counting strategy. Every card added to a hand on the table is passed to `update`.
pub trait CountingStrategy {
    fn update(&mut self, rank: Rank);
    fn reset(&mut self);
    fn running_count(&self) -> i32;
    fn cards_counted(&self) -> u32;
    fn thresholds(&self) -> &AdviceThresholds;

    /// Classifies the running count into an advice band, with a message for the player.
    fn advise(&self) -> CountAdvice {
        let running_count = self.running_count();
        let level = self.thresholds().classify(running_count);
        CountAdvice {
            level,
            running_count,
            guidance: level.guidance(running_count),
        }
    }
}

/// The bands a running count can fall into, from worst to best for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceLevel {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryHigh,
}

impl AdviceLevel {
    pub fn guidance(&self, running_count: i32) -> String {
        match self {
            AdviceLevel::VeryHigh => format!(
                "The count is very high ({:+}): the shoe is loaded with high cards, this is the time to bet big.",
                running_count
            ),
            AdviceLevel::Positive => format!(
                "The count is positive ({:+}): the game is in your favour, you can bet more.",
                running_count
            ),
            AdviceLevel::Neutral => format!(
                "The count is close to even ({:+}): play normally.",
                running_count
            ),
            AdviceLevel::Negative => format!(
                "The count is negative ({:+}): the dealer has the edge, lower your bet or play carefully.",
                running_count
            ),
            AdviceLevel::VeryNegative => format!(
                "The count is very negative ({:+}): the shoe favours the dealer, stick to the minimum bet.",
                running_count
            ),
        }
    }
}

impl Display for AdviceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AdviceLevel::VeryNegative => "very negative",
            AdviceLevel::Negative => "negative",
            AdviceLevel::Neutral => "neutral",
            AdviceLevel::Positive => "positive",
            AdviceLevel::VeryHigh => "very high",
        };
        write!(f, "{}", label)
    }
}

/// Cut points for the advice bands. A high band applies when the count is strictly above its cut point,
/// a low band when it is strictly below. The outer bands are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceThresholds {
    pub very_high: Option<i32>,
    pub positive: i32,
    pub negative: i32,
    pub very_negative: Option<i32>,
}

impl AdviceThresholds {
    /// Symmetric +2/-2 bands used by the single deck console game.
    pub fn console() -> AdviceThresholds {
        AdviceThresholds {
            very_high: None,
            positive: 2,
            negative: -2,
            very_negative: None,
        }
    }

    /// Five bands with cut points +8/+4/-2/-6, used with a multi-deck shoe.
    pub fn shoe() -> AdviceThresholds {
        AdviceThresholds {
            very_high: Some(8),
            positive: 4,
            negative: -2,
            very_negative: Some(-6),
        }
    }

    pub fn classify(&self, running_count: i32) -> AdviceLevel {
        match (self.very_high, self.very_negative) {
            (Some(cut), _) if running_count > cut => AdviceLevel::VeryHigh,
            _ if running_count > self.positive => AdviceLevel::Positive,
            (_, Some(cut)) if running_count < cut => AdviceLevel::VeryNegative,
            _ if running_count < self.negative => AdviceLevel::Negative,
            _ => AdviceLevel::Neutral,
        }
    }
}

impl Default for AdviceThresholds {
    fn default() -> Self {
        AdviceThresholds::shoe()
    }
}

/// The advice band for the current count, ready to be shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountAdvice {
    pub level: AdviceLevel,
    pub running_count: i32,
    pub guidance: String,
}

/// Struct that implements the Hi-Lo counting strategy. 2 through 6 count +1, 7 through 9 count 0
/// and tens, faces and aces count -1.
#[derive(Debug, Clone)]
pub struct HiLo {
    running_count: i32,
    total_cards_counted: u32,
    thresholds: AdviceThresholds,
}

impl HiLo {
    /// Associated method for building a new HiLo counting object
    pub fn new(thresholds: AdviceThresholds) -> Self {
        HiLo {
            running_count: 0,
            total_cards_counted: 0,
            thresholds,
        }
    }

    pub fn tag(rank: Rank) -> i32 {
        match rank {
            Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
            Rank::Seven | Rank::Eight | Rank::Nine => 0,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => -1,
        }
    }
}

impl Default for HiLo {
    fn default() -> Self {
        HiLo::new(AdviceThresholds::default())
    }
}

impl CountingStrategy for HiLo {
    fn update(&mut self, rank: Rank) {
        self.running_count += HiLo::tag(rank);
        self.total_cards_counted += 1;
    }

    fn reset(&mut self) {
        self.running_count = 0;
        self.total_cards_counted = 0;
    }

    fn running_count(&self) -> i32 {
        self.running_count
    }

    fn cards_counted(&self) -> u32 {
        self.total_cards_counted
    }

    fn thresholds(&self) -> &AdviceThresholds {
        &self.thresholds
    }
}

impl Display for HiLo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = "total cards counted:".len() + 2;
        write!(
            f,
            "{:<width$}{:>+6}\n{:<width$}{:>6}",
            "running count:", self.running_count, "total cards counted:", self.total_cards_counted,
        )
    }
}

/// The two plays the advisor chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hit,
    Stand,
}

impl Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Hit => write!(f, "hit"),
            Decision::Stand => write!(f, "stand"),
        }
    }
}

/// Trait for a generic decision strategy. Takes the player's hand, the dealer's up card and the running count
/// and returns the recommended play. Implementations must not mutate anything.
pub trait DecisionStrategy {
    fn decide(&self, hand: &Hand, dealers_up_card: Rank, running_count: i32) -> Decision;
}

/// Running counts at which the advisor treats the player's total as one higher or one lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftThresholds {
    pub raise_at: i32,
    pub lower_at: i32,
}

impl ShiftThresholds {
    pub fn shift(&self, running_count: i32) -> i32 {
        if running_count >= self.raise_at {
            1
        } else if running_count <= self.lower_at {
            -1
        } else {
            0
        }
    }
}

impl Default for ShiftThresholds {
    fn default() -> Self {
        ShiftThresholds {
            raise_at: 5,
            lower_at: -5,
        }
    }
}

/// How threatening the dealer's up card is: tens, faces and aces all count 10.
pub fn danger_rank(rank: Rank) -> u8 {
    match rank {
        Rank::Ace => 10,
        other => other.value(),
    }
}

/// Simplified basic strategy with hard totals only, nudged by the running count.
/// Hits up to 11, stands from 17, and in between stands only against a weak up card (2 through 6).
#[derive(Debug, Clone, Copy, Default)]
pub struct CountShiftStrategy {
    thresholds: ShiftThresholds,
}

impl CountShiftStrategy {
    pub fn new(thresholds: ShiftThresholds) -> Self {
        CountShiftStrategy { thresholds }
    }

    pub fn recommend_total(&self, total: u8, dealers_up_card: Rank, running_count: i32) -> Decision {
        let adjusted_total = total as i32 + self.thresholds.shift(running_count);
        match adjusted_total {
            t if t <= 11 => Decision::Hit,
            12..=16 if danger_rank(dealers_up_card) < 7 => Decision::Stand,
            12..=16 => Decision::Hit,
            _ => Decision::Stand,
        }
    }
}

impl DecisionStrategy for CountShiftStrategy {
    fn decide(&self, hand: &Hand, dealers_up_card: Rank, running_count: i32) -> Decision {
        self.recommend_total(hand.value(), dealers_up_card, running_count)
    }
}
