use crate::game::hand::hand_value;
use crate::game::player::{HandOutcome, HandState};
use crate::game::strategy::CountAdvice;
use crate::game::table::RoundOutcome;
use blackjack_lib::Card;
use serde::Serialize;
use std::fmt::Display;

/// What the presentation layer may know about one player hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandSnapshot {
    pub index: usize,
    pub cards: Vec<Card>,
    pub value: u8,
    pub active: bool,
    pub state: HandState,
    pub outcome: Option<HandOutcome>,
}

/// The dealer's hand as seen from the player's seat. While the round is open only the up card is shown and
/// `value` is the value of that card alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealerSnapshot {
    pub cards: Vec<Card>,
    pub hidden_cards: usize,
    pub value: u8,
    pub revealed: bool,
}

impl DealerSnapshot {
    pub fn new(cards: &[Card], revealed: bool) -> Self {
        let visible: Vec<Card> = if revealed {
            cards.to_vec()
        } else {
            cards.iter().take(1).copied().collect()
        };
        DealerSnapshot {
            hidden_cards: cards.len() - visible.len(),
            value: hand_value(&visible),
            cards: visible,
            revealed,
        }
    }
}

/// Read-only view of the table after every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSnapshot {
    pub hands: Vec<HandSnapshot>,
    pub dealer: DealerSnapshot,
    pub bankroll: i64,
    pub bet: u32,
    pub running_count: i32,
    pub count_advice: CountAdvice,
    pub round_over: bool,
    pub outcome: Option<RoundOutcome>,
}

fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

impl Display for RoundSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 60;
        writeln!(f, "{:=^WIDTH$}", " table ")?;
        for hand in self.hands.iter() {
            let status = match (hand.state, hand.outcome) {
                (_, Some(outcome)) => outcome.to_string(),
                (HandState::Active, None) => "in play".to_string(),
                (HandState::Standing, None) => "standing".to_string(),
                (HandState::Busted, None) => "busted".to_string(),
            };
            writeln!(
                f,
                "{:<12}{:<30}{:>6}  {}",
                format!("hand #{}:", hand.index + 1),
                format_cards(&hand.cards),
                hand.value,
                status
            )?;
        }
        let hidden = vec!["??"; self.dealer.hidden_cards].join(" ");
        let dealer_cards = [format_cards(&self.dealer.cards), hidden]
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<String>>()
            .join(" ");
        writeln!(f, "{:<12}{:<30}{:>6}", "dealer:", dealer_cards, self.dealer.value)?;
        writeln!(f, "{:<12}{}", "bankroll:", self.bankroll)?;
        writeln!(f, "{:<12}{}", "bet:", self.bet)?;
        writeln!(f, "{:<12}{:+}", "count:", self.running_count)?;
        write!(f, "{}", self.count_advice.guidance)?;
        if let Some(RoundOutcome::AllBusted) = self.outcome {
            write!(f, "\nall hands busted before the dealer played")?;
        }
        Ok(())
    }
}
