use crate::game::hand::Hand;
use blackjack_lib::BlackjackGameError;
use log::info;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::Display;

/// How many hands the player plays in a round. The second hand is dealt independently, it is not a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HandCount {
    One,
    Two,
}

impl HandCount {
    pub fn count(&self) -> usize {
        match self {
            HandCount::One => 1,
            HandCount::Two => 2,
        }
    }
}

impl TryFrom<u8> for HandCount {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HandCount::One),
            2 => Ok(HandCount::Two),
            n => Err(format!("a round is played with 1 or 2 hands, not {}", n)),
        }
    }
}

impl From<HandCount> for u8 {
    fn from(value: HandCount) -> Self {
        value.count() as u8
    }
}

/// Lifecycle of a single player hand. `Standing` and `Busted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandState {
    Active,
    Standing,
    Busted,
}

impl HandState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, HandState::Active)
    }
}

/// How a hand was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandOutcome {
    Win,
    Push,
    Loss,
    Bust,
}

impl HandOutcome {
    /// Change to the bankroll caused by this outcome for a given bet
    pub fn net(&self, bet: u32) -> i64 {
        match self {
            HandOutcome::Win => bet as i64,
            HandOutcome::Push => 0,
            HandOutcome::Loss | HandOutcome::Bust => -(bet as i64),
        }
    }
}

impl Display for HandOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandOutcome::Win => write!(f, "win"),
            HandOutcome::Push => write!(f, "push"),
            HandOutcome::Loss => write!(f, "loss"),
            HandOutcome::Bust => write!(f, "bust"),
        }
    }
}

/// A hand on the player's side of the table together with where it is in the round.
#[derive(Debug, Clone)]
pub struct SeatHand {
    pub hand: Hand,
    pub state: HandState,
    pub outcome: Option<HandOutcome>,
}

impl SeatHand {
    fn new() -> Self {
        SeatHand {
            hand: Hand::new(),
            state: HandState::Active,
            outcome: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == HandState::Active
    }
}

/// The player's seat: the hands of the current round, the bet riding on each of them and the bankroll.
#[derive(Debug, Clone)]
pub struct PlayerSeat {
    hands: Vec<SeatHand>,
    pub bet: u32,
    pub bankroll: i64,
}

impl PlayerSeat {
    /// Associated function to create a new `PlayerSeat` struct.
    pub fn new(starting_bankroll: i64) -> PlayerSeat {
        PlayerSeat {
            hands: vec![],
            bet: 0,
            bankroll: starting_bankroll,
        }
    }

    /// Checks that `bet` is between 1 and the current bankroll.
    pub fn validate_bet(&self, bet: u32) -> Result<(), BlackjackGameError> {
        if bet == 0 || bet as i64 > self.bankroll {
            return Err(BlackjackGameError::InvalidBet {
                input: bet.to_string(),
                bankroll: self.bankroll,
            });
        }
        Ok(())
    }

    /// Places `bet` on `hands` fresh, empty hands. The bet is validated first, nothing changes on error.
    pub fn place_bet(&mut self, bet: u32, hands: HandCount) -> Result<(), BlackjackGameError> {
        self.validate_bet(bet)?;
        self.bet = bet;
        self.hands = (0..hands.count()).map(|_| SeatHand::new()).collect();
        Ok(())
    }

    pub fn hands(&self) -> &[SeatHand] {
        &self.hands
    }

    pub fn hand(&self, index: usize) -> Option<&SeatHand> {
        self.hands.get(index)
    }

    /// Returns the hand at `index` if it can still be played, `InactiveHand` otherwise.
    pub fn active_hand_mut(&mut self, index: usize) -> Result<&mut SeatHand, BlackjackGameError> {
        match self.hands.get_mut(index) {
            Some(seat_hand) if seat_hand.is_active() => Ok(seat_hand),
            _ => Err(BlackjackGameError::InactiveHand { index }),
        }
    }

    pub fn has_hands(&self) -> bool {
        !self.hands.is_empty()
    }

    /// Method for determining whether every hand of the round is over
    pub fn turn_is_over(&self) -> bool {
        self.hands.iter().all(|h| h.state.is_terminal())
    }

    pub fn all_busted(&self) -> bool {
        self.has_hands() && self.hands.iter().all(|h| h.state == HandState::Busted)
    }

    /// Moves an active hand to `Standing`.
    pub fn stand(&mut self, index: usize) -> Result<(), BlackjackGameError> {
        let seat_hand = self.active_hand_mut(index)?;
        seat_hand.state = HandState::Standing;
        Ok(())
    }

    /// A busted hand loses its bet on the spot.
    pub fn bust_hand(&mut self, index: usize) {
        if let Some(seat_hand) = self.hands.get_mut(index) {
            if seat_hand.outcome.is_none() {
                seat_hand.state = HandState::Busted;
                seat_hand.outcome = Some(HandOutcome::Bust);
                self.bankroll -= self.bet as i64;
                info!("hand #{} busted, {} lost", index + 1, self.bet);
            }
        }
    }

    /// Records the outcome of a standing hand and pays or collects the bet. A hand is only ever settled once.
    pub fn settle_hand(&mut self, index: usize, outcome: HandOutcome) {
        if let Some(seat_hand) = self.hands.get_mut(index) {
            if seat_hand.outcome.is_none() {
                seat_hand.outcome = Some(outcome);
                self.bankroll += outcome.net(self.bet);
            }
        }
    }

    /// Drops the hands of the previous round
    pub fn reset(&mut self) {
        self.hands.clear();
        self.bet = 0;
    }
}
