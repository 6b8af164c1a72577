use crate::config::CountReset;
use crate::game::hand::{Hand, BLACKJACK};
use crate::game::player::{HandOutcome, HandState, PlayerSeat};
use crate::game::strategy::CountingStrategy;
use blackjack_lib::{BlackjackGameError, Card, Shoe};
use log::{debug, info};
use serde::Serialize;

/// The dealer draws until reaching this total, and stands on every 17 including a soft one.
pub const DEALER_STANDS_ON: u8 = 17;

/// How a round ended once every player hand was over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// The dealer played and every standing hand was compared against the dealer's hand.
    Settled,
    /// Every player hand busted before the dealer had to play.
    AllBusted,
}

/// Compares a standing player total against the dealer's final total.
pub fn settle(player_total: u8, dealer_total: u8) -> HandOutcome {
    if dealer_total > BLACKJACK || player_total > dealer_total {
        HandOutcome::Win
    } else if player_total == dealer_total {
        HandOutcome::Push
    } else {
        HandOutcome::Loss
    }
}

/// Struct for a single blackjack table: the shoe, the dealer's hand, and the rules for dealing from them.
pub struct Table {
    shoe: Shoe,
    pub dealers_hand: Hand,
    dealer_played: bool,
    count_reset: CountReset,
}

impl Table {
    pub fn new(shoe: Shoe, count_reset: CountReset) -> Self {
        Table {
            shoe,
            dealers_hand: Hand::new(),
            dealer_played: false,
            count_reset,
        }
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// Rebuilds the shoe between rounds.
    pub fn rebuild_shoe<C: CountingStrategy>(&mut self, counter: &mut C) {
        self.shoe.rebuild();
        if self.count_reset == CountReset::OnReshuffle {
            counter.reset();
            info!("running count reset after shoe rebuild");
        }
    }

    /// Draws the next card. When the draw had to rebuild the shoe and the count follows the shoe, the count is
    /// zeroed before the drawn card reaches any hand.
    fn next_card<C: CountingStrategy>(&mut self, counter: &mut C) -> Card {
        let draw = self.shoe.draw();
        if draw.reshuffled && self.count_reset == CountReset::OnReshuffle {
            counter.reset();
            info!("running count reset after shoe rebuild");
        }
        draw.card
    }

    /// Deals a fresh round: two cards to each player hand in seat order, then two to the dealer.
    /// The dealer's first card is the face up card.
    pub fn deal_hand<C: CountingStrategy>(&mut self, player: &mut PlayerSeat, counter: &mut C) {
        self.reset();
        for index in 0..player.hands().len() {
            for _ in 0..2 {
                let card = self.next_card(counter);
                if let Ok(seat_hand) = player.active_hand_mut(index) {
                    seat_hand.hand.add_card(card, counter);
                }
            }
        }
        for _ in 0..2 {
            let card = self.next_card(counter);
            self.dealers_hand.add_card(card, counter);
        }
        debug!(
            "dealt {} player hand(s), dealer shows {}",
            player.hands().len(),
            self.dealers_hand.display(false)
        );
    }

    /// Deals a card to the player's hand at `index`. A hand that goes over 21 busts and loses its bet right away.
    pub fn hit<C: CountingStrategy>(
        &mut self,
        player: &mut PlayerSeat,
        index: usize,
        counter: &mut C,
    ) -> Result<HandState, BlackjackGameError> {
        if self.dealer_played {
            return Err(BlackjackGameError::InactiveHand { index });
        }
        // Check the hand before drawing so a rejected hit leaves the shoe and the count alone
        player.active_hand_mut(index)?;
        let card = self.next_card(counter);
        let seat_hand = player.active_hand_mut(index)?;
        seat_hand.hand.add_card(card, counter);
        debug!(
            "hand #{} hits {}, now {}",
            index + 1,
            card,
            seat_hand.hand.value()
        );
        if seat_hand.hand.is_bust() {
            player.bust_hand(index);
            return Ok(HandState::Busted);
        }
        Ok(HandState::Active)
    }

    /// Method that calls the `player`'s stand method.
    pub fn stand(&self, player: &mut PlayerSeat, index: usize) -> Result<(), BlackjackGameError> {
        if self.dealer_played {
            return Err(BlackjackGameError::InactiveHand { index });
        }
        player.stand(index)
    }

    /// Plays the dealer's hand: draw while under 17. Returns the number of cards drawn, which is zero once the
    /// dealer already stands.
    pub fn play_dealer<C: CountingStrategy>(&mut self, counter: &mut C) -> usize {
        let mut drawn = 0;
        while self.dealers_hand.value() < DEALER_STANDS_ON {
            let card = self.next_card(counter);
            self.dealers_hand.add_card(card, counter);
            drawn += 1;
        }
        self.dealer_played = true;
        debug!(
            "dealer drew {} card(s): {} = {}",
            drawn,
            self.dealers_hand.display(true),
            self.dealers_hand.value()
        );
        drawn
    }

    /// Method for finishing the round once every player hand is over. If every hand busted the dealer does not
    /// draw, otherwise the dealer plays and each standing hand is settled against the dealer's total.
    pub fn finish_hand<C: CountingStrategy>(
        &mut self,
        player: &mut PlayerSeat,
        counter: &mut C,
    ) -> RoundOutcome {
        if player.all_busted() {
            self.dealer_played = true;
            info!("all hands busted before the dealer played");
            return RoundOutcome::AllBusted;
        }

        self.play_dealer(counter);
        let dealer_total = self.dealers_hand.value();
        for index in 0..player.hands().len() {
            let player_total = match player.hand(index) {
                Some(h) if h.state == HandState::Standing => h.hand.value(),
                _ => continue,
            };
            let outcome = settle(player_total, dealer_total);
            player.settle_hand(index, outcome);
            info!(
                "hand #{}: {} against dealer {} -> {}",
                index + 1,
                player_total,
                dealer_total,
                outcome
            );
        }
        RoundOutcome::Settled
    }

    /// Getter method for the dealers face up card.
    pub fn dealers_face_up_card(&self) -> Option<Card> {
        self.dealers_hand.first_card()
    }

    pub fn dealer_played(&self) -> bool {
        self.dealer_played
    }

    /// Method for reseting the table for another round, does not reshuffle the shoe.
    pub fn reset(&mut self) {
        self.dealers_hand = Hand::new();
        self.dealer_played = false;
    }
}
