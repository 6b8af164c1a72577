//! Module for playing a single table of blackjack interactively. `BlackjackGame` owns the round: it deals,
//! accepts the player's actions hand by hand, plays the dealer once every hand is over and settles the bets.

pub mod hand;
pub mod player;
pub mod snapshot;
pub mod strategy;
pub mod table;
pub mod prelude {
    pub use super::{parse_bet, Advice, BlackjackGame};
    pub use crate::game::hand::{hand_value, Hand, BLACKJACK};
    pub use crate::game::player::{HandCount, HandOutcome, HandState, PlayerSeat, SeatHand};
    pub use crate::game::snapshot::{DealerSnapshot, HandSnapshot, RoundSnapshot};
    pub use crate::game::strategy::prelude::*;
    pub use crate::game::table::{settle, RoundOutcome, Table, DEALER_STANDS_ON};
    pub use blackjack_lib::{BlackjackGameError, Card, Rank, Shoe, Suit};
}

use crate::config::{CountReset, TableConfig};
use log::{info, warn};
use serde::Serialize;

pub use prelude::*;

/// Parses a bet typed by the player. Anything that is not a whole number between 1 and `bankroll` is rejected.
pub fn parse_bet(input: &str, bankroll: i64) -> Result<u32, BlackjackGameError> {
    let trimmed = input.trim();
    let invalid = || BlackjackGameError::InvalidBet {
        input: trimmed.to_string(),
        bankroll,
    };
    let bet = trimmed.parse::<u32>().map_err(|_| invalid())?;
    if bet == 0 || bet as i64 > bankroll {
        return Err(invalid());
    }
    Ok(bet)
}

/// What the advisor recommends for one hand, together with the band of the current count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub strategy: Decision,
    pub count_band: CountAdvice,
}

/// Struct that drives a blackjack table for a single player. The running count and the bankroll live here and
/// are handed to the table and the seat explicitly on every action.
pub struct BlackjackGame {
    table: Table,
    seat: PlayerSeat,
    counter: HiLo,
    advisor: CountShiftStrategy,
    config: TableConfig,
    outcome: Option<RoundOutcome>,
    rounds_played: u32,
}

impl BlackjackGame {
    /// Associated method for building a new game from `config`. Fails only when the shoe cannot be built.
    pub fn new(config: TableConfig) -> Result<BlackjackGame, BlackjackGameError> {
        let shoe = Shoe::new(config.shoe_config())?;
        Ok(BlackjackGame::with_shoe(config, shoe))
    }

    /// Builds a game around an already constructed shoe, e.g. a stacked one.
    pub fn with_shoe(config: TableConfig, shoe: Shoe) -> BlackjackGame {
        BlackjackGame {
            table: Table::new(shoe, config.count_reset),
            seat: PlayerSeat::new(config.starting_bankroll),
            counter: HiLo::new(config.advice_thresholds),
            advisor: CountShiftStrategy::new(config.shift_thresholds),
            config,
            outcome: None,
            rounds_played: 0,
        }
    }

    /// Starts a new round with `bet` riding on each of `hands` hands. The bet is checked before anything is
    /// touched, so an invalid bet leaves the current round as it was. Starting a round while another one is
    /// still open discards the open hands without settling them.
    pub fn start_round(
        &mut self,
        bet: u32,
        hands: HandCount,
    ) -> Result<RoundSnapshot, BlackjackGameError> {
        if let Err(e) = self.seat.validate_bet(bet) {
            warn!("{}", e);
            return Err(e);
        }
        if self.round_in_progress() {
            warn!(
                "round #{} abandoned with {} open hand(s), bets are not settled",
                self.rounds_played,
                self.seat.hands().len()
            );
        }

        if self.config.fresh_shoe_each_round {
            self.table.rebuild_shoe(&mut self.counter);
        }
        if self.config.count_reset == CountReset::EveryRound {
            self.counter.reset();
        }

        self.seat.reset();
        self.seat.place_bet(bet, hands)?;
        self.outcome = None;
        self.table.deal_hand(&mut self.seat, &mut self.counter);
        self.rounds_played += 1;
        info!(
            "round #{} started: {} hand(s) at {} each, bankroll {}, count {:+}",
            self.rounds_played,
            hands.count(),
            bet,
            self.seat.bankroll,
            self.counter.running_count()
        );
        Ok(self.snapshot())
    }

    /// Deals one card to hand `index`. Once every hand is over the dealer plays and the round is settled.
    pub fn hit(&mut self, index: usize) -> Result<RoundSnapshot, BlackjackGameError> {
        if let Err(e) = self
            .table
            .hit(&mut self.seat, index, &mut self.counter)
        {
            warn!("hit rejected: {}", e);
            return Err(e);
        }
        self.finish_if_over();
        Ok(self.snapshot())
    }

    /// Stands on hand `index`. Once every hand is over the dealer plays and the round is settled.
    pub fn stand(&mut self, index: usize) -> Result<RoundSnapshot, BlackjackGameError> {
        if let Err(e) = self.table.stand(&mut self.seat, index) {
            warn!("stand rejected: {}", e);
            return Err(e);
        }
        self.finish_if_over();
        Ok(self.snapshot())
    }

    fn finish_if_over(&mut self) {
        if self.round_in_progress() && self.seat.turn_is_over() {
            let outcome = self.table.finish_hand(&mut self.seat, &mut self.counter);
            self.outcome = Some(outcome);
            info!(
                "round #{} over: dealer {}, bankroll {}",
                self.rounds_played,
                self.table.dealers_hand.value(),
                self.seat.bankroll
            );
        }
    }

    /// The advisor's recommendation for hand `index`. `None` when the hand does not exist or is over, or once
    /// the dealer has played. Never changes any state.
    pub fn advice(&self, index: usize) -> Option<Advice> {
        if !self.round_in_progress() {
            return None;
        }
        let seat_hand = self.seat.hand(index).filter(|h| h.is_active())?;
        let up_card = self.table.dealers_face_up_card()?;
        Some(Advice {
            strategy: self.advisor.decide(
                &seat_hand.hand,
                up_card.rank,
                self.counter.running_count(),
            ),
            count_band: self.counter.advise(),
        })
    }

    pub fn count_advice(&self) -> CountAdvice {
        self.counter.advise()
    }

    /// Read-only view of the table. The dealer's hole card stays hidden until the dealer has played.
    pub fn snapshot(&self) -> RoundSnapshot {
        let hands = self
            .seat
            .hands()
            .iter()
            .enumerate()
            .map(|(index, seat_hand)| HandSnapshot {
                index,
                cards: seat_hand.hand.cards().to_vec(),
                value: seat_hand.hand.value(),
                active: seat_hand.is_active() && !self.table.dealer_played(),
                state: seat_hand.state,
                outcome: seat_hand.outcome,
            })
            .collect();
        RoundSnapshot {
            hands,
            dealer: DealerSnapshot::new(
                self.table.dealers_hand.cards(),
                self.table.dealer_played(),
            ),
            bankroll: self.seat.bankroll,
            bet: self.seat.bet,
            running_count: self.counter.running_count(),
            count_advice: self.counter.advise(),
            round_over: self.is_round_over(),
            outcome: self.outcome,
        }
    }

    fn round_in_progress(&self) -> bool {
        self.seat.has_hands() && !self.table.dealer_played()
    }

    /// True between rounds, including before the first one.
    pub fn is_round_over(&self) -> bool {
        !self.round_in_progress()
    }

    pub fn bankroll(&self) -> i64 {
        self.seat.bankroll
    }

    pub fn running_count(&self) -> i32 {
        self.counter.running_count()
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn shoe(&self) -> &Shoe {
        self.table.shoe()
    }

    pub fn seat(&self) -> &PlayerSeat {
        &self.seat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_lib::ShoeConfig;
    use proptest::prelude::*;

    fn single_deck() -> TableConfig {
        TableConfig::new()
            .num_decks(1)
            .reshuffle_threshold(0)
            .seed(7)
            .build()
    }

    fn stacked_game(ranks: &[Rank]) -> BlackjackGame {
        let config = single_deck();
        let shoe = Shoe::stacked(config.shoe_config(), ranks).unwrap();
        BlackjackGame::with_shoe(config, shoe)
    }

    #[test]
    fn test_player_twenty_beats_dealer_seventeen() {
        use Rank::*;
        let mut game = stacked_game(&[Five, Six, Seven, Six, Nine, Four]);
        let snapshot = game.start_round(10, HandCount::One).unwrap();
        assert_eq!(snapshot.hands[0].value, 11);
        assert_eq!(snapshot.dealer.cards.len(), 1);
        assert_eq!(snapshot.dealer.value, 7);
        assert!(!snapshot.round_over);

        let snapshot = game.hit(0).unwrap();
        assert_eq!(snapshot.hands[0].value, 20);
        assert!(snapshot.hands[0].active);

        let snapshot = game.stand(0).unwrap();
        assert!(snapshot.round_over);
        assert!(snapshot.dealer.revealed);
        assert_eq!(snapshot.dealer.value, 17);
        assert_eq!(snapshot.hands[0].outcome, Some(HandOutcome::Win));
        assert_eq!(snapshot.outcome, Some(RoundOutcome::Settled));
        assert_eq!(snapshot.bankroll, 110);
        // 5, 6, 6, 4 count +1 each
        assert_eq!(snapshot.running_count, 4);
    }

    #[test]
    fn test_advice_twelve_against_six() {
        use Rank::*;
        let mut game = stacked_game(&[King, Two, Six, Ace]);
        game.start_round(5, HandCount::One).unwrap();
        assert_eq!(game.running_count(), 0);
        let advice = game.advice(0).unwrap();
        assert_eq!(advice.strategy, Decision::Stand);
        assert_eq!(advice.count_band.level, AdviceLevel::Neutral);
        assert_eq!(advice.count_band.running_count, 0);
        assert!(game.advice(1).is_none());
    }

    #[test]
    fn test_actions_without_round() {
        let mut game = BlackjackGame::new(single_deck()).unwrap();
        assert!(game.is_round_over());
        assert_eq!(
            game.hit(0),
            Err(BlackjackGameError::InactiveHand { index: 0 })
        );
        assert_eq!(
            game.stand(0),
            Err(BlackjackGameError::InactiveHand { index: 0 })
        );
        assert!(game.advice(0).is_none());
        assert_eq!(game.shoe().remaining(), 52);
        assert_eq!(game.running_count(), 0);
    }

    #[test]
    fn test_zero_decks() {
        let config = TableConfig::new().num_decks(0).build();
        assert!(matches!(
            BlackjackGame::new(config),
            Err(BlackjackGameError::InvalidShoeConfig { deck_count: 0 })
        ));
    }

    #[test]
    fn test_invalid_bet_leaves_round_alone() {
        use Rank::*;
        let mut game = stacked_game(&[Ten, Two, Seven, Eight]);
        assert!(matches!(
            game.start_round(0, HandCount::One),
            Err(BlackjackGameError::InvalidBet { .. })
        ));
        assert!(matches!(
            game.start_round(101, HandCount::One),
            Err(BlackjackGameError::InvalidBet { bankroll: 100, .. })
        ));
        assert_eq!(game.rounds_played(), 0);

        game.start_round(100, HandCount::One).unwrap();
        let before = game.snapshot();
        assert!(game.start_round(101, HandCount::Two).is_err());
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.shoe().remaining(), 48);
    }

    #[test]
    fn test_terminal_hands_reject_actions() {
        use Rank::*;
        let mut game = stacked_game(&[Ten, Seven, Ten, Six, Nine, Eight, Five]);
        game.start_round(10, HandCount::Two).unwrap();
        game.stand(0).unwrap();
        assert!(!game.is_round_over());
        assert!(game.advice(0).is_none());
        assert!(game.advice(1).is_some());

        let count = game.running_count();
        let remaining = game.shoe().remaining();
        assert_eq!(
            game.hit(0),
            Err(BlackjackGameError::InactiveHand { index: 0 })
        );
        assert_eq!(
            game.stand(2),
            Err(BlackjackGameError::InactiveHand { index: 2 })
        );
        assert_eq!(game.running_count(), count);
        assert_eq!(game.shoe().remaining(), remaining);

        // 16 + 5 = 21, still active until the player stands
        let snapshot = game.hit(1).unwrap();
        assert_eq!(snapshot.hands[1].value, 21);
        assert!(!snapshot.round_over);

        let snapshot = game.stand(1).unwrap();
        assert!(snapshot.round_over);
        assert!(game.advice(1).is_none());
        assert_eq!(
            game.hit(1),
            Err(BlackjackGameError::InactiveHand { index: 1 })
        );
    }

    #[test]
    fn test_two_hands_settle_independently() {
        use Rank::*;
        // hand 1: 10 7, hand 2: 10 9, dealer 10 8
        let mut game = stacked_game(&[Ten, Seven, Ten, Nine, Ten, Eight]);
        game.start_round(10, HandCount::Two).unwrap();
        game.stand(0).unwrap();
        let snapshot = game.stand(1).unwrap();
        assert_eq!(snapshot.dealer.value, 18);
        assert_eq!(snapshot.hands[0].outcome, Some(HandOutcome::Loss));
        assert_eq!(snapshot.hands[1].outcome, Some(HandOutcome::Win));
        assert_eq!(snapshot.bankroll, 100);
    }

    #[test]
    fn test_all_hands_busted() {
        use Rank::*;
        let mut game = stacked_game(&[Ten, Six, Nine, Seven, King]);
        game.start_round(10, HandCount::One).unwrap();
        let snapshot = game.hit(0).unwrap();
        assert_eq!(snapshot.hands[0].state, HandState::Busted);
        assert_eq!(snapshot.hands[0].outcome, Some(HandOutcome::Bust));
        assert_eq!(snapshot.outcome, Some(RoundOutcome::AllBusted));
        assert!(snapshot.round_over);
        assert_eq!(snapshot.dealer.cards.len(), 2);
        assert_eq!(snapshot.dealer.value, 16);
        assert_eq!(snapshot.bankroll, 90);
    }

    #[test]
    fn test_one_bust_one_standing() {
        use Rank::*;
        // hand 1: 10 6 + K busts, hand 2: 10 8, dealer 9 7 + 4
        let mut game = stacked_game(&[Ten, Six, Ten, Eight, Nine, Seven, King, Four]);
        game.start_round(5, HandCount::Two).unwrap();
        let snapshot = game.hit(0).unwrap();
        assert_eq!(snapshot.bankroll, 95);
        assert!(!snapshot.round_over);

        let snapshot = game.stand(1).unwrap();
        assert_eq!(snapshot.outcome, Some(RoundOutcome::Settled));
        assert_eq!(snapshot.dealer.value, 20);
        assert_eq!(snapshot.hands[0].outcome, Some(HandOutcome::Bust));
        assert_eq!(snapshot.hands[1].outcome, Some(HandOutcome::Loss));
        assert_eq!(snapshot.bankroll, 90);
    }

    #[test]
    fn test_new_round_abandons_open_hands() {
        use Rank::*;
        let mut game = stacked_game(&[Ten, Six, Nine, Seven]);
        game.start_round(10, HandCount::One).unwrap();
        let snapshot = game.start_round(20, HandCount::Two).unwrap();
        assert_eq!(snapshot.bankroll, 100);
        assert_eq!(snapshot.bet, 20);
        assert_eq!(snapshot.hands.len(), 2);
        assert!(snapshot.hands.iter().all(|h| h.cards.len() == 2));
        assert_eq!(game.rounds_played(), 2);
    }

    #[test]
    fn test_console_game_uses_fresh_deck_and_count() {
        let config = TableConfig::new()
            .num_decks(1)
            .reshuffle_threshold(0)
            .count_reset(CountReset::EveryRound)
            .fresh_shoe_each_round(true)
            .advice_thresholds(AdviceThresholds::console())
            .seed(99)
            .build();
        let mut game = BlackjackGame::new(config).unwrap();
        for _ in 0..5 {
            let snapshot = game.start_round(1, HandCount::One).unwrap();
            assert_eq!(game.shoe().remaining(), 48);
            let expected: i32 = snapshot.hands[0]
                .cards
                .iter()
                .chain(game.table.dealers_hand.cards())
                .map(|c| HiLo::tag(c.rank))
                .sum();
            assert_eq!(snapshot.running_count, expected);
        }
    }

    #[test]
    fn test_shoe_count_survives_rounds() {
        use Rank::*;
        // player 2 3, dealer 4 5 then 6 7 to bust
        let mut game = stacked_game(&[Two, Three, Four, Five, Six, Seven]);
        game.start_round(1, HandCount::One).unwrap();
        let snapshot = game.stand(0).unwrap();
        assert_eq!(snapshot.hands[0].outcome, Some(HandOutcome::Win));
        assert_eq!(game.running_count(), 5);

        game.start_round(1, HandCount::One).unwrap();
        let dealt: i32 = game.seat().hands()[0]
            .hand
            .cards()
            .iter()
            .chain(game.table.dealers_hand.cards())
            .map(|c| HiLo::tag(c.rank))
            .sum();
        assert_eq!(game.running_count(), 5 + dealt);
        assert_eq!(game.shoe().rebuilds(), 0);
    }

    #[test]
    fn test_parse_bet() {
        assert_eq!(parse_bet("10", 100), Ok(10));
        assert_eq!(parse_bet(" 100\n", 100), Ok(100));
        assert!(matches!(
            parse_bet("ten", 100),
            Err(BlackjackGameError::InvalidBet { .. })
        ));
        assert!(parse_bet("2.5", 100).is_err());
        assert!(parse_bet("-3", 100).is_err());
        assert!(parse_bet("0", 100).is_err());
        assert!(parse_bet("101", 100).is_err());
        assert!(parse_bet("", 100).is_err());
    }

    proptest! {
        #[test]
        fn settlement_is_total(
            seed in any::<u64>(),
            two_hands in any::<bool>(),
            hits in prop::collection::vec(any::<bool>(), 0..12),
        ) {
            let config = TableConfig::new()
                .num_decks(1)
                .reshuffle_threshold(0)
                .seed(seed)
                .build();
            let mut game = BlackjackGame::new(config).unwrap();
            let hands = if two_hands { HandCount::Two } else { HandCount::One };
            game.start_round(10, hands).unwrap();

            for hit in hits {
                let index = match game.seat().hands().iter().position(|h| h.is_active()) {
                    Some(index) => index,
                    None => break,
                };
                if hit {
                    game.hit(index).unwrap();
                } else {
                    game.stand(index).unwrap();
                }
            }
            while let Some(index) = game.seat().hands().iter().position(|h| h.is_active()) {
                game.stand(index).unwrap();
            }

            let snapshot = game.snapshot();
            prop_assert!(snapshot.round_over);
            let mut net = 0;
            for hand in snapshot.hands.iter() {
                let outcome = hand.outcome;
                prop_assert!(outcome.is_some());
                net += outcome.map(|o| o.net(10)).unwrap_or_default();
                if hand.value > BLACKJACK {
                    prop_assert_eq!(outcome, Some(HandOutcome::Bust));
                }
            }
            prop_assert_eq!(snapshot.bankroll, 100 + net);

            // nothing was rebuilt, so every card is either in the shoe or on the table
            prop_assert_eq!(game.shoe().rebuilds(), 0);
            let on_table: usize = snapshot.hands.iter().map(|h| h.cards.len()).sum::<usize>()
                + snapshot.dealer.cards.len();
            prop_assert_eq!(game.shoe().remaining() + on_table, 52);
            prop_assert_eq!(game.shoe().dealt_since_rebuild(), on_table);
        }

        #[test]
        fn dealt_cards_leave_the_shoe(seed in any::<u64>(), rounds in 1usize..20) {
            let config = ShoeConfig { num_decks: 2, reshuffle_threshold: 30, seed: Some(seed) };
            let table_config = TableConfig::new()
                .num_decks(config.num_decks)
                .reshuffle_threshold(config.reshuffle_threshold)
                .build();
            let mut game = BlackjackGame::with_shoe(table_config, Shoe::new(config).unwrap());
            for _ in 0..rounds {
                game.start_round(1, HandCount::One).unwrap();
                game.stand(0).unwrap();
                let shoe = game.shoe();
                prop_assert_eq!(shoe.remaining() + shoe.dealt_since_rebuild(), shoe.capacity());
            }
        }
    }
}
