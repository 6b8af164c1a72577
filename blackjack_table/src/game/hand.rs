use crate::game::strategy::CountingStrategy;
use blackjack_lib::Card;
use serde::Serialize;

pub const BLACKJACK: u8 = 21;

/// Applies the soft ace rule to a base total: a single ace is promoted to 11 when that does not bust the hand.
/// Only one ace is ever promoted, two aces at 11 would bust anyway.
pub fn soft_value(base_total: u8, has_ace: bool) -> u8 {
    if has_ace && base_total <= 11 {
        base_total + 10
    } else {
        base_total
    }
}

/// Value of an arbitrary slice of cards, using the same rule as `Hand::value`.
pub fn hand_value(cards: &[Card]) -> u8 {
    let base_total: u8 = cards.iter().map(|c| c.value()).sum();
    soft_value(base_total, cards.iter().any(|c| c.rank.is_ace()))
}

/// A player's or the dealer's hand. Keeps a running base total (aces as 1) and whether an ace was seen,
/// so valuation never has to walk the cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
    base_total: u8,
    has_ace: bool,
}

impl Hand {
    pub fn new() -> Hand {
        Hand::default()
    }

    /// Method for receiving a card. The card's rank is passed on to `counter`, so every card that lands in a
    /// hand is counted, face down or not.
    pub fn add_card<C: CountingStrategy + ?Sized>(&mut self, card: Card, counter: &mut C) {
        self.cards.push(card);
        self.base_total += card.value();
        if card.rank.is_ace() {
            self.has_ace = true;
        }
        counter.update(card.rank);
    }

    pub fn value(&self) -> u8 {
        soft_value(self.base_total, self.has_ace)
    }

    /// True when an ace is currently counted as 11
    pub fn is_soft(&self) -> bool {
        self.value() != self.base_total
    }

    pub fn is_bust(&self) -> bool {
        self.value() > BLACKJACK
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn first_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// The cards a viewer is allowed to see: everything when `reveal_all` is set, otherwise only the first card.
    pub fn visible_cards(&self, reveal_all: bool) -> &[Card] {
        if reveal_all {
            &self.cards
        } else {
            &self.cards[..self.cards.len().min(1)]
        }
    }

    /// Formats the hand for display, masking every card but the first unless `reveal_all` is set.
    pub fn display(&self, reveal_all: bool) -> String {
        let hidden = self.cards.len() - self.visible_cards(reveal_all).len();
        self.visible_cards(reveal_all)
            .iter()
            .map(|c| c.to_string())
            .chain(std::iter::repeat("??".to_string()).take(hidden))
            .collect::<Vec<String>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::strategy::HiLo;
    use blackjack_lib::{Rank, Suit};

    fn hand_of(ranks: &[Rank]) -> (Hand, HiLo) {
        let mut hilo = HiLo::default();
        let mut hand = Hand::new();
        for (i, rank) in ranks.iter().enumerate() {
            hand.add_card(Card::new(Suit::ALL[i % 4], *rank), &mut hilo);
        }
        (hand, hilo)
    }

    #[test]
    fn test_soft_seventeen() {
        let (hand, _) = hand_of(&[Rank::Ace, Rank::Six]);
        assert_eq!(hand.value(), 17);
        assert!(hand.is_soft());
        assert!(!hand.is_bust());
    }

    #[test]
    fn test_two_aces_and_nine() {
        let (hand, _) = hand_of(&[Rank::Ace, Rank::Ace, Rank::Nine]);
        assert_eq!(hand.value(), 21);
    }

    #[test]
    fn test_pair_of_aces() {
        let (hand, _) = hand_of(&[Rank::Ace, Rank::Ace]);
        assert_eq!(hand.value(), 12);
    }

    #[test]
    fn test_ace_drops_to_one() {
        let (hand, _) = hand_of(&[Rank::Ace, Rank::Six, Rank::Nine]);
        assert_eq!(hand.value(), 16);
        assert!(!hand.is_soft());
    }

    #[test]
    fn test_bust() {
        let (hand, _) = hand_of(&[Rank::Ten, Rank::Nine, Rank::Five]);
        assert_eq!(hand.value(), 24);
        assert!(hand.is_bust());
    }

    #[test]
    fn test_face_cards_blackjack() {
        let (hand, _) = hand_of(&[Rank::King, Rank::Ace]);
        assert_eq!(hand.value(), 21);
        assert_eq!(hand_value(hand.cards()), 21);
    }

    #[test]
    fn test_add_card_feeds_counter() {
        let (hand, hilo) = hand_of(&[Rank::Two, Rank::Seven, Rank::King, Rank::Five, Rank::Ace]);
        assert_eq!(hand.len(), 5);
        assert_eq!(hilo.running_count(), 0);
        assert_eq!(hilo.cards_counted(), 5);
    }

    #[test]
    fn test_display_hides_all_but_first() {
        let (hand, _) = hand_of(&[Rank::Seven, Rank::Six, Rank::Two]);
        assert_eq!(hand.display(false), "7♥ ?? ??");
        assert_eq!(hand.display(true), "7♥ 6♦ 2♠");
        assert_eq!(hand.visible_cards(false).len(), 1);
        assert_eq!(Hand::new().display(false), "");
    }
}
