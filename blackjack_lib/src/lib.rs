//! Building blocks shared by every blackjack table: cards, the shoe they are drawn from, and the
//! errors the engine reports.

mod card;
mod error;
mod shoe;

pub use card::{Card, Rank, Suit};
pub use error::BlackjackGameError;
pub use shoe::{Draw, Shoe, ShoeConfig, CARDS_PER_DECK};
