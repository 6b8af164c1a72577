use thiserror::Error;

/// Errors produced by the blackjack engine. `InvalidBet` and `InactiveHand` are recoverable and leave the
/// table untouched, `InvalidShoeConfig` can only happen while building a shoe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlackjackGameError {
    #[error("invalid bet '{input}': bet must be a whole number between 1 and {bankroll}")]
    InvalidBet { input: String, bankroll: i64 },
    #[error("hand #{index} is not active")]
    InactiveHand { index: usize },
    #[error("invalid shoe configuration: {deck_count} decks")]
    InvalidShoeConfig { deck_count: u32 },
}

impl BlackjackGameError {
    /// True for the errors a caller is expected to recover from by re-prompting.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BlackjackGameError::InvalidShoeConfig { .. })
    }
}
