use thiserror::Error;

use crate::{
    deck::Card,
    round::{Action, RoundState},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("invalid card token: {0:?}")]
    InvalidToken(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck holds {0} cards, a single deck has 52")]
    TooManyCards(usize),

    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
}

/// Failures raised by the round engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RoundError {
    /// The deck ran out before the round resolved. Never happens with a
    /// fresh 52-card deck and one hand each.
    #[error("deck is empty")]
    EmptyDeck,

    #[error("cannot {action} while the round is {state}")]
    InvalidState { action: Action, state: RoundState },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored round whose cards are not distinct cards of one deck.
    #[error("stored round is invalid: {0}")]
    InvalidDeck(#[from] DeckError),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage operation failed: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Round(#[from] RoundError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
