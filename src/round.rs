use std::{collections::HashSet, fmt};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    deck::{Card, Deck, DECK_SIZE},
    error::{DeckError, RoundError},
    hand::{Hand, BLACKJACK},
};

/// The dealer keeps drawing until reaching this score, soft totals included.
pub const DEALER_STANDS_ON: u32 = 17;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    #[default]
    NotStarted,
    InProgress,
    Resolved,
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoundState::NotStarted => "not started",
            RoundState::InProgress => "in progress",
            RoundState::Resolved => "resolved",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Hit,
    Stand,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Hit => f.write_str("hit"),
            Action::Stand => f.write_str("stand"),
        }
    }
}

/// Final scores and outcome of a resolved round, from the player's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub player_score: u32,
    pub dealer_score: u32,
    pub outcome: Outcome,
}

/// Player bust beats everything, then dealer bust, then the higher score.
pub fn decide_outcome(player_score: u32, dealer_score: u32) -> Outcome {
    if player_score > BLACKJACK {
        Outcome::Loss
    } else if dealer_score > BLACKJACK || player_score > dealer_score {
        Outcome::Win
    } else if player_score < dealer_score {
        Outcome::Loss
    } else {
        Outcome::Tie
    }
}

/// One round of single-deck blackjack. The value is loaded from and saved
/// back to the session around every action; it holds no other state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRound")]
pub struct Round {
    id: u64,
    deck: Deck,
    player: Hand,
    dealer: Hand,
    state: RoundState,
    outcome: Option<Outcome>,
    recorded: bool,
}

/// A round as read back from storage, before the cards are checked.
#[derive(Deserialize)]
pub struct StoredRound {
    #[serde(default)]
    id: u64,
    deck: Vec<Card>,
    player: Hand,
    dealer: Hand,
    state: RoundState,
    #[serde(default)]
    outcome: Option<Outcome>,
    #[serde(default)]
    recorded: bool,
}

/// Deck and both hands together must be distinct cards from one deck.
impl TryFrom<StoredRound> for Round {
    type Error = DeckError;

    fn try_from(stored: StoredRound) -> Result<Self, Self::Error> {
        let in_play = stored.deck.len() + stored.player.len() + stored.dealer.len();
        if in_play > DECK_SIZE {
            return Err(DeckError::TooManyCards(in_play));
        }
        let mut seen = HashSet::with_capacity(in_play);
        let all = stored
            .deck
            .iter()
            .chain(stored.player.cards())
            .chain(stored.dealer.cards());
        for card in all {
            if !seen.insert(*card) {
                return Err(DeckError::DuplicateCard(*card));
            }
        }
        Ok(Round {
            id: stored.id,
            deck: Deck::from_cards(stored.deck)?,
            player: stored.player,
            dealer: stored.dealer,
            state: stored.state,
            outcome: stored.outcome,
            recorded: stored.recorded,
        })
    }
}

impl Round {
    /// Shuffles a fresh deck and deals from it. The round id comes from the
    /// same generator, so a seeded table repeats its rounds.
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, RoundError> {
        let deck = Deck::shuffled(rng);
        Round::deal_with_id(rng.gen(), deck)
    }

    /// Deals two cards each, alternating player and dealer, from `deck`.
    pub fn deal_from(deck: Deck) -> Result<Self, RoundError> {
        Round::deal_with_id(rand::random(), deck)
    }

    fn deal_with_id(id: u64, mut deck: Deck) -> Result<Self, RoundError> {
        let mut player = Hand::new();
        let mut dealer = Hand::new();
        for _ in 0..2 {
            player.push(deck.deal_one()?);
            dealer.push(deck.deal_one()?);
        }
        debug!(
            player_score = player.score(),
            remaining = deck.remaining_cards(),
            "round dealt"
        );
        Ok(Round {
            id,
            deck,
            player,
            dealer,
            state: RoundState::InProgress,
            outcome: None,
            recorded: false,
        })
    }

    /// Gives the player one card. A bust resolves the round as a loss at
    /// once and the dealer does not draw.
    pub fn hit(&mut self) -> Result<Option<Resolution>, RoundError> {
        self.ensure_in_progress(Action::Hit)?;
        let card = self.deck.deal_one()?;
        self.player.push(card);
        debug!(%card, player_score = self.player.score(), "player hit");

        if self.player.is_bust() {
            return Ok(Some(self.resolve(Outcome::Loss)));
        }
        Ok(None)
    }

    pub fn stand(&mut self) -> Result<Resolution, RoundError> {
        self.ensure_in_progress(Action::Stand)?;
        self.play_dealer()?;
        let outcome = decide_outcome(self.player.score(), self.dealer.score());
        Ok(self.resolve(outcome))
    }

    fn play_dealer(&mut self) -> Result<(), RoundError> {
        while self.dealer.score() < DEALER_STANDS_ON && !self.deck.is_empty() {
            let card = self.deck.deal_one()?;
            self.dealer.push(card);
            debug!(%card, dealer_score = self.dealer.score(), "dealer drew");
        }
        Ok(())
    }

    fn ensure_in_progress(&self, action: Action) -> Result<(), RoundError> {
        if self.state != RoundState::InProgress {
            return Err(RoundError::InvalidState {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    fn resolve(&mut self, outcome: Outcome) -> Resolution {
        self.state = RoundState::Resolved;
        self.outcome = Some(outcome);
        let resolution = Resolution {
            player_score: self.player.score(),
            dealer_score: self.dealer.score(),
            outcome,
        };
        debug!(?resolution, "round resolved");
        resolution
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.outcome.map(|outcome| Resolution {
            player_score: self.player.score(),
            dealer_score: self.dealer.score(),
            outcome,
        })
    }

    /// Identifies the round to the record store, which keeps one result per id.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn player(&self) -> &Hand {
        &self.player
    }

    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Whether the result of this round already went to the record store.
    pub fn is_recorded(&self) -> bool {
        self.recorded
    }

    pub fn mark_recorded(&mut self) {
        self.recorded = true;
    }
}
