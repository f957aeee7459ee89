use serde::{Deserialize, Serialize};

use crate::deck::{Card, Rank};

pub const BLACKJACK: u32 = 21;

/// Points taken off an ace when it drops from 11 to 1.
const ACE_DEMOTION: u32 = 10;

/// Scores a run of cards: the total and whether an ace still counts as 11.
pub fn hand_value(cards: &[Card]) -> (u32, bool) {
    let (total, aces) = cards.iter().fold((0, 0), |(total, aces), card| {
        (total + card.value(), aces + u32::from(card.rank == Rank::Ace))
    });
    let (total, soft_aces) = (0..aces).fold((total, aces), |(total, soft), _| {
        if total > BLACKJACK {
            (total - ACE_DEMOTION, soft - 1)
        } else {
            (total, soft)
        }
    });
    (total, soft_aces > 0)
}

/// Cards held by the player or the dealer, in the order they were dealt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
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

    pub fn score(&self) -> u32 {
        hand_value(&self.cards).0
    }

    pub fn is_soft(&self) -> bool {
        hand_value(&self.cards).1
    }

    pub fn is_bust(&self) -> bool {
        self.score() > BLACKJACK
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Hand { cards }
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Hand {
            cards: iter.into_iter().collect(),
        }
    }
}
