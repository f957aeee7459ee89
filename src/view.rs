use serde::Serialize;

use crate::{
    deck::Card,
    hand::{hand_value, BLACKJACK},
    round::{Outcome, Resolution, Round, RoundState},
};

/// What the page shows for a round. While the round is open the dealer's
/// hole card is `None` and the dealer score counts the up card only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub player_cards: Vec<Card>,
    pub dealer_cards: Vec<Option<Card>>,
    pub player_score: u32,
    pub dealer_score: u32,
    pub state: RoundState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Round> for RoundView {
    fn from(round: &Round) -> Self {
        let hide_hole = round.state() == RoundState::InProgress;
        let dealer_cards: Vec<Option<Card>> = round
            .dealer()
            .cards()
            .iter()
            .enumerate()
            .map(|(index, card)| (!hide_hole || index == 0).then_some(*card))
            .collect();
        let visible: Vec<Card> = dealer_cards.iter().flatten().copied().collect();

        RoundView {
            player_cards: round.player().cards().to_vec(),
            dealer_cards,
            player_score: round.player().score(),
            dealer_score: hand_value(&visible).0,
            state: round.state(),
            outcome: round.outcome(),
            message: round.resolution().map(|r| outcome_message(&r).to_string()),
        }
    }
}

pub fn outcome_message(resolution: &Resolution) -> &'static str {
    match resolution.outcome {
        Outcome::Loss if resolution.player_score > BLACKJACK => "You bust. Dealer wins.",
        Outcome::Loss => "Dealer wins.",
        Outcome::Win if resolution.dealer_score > BLACKJACK => "Dealer busts. You win!",
        Outcome::Win => "You win!",
        Outcome::Tie => "Push (tie).",
    }
}
