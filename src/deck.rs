use std::{collections::HashSet, fmt, str::FromStr};

use rand::{rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{CardParseError, DeckError, RoundError};

pub const DECK_SIZE: usize = 52;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Point value with the ace counted high; scoring demotes it when needed.
    pub fn value(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }

    fn from_symbol(symbol: &str) -> Option<Rank> {
        let rank = match symbol {
            "A" => Rank::Ace,
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            _ => return None,
        };
        Some(rank)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
        }
    }

    fn from_symbol(symbol: char) -> Option<Suit> {
        match symbol {
            'S' => Some(Suit::Spades),
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            'C' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

/// A playing card. Serializes as a rank+suit token such as `"TS"` or `"AH"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn value(&self) -> u32 {
        self.rank.value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || CardParseError::InvalidToken(token.to_string());
        let mut chars = token.chars();
        let suit = chars.next_back().and_then(Suit::from_symbol).ok_or_else(invalid)?;
        let rank = Rank::from_symbol(chars.as_str()).ok_or_else(invalid)?;
        Ok(Card { rank, suit })
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

/// An ordered pile of unique cards. The top of the deck is the end of the
/// sequence, so dealing pops from the tail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Card>", try_from = "Vec<Card>")]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards, suit-major and rank-minor, unshuffled.
    pub fn new_deck() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
            .collect();
        Deck { cards }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Deck::new_deck();
        deck.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        Deck::shuffled(&mut rng)
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Builds a deck from an explicit order, last card on top.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.len() > DECK_SIZE {
            return Err(DeckError::TooManyCards(cards.len()));
        }
        let mut seen = HashSet::with_capacity(cards.len());
        if let Some(card) = cards.iter().find(|card| !seen.insert(**card)) {
            return Err(DeckError::DuplicateCard(*card));
        }
        Ok(Deck { cards })
    }

    pub fn deal_one(&mut self) -> Result<Card, RoundError> {
        self.cards.pop().ok_or(RoundError::EmptyDeck)
    }

    pub fn remaining_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl TryFrom<Vec<Card>> for Deck {
    type Error = DeckError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        Deck::from_cards(cards)
    }
}

impl From<Deck> for Vec<Card> {
    fn from(deck: Deck) -> Self {
        deck.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(token: &str) -> Card {
        token.parse().unwrap()
    }

    #[test]
    fn new_deck_has_52_distinct_cards() {
        let deck = Deck::new_deck();
        let unique: HashSet<_> = deck.cards().iter().copied().collect();
        assert_eq!(deck.remaining_cards(), DECK_SIZE);
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn dealing_takes_from_the_top() {
        let mut deck = Deck::from_cards(vec![card("2C"), card("KH")]).unwrap();
        assert_eq!(deck.deal_one(), Ok(card("KH")));
        assert_eq!(deck.deal_one(), Ok(card("2C")));
        assert_eq!(deck.deal_one(), Err(RoundError::EmptyDeck));
    }

    #[test]
    fn dealt_cards_leave_the_deck() {
        let mut deck = Deck::shuffled_with_seed(7);
        let dealt: Vec<Card> = (0..10).map(|_| deck.deal_one().unwrap()).collect();
        assert_eq!(deck.remaining_cards(), DECK_SIZE - 10);
        assert!(dealt.iter().all(|card| !deck.contains(card)));
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        assert_eq!(Deck::shuffled_with_seed(42), Deck::shuffled_with_seed(42));
        assert_ne!(Deck::shuffled_with_seed(1), Deck::shuffled_with_seed(2));
    }

    #[test]
    fn tokens_parse_and_print() {
        assert_eq!(card("TS"), Card::new(Rank::Ten, Suit::Spades));
        assert_eq!(card("10S"), Card::new(Rank::Ten, Suit::Spades));
        assert_eq!(Card::new(Rank::Ace, Suit::Diamonds).to_string(), "AD");
        assert!("1S".parse::<Card>().is_err());
        assert!("AX".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }

    #[test]
    fn rejects_duplicate_and_oversized_decks() {
        assert_eq!(
            Deck::from_cards(vec![card("AS"), card("AS")]),
            Err(DeckError::DuplicateCard(card("AS")))
        );
        let mut cards = Deck::new_deck().cards().to_vec();
        cards.push(card("AS"));
        assert_eq!(Deck::from_cards(cards), Err(DeckError::TooManyCards(53)));
    }

    #[test]
    fn deck_serializes_as_token_list() {
        let deck = Deck::from_cards(vec![card("7H"), card("QC")]).unwrap();
        let json = serde_json::to_string(&deck).unwrap();
        assert_eq!(json, r#"["7H","QC"]"#);
        assert!(serde_json::from_str::<Deck>(r#"["7H","7H"]"#).is_err());
    }
}
