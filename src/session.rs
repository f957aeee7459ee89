use std::collections::HashMap;

use crate::{
    error::StoreError,
    round::{Round, StoredRound},
};

/// Per-session storage for the round in play. Rounds are kept as JSON with
/// cards written as rank+suit tokens.
pub trait SessionStore {
    fn load(&self, session_id: &str) -> Result<Option<Round>, StoreError>;

    fn save(&mut self, session_id: &str, round: &Round) -> Result<(), StoreError>;

    fn clear(&mut self, session_id: &str) -> Result<(), StoreError>;
}

pub fn encode_round(round: &Round) -> Result<String, StoreError> {
    Ok(serde_json::to_string(round)?)
}

pub fn decode_round(payload: &str) -> Result<Round, StoreError> {
    let stored: StoredRound = serde_json::from_str(payload)?;
    Ok(Round::try_from(stored)?)
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    rounds: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore::default()
    }

    /// Raw stored payload, as a browser would see it.
    pub fn payload(&self, session_id: &str) -> Option<&str> {
        self.rounds.get(session_id).map(String::as_str)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, session_id: &str) -> Result<Option<Round>, StoreError> {
        self.rounds
            .get(session_id)
            .map(|payload| decode_round(payload))
            .transpose()
    }

    fn save(&mut self, session_id: &str, round: &Round) -> Result<(), StoreError> {
        self.rounds.insert(session_id.to_string(), encode_round(round)?);
        Ok(())
    }

    fn clear(&mut self, session_id: &str) -> Result<(), StoreError> {
        self.rounds.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::error::DeckError;

    #[test]
    fn saved_round_loads_back() {
        let mut rng = SmallRng::seed_from_u64(11);
        let round = Round::deal(&mut rng).unwrap();
        let mut store = MemorySessionStore::new();
        store.save("s1", &round).unwrap();

        assert_eq!(store.load("s1").unwrap(), Some(round));
        assert_eq!(store.load("s2").unwrap(), None);
    }

    #[test]
    fn clear_forgets_the_round() {
        let mut store = MemorySessionStore::new();
        store.save("s1", &Round::default()).unwrap();
        store.clear("s1").unwrap();
        assert_eq!(store.load("s1").unwrap(), None);
    }

    #[test]
    fn repeated_card_is_an_invalid_deck() {
        let payload = r#"{"deck":["AS","AS"],"player":[],"dealer":[],"state":"in_progress"}"#;
        assert!(matches!(
            decode_round(payload),
            Err(StoreError::InvalidDeck(DeckError::DuplicateCard(_)))
        ));
    }

    #[test]
    fn card_shared_by_deck_and_hand_is_an_invalid_deck() {
        let payload = r#"{"deck":["KC"],"player":["KC","2D"],"dealer":[],"state":"in_progress"}"#;
        assert!(matches!(
            decode_round(payload),
            Err(StoreError::InvalidDeck(DeckError::DuplicateCard(_)))
        ));
    }

    #[test]
    fn unknown_token_is_a_serialization_error() {
        let payload = r#"{"deck":[],"player":["ZZ"],"dealer":[],"state":"resolved"}"#;
        assert!(matches!(
            decode_round(payload),
            Err(StoreError::Serialization(_))
        ));
    }
}
