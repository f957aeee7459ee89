use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::{
    error::StoreError,
    records::{
        contains_round, leaderboard, summarize, GameResult, LeaderboardEntry, RecordStore, Summary,
    },
    round::Round,
    session::{decode_round, encode_round, SessionStore},
};

fn js_error(err: JsValue) -> StoreError {
    StoreError::Storage(format!("{err:?}"))
}

fn window() -> Result<web_sys::Window, StoreError> {
    web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))
}

fn session_storage() -> Result<Storage, StoreError> {
    window()?
        .session_storage()
        .map_err(js_error)?
        .ok_or_else(|| StoreError::Unavailable("sessionStorage".to_string()))
}

fn local_storage() -> Result<Storage, StoreError> {
    window()?
        .local_storage()
        .map_err(js_error)?
        .ok_or_else(|| StoreError::Unavailable("localStorage".to_string()))
}

/// Rounds kept in the tab's `sessionStorage`, one key per session id.
pub struct WebSessionStore {
    storage: Storage,
    prefix: String,
}

impl WebSessionStore {
    pub fn open(prefix: &str) -> Result<Self, StoreError> {
        Ok(WebSessionStore {
            storage: session_storage()?,
            prefix: prefix.to_string(),
        })
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}{}", self.prefix, session_id)
    }
}

impl SessionStore for WebSessionStore {
    fn load(&self, session_id: &str) -> Result<Option<Round>, StoreError> {
        self.storage
            .get_item(&self.key(session_id))
            .map_err(js_error)?
            .map(|payload| decode_round(&payload))
            .transpose()
    }

    fn save(&mut self, session_id: &str, round: &Round) -> Result<(), StoreError> {
        let payload = encode_round(round)?;
        self.storage
            .set_item(&self.key(session_id), &payload)
            .map_err(js_error)
    }

    fn clear(&mut self, session_id: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(&self.key(session_id))
            .map_err(js_error)
    }
}

/// Game results kept as one JSON list under a `localStorage` key, so they
/// outlive the tab.
pub struct WebRecordStore {
    storage: Storage,
    key: String,
}

impl WebRecordStore {
    pub fn open(key: &str) -> Result<Self, StoreError> {
        Ok(WebRecordStore {
            storage: local_storage()?,
            key: key.to_string(),
        })
    }

    fn read_all(&self) -> Result<Vec<GameResult>, StoreError> {
        match self.storage.get_item(&self.key).map_err(js_error)? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(Vec::new()),
        }
    }
}

impl RecordStore for WebRecordStore {
    fn append(&mut self, result: GameResult) -> Result<bool, StoreError> {
        let mut results = self.read_all()?;
        if contains_round(&results, result.round_id) {
            return Ok(false);
        }
        results.push(result);
        let payload = serde_json::to_string(&results)?;
        self.storage.set_item(&self.key, &payload).map_err(js_error)?;
        Ok(true)
    }

    fn summary(&self, user: &str) -> Result<Summary, StoreError> {
        Ok(summarize(&self.read_all()?, user))
    }

    fn top_n(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(leaderboard(&self.read_all()?, n))
    }
}
