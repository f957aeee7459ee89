use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod deck;
pub mod error;
pub mod hand;
pub mod logging;
pub mod records;
pub mod round;
pub mod session;
pub mod storage;
pub mod table;
pub mod view;

pub use config::TableConfig;
pub use deck::{Card, Deck, Rank, Suit, DECK_SIZE};
pub use error::{CardParseError, DeckError, RoundError, StoreError, TableError};
pub use hand::{hand_value, Hand, BLACKJACK};
pub use records::{GameResult, LeaderboardEntry, MemoryRecordStore, RecordStore, Summary};
pub use round::{decide_outcome, Action, Outcome, Resolution, Round, RoundState, DEALER_STANDS_ON};
pub use session::{MemorySessionStore, SessionStore};
pub use table::Table;
pub use view::RoundView;

use storage::{WebRecordStore, WebSessionStore};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}

fn rejected(err: TableError) -> JsValue {
    let message = JsValue::from_str(&err.to_string());
    web_sys::console::warn_1(&message);
    message
}

/// Browser-facing table: rounds live in `sessionStorage`, results in
/// `localStorage`.
#[wasm_bindgen]
pub struct BlackjackTable {
    table: Table<WebSessionStore, WebRecordStore>,
}

#[wasm_bindgen]
impl BlackjackTable {
    #[wasm_bindgen(constructor)]
    pub fn new(params: &JsValue) -> Result<BlackjackTable, JsValue> {
        console_error_panic_hook::set_once();
        let config: TableConfig = if params.is_undefined() || params.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(params.clone())
                .map_err(|err| JsValue::from_str(&format!("Invalid config: {err}")))?
        };
        logging::init(&config.log_level);

        let sessions = WebSessionStore::open(&config.session_key_prefix)
            .map_err(|err| JsValue::from_str(&format!("Session store failed: {err}")))?;
        let records = WebRecordStore::open(&config.records_key)
            .map_err(|err| JsValue::from_str(&format!("Record store failed: {err}")))?;

        Ok(BlackjackTable {
            table: Table::new(config, sessions, records),
        })
    }

    pub fn start(&mut self, session_id: &str) -> Result<JsValue, JsValue> {
        console_error_panic_hook::set_once();
        let view = self.table.start(session_id).map_err(rejected)?;
        to_js(&view)
    }

    pub fn hit(&mut self, session_id: &str, user: &str) -> Result<JsValue, JsValue> {
        console_error_panic_hook::set_once();
        let view = self.table.hit(session_id, user).map_err(rejected)?;
        to_js(&view)
    }

    pub fn stand(&mut self, session_id: &str, user: &str) -> Result<JsValue, JsValue> {
        console_error_panic_hook::set_once();
        let view = self.table.stand(session_id, user).map_err(rejected)?;
        to_js(&view)
    }

    /// The current round for a page reload, or `null` before the first deal.
    pub fn current(&self, session_id: &str) -> Result<JsValue, JsValue> {
        console_error_panic_hook::set_once();
        match self.table.current(session_id).map_err(rejected)? {
            Some(view) => to_js(&view),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn leave(&mut self, session_id: &str) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        self.table.leave(session_id).map_err(rejected)
    }

    pub fn summary(&self, user: &str) -> Result<JsValue, JsValue> {
        console_error_panic_hook::set_once();
        let summary = self.table.summary(user).map_err(rejected)?;
        to_js(&summary)
    }

    pub fn leaderboard(&self) -> Result<JsValue, JsValue> {
        console_error_panic_hook::set_once();
        let entries = self.table.leaderboard().map_err(rejected)?;
        to_js(&entries)
    }
}
