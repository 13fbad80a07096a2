use wasm_bindgen::prelude::*;

use crate::config::FieldConfig;
use crate::error::{LineupError, StoreError};
use crate::game::GameSession;
use crate::store::{MemoryStore, StateStore};
use crate::types::{Gender, Split, Team};

#[wasm_bindgen]
extern "C" {
    /// Any JS object with the Web Storage `getItem`/`setItem` pair,
    /// e.g. `window.localStorage`.
    pub type JsStorage;

    #[wasm_bindgen(method, catch, js_name = getItem)]
    fn get_item(this: &JsStorage, key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setItem)]
    fn set_item(this: &JsStorage, key: &str, value: &str) -> Result<(), JsValue>;
}

pub struct BrowserStore {
    storage: JsStorage,
}

impl BrowserStore {
    pub fn new(storage: JsStorage) -> Self {
        Self { storage }
    }
}

impl StateStore for BrowserStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|err| StoreError::Backend(format!("{err:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StoreError::Backend(format!("{err:?}")))
    }
}

/// JS handle over one [`GameSession`].
///
/// Every call returns the full snapshot. Rejected calls are logged and
/// return the unchanged snapshot instead of throwing.
#[wasm_bindgen]
pub struct LineupApp {
    session: GameSession,
}

#[wasm_bindgen]
impl LineupApp {
    /// Without `storage` the session lives in memory only.
    #[wasm_bindgen(constructor)]
    pub fn new(storage: Option<JsStorage>) -> Result<LineupApp, JsError> {
        Self::with_config(storage, JsValue::UNDEFINED)
    }

    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(storage: Option<JsStorage>, config: JsValue) -> Result<LineupApp, JsError> {
        let config: FieldConfig = if config.is_undefined() || config.is_null() {
            FieldConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|err| JsError::new(&err.to_string()))?
        };

        let store: Box<dyn StateStore> = match storage {
            Some(storage) => Box::new(BrowserStore::new(storage)),
            None => Box::new(MemoryStore::new()),
        };
        let session = GameSession::new(config, store).map_err(|err| JsError::new(&err.to_string()))?;
        Ok(LineupApp { session })
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.session.snapshot())
            .map_err(|err| JsError::new(&err.to_string()))
    }

    #[wasm_bindgen(js_name = currentField)]
    pub fn current_field(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.session.current_field())
            .map_err(|err| JsError::new(&err.to_string()))
    }

    #[wasm_bindgen(js_name = addPlayer)]
    pub fn add_player(&mut self, name: &str, gender: &str) -> Result<JsValue, JsError> {
        let outcome = gender
            .parse::<Gender>()
            .and_then(|gender| self.session.add_player(name, gender).map(drop));
        self.respond("addPlayer", outcome)
    }

    #[wasm_bindgen(js_name = removePlayer)]
    pub fn remove_player(&mut self, id: f64) -> Result<JsValue, JsError> {
        let outcome = self.session.remove_player(id as u64).map(drop);
        self.respond("removePlayer", outcome)
    }

    #[wasm_bindgen(js_name = renamePlayer)]
    pub fn rename_player(&mut self, id: f64, name: &str) -> Result<JsValue, JsError> {
        let outcome = self.session.rename_player(id as u64, name);
        self.respond("renamePlayer", outcome)
    }

    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self, starting_ratio: &str) -> Result<JsValue, JsError> {
        let outcome = starting_ratio
            .parse::<Split>()
            .and_then(|split| self.session.start_game(split));
        self.respond("startGame", outcome)
    }

    #[wasm_bindgen(js_name = advancePoint)]
    pub fn advance_point(&mut self, scoring_team: &str) -> Result<JsValue, JsError> {
        let outcome = scoring_team
            .parse::<Team>()
            .and_then(|team| self.session.advance_point(team));
        self.respond("advancePoint", outcome)
    }

    #[wasm_bindgen(js_name = undoPoint)]
    pub fn undo_point(&mut self) -> Result<JsValue, JsError> {
        let outcome = self.session.undo_point();
        self.respond("undoPoint", outcome)
    }

    #[wasm_bindgen(js_name = resetGame)]
    pub fn reset_game(&mut self) -> Result<JsValue, JsError> {
        self.session.reset_game();
        self.snapshot()
    }

    #[wasm_bindgen(js_name = setTeamNames)]
    pub fn set_team_names(&mut self, home: &str, away: &str) -> Result<JsValue, JsError> {
        self.session.set_team_names(home, away);
        self.snapshot()
    }

    #[wasm_bindgen(js_name = setStartingRatio)]
    pub fn set_starting_ratio(&mut self, split: &str) -> Result<JsValue, JsError> {
        let outcome = split
            .parse::<Split>()
            .and_then(|split| self.session.set_starting_ratio(split));
        self.respond("setStartingRatio", outcome)
    }

    #[wasm_bindgen(js_name = adjustScore)]
    pub fn adjust_score(&mut self, team: &str, delta: i32) -> Result<JsValue, JsError> {
        let outcome = team
            .parse::<Team>()
            .map(|team| self.session.adjust_score(team, delta));
        self.respond("adjustScore", outcome)
    }

    #[wasm_bindgen(js_name = shiftCursor)]
    pub fn shift_cursor(&mut self, gender: &str, forward: bool) -> Result<JsValue, JsError> {
        let outcome = gender
            .parse::<Gender>()
            .map(|gender| self.session.shift_cursor(gender, forward));
        self.respond("shiftCursor", outcome)
    }

    #[wasm_bindgen(js_name = setRatio)]
    pub fn set_ratio(&mut self, split: &str, points_since_split_change: u8) -> Result<JsValue, JsError> {
        let outcome = split
            .parse::<Split>()
            .map(|split| self.session.set_ratio(split, points_since_split_change));
        self.respond("setRatio", outcome)
    }

    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&mut self) -> Result<JsValue, JsError> {
        self.session.toggle_theme();
        self.snapshot()
    }
}

impl LineupApp {
    fn respond(&self, op: &str, outcome: Result<(), LineupError>) -> Result<JsValue, JsError> {
        if let Err(err) = outcome {
            log::warn!("{op} rejected: {err}");
        }
        self.snapshot()
    }
}
