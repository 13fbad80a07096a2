use wasm_bindgen::prelude::*;

pub mod bindings;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod ratio;
pub mod roster;
pub mod rotation;
pub mod store;
pub mod types;

pub use bindings::LineupApp;
pub use config::{FieldConfig, RatioPattern};
pub use error::{LineupError, StoreError};
pub use game::GameSession;
pub use types::{Gender, Player, Split, Team};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Routes `log` output to the browser console at `level` (`"info"` if unparseable).
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) -> bool {
    logging::install(logging::parse_level(level))
}
