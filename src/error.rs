//! Error kinds surfaced by the game core.
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// Dictionary fetch failed or the list was empty after filtering.
    /// Blocks the Start state until the page is reloaded.
    #[error("word dictionary unavailable: {0}")]
    WordSourceUnavailable(String),
    /// High-score read/write failure. Recovered locally, never fatal.
    #[error("high score storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl GameError {
    pub fn word_source(err: &JsValue) -> Self {
        GameError::WordSourceUnavailable(describe(err))
    }

    pub fn storage(err: &JsValue) -> Self {
        GameError::StorageUnavailable(describe(err))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
