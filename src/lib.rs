//! Type Rush core crate.
//!
//! Words scroll in from the right edge of a canvas; type one and press space or
//! Enter to clear it before it escapes on the left. The gameplay loop and its
//! state machine live in [`game`] and are host-agnostic; [`web`] wires them to
//! the browser.

use wasm_bindgen::prelude::*;

pub mod error;
pub mod game;
pub mod options;
pub mod web;

pub use error::GameError;
pub use options::GameOptions;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Start with the default options (`dictionary.txt`, classic pacing).
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::launch(GameOptions::default())
}

/// Start with a partial JSON options object; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_options(json: &str) -> Result<(), JsValue> {
    let opts = GameOptions::from_json(json)
        .map_err(|e| JsValue::from_str(&format!("invalid game options: {e}")))?;
    web::launch(opts)
}
