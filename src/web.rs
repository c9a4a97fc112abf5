//! Browser host: canvas rendering, HUD readouts, localStorage high score,
//! keyboard listener binding, dictionary fetch and the animation-frame loop.
use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, KeyboardEvent, Response,
    Storage, Window, window,
};

use crate::error::GameError;
use crate::game::{Game, KeyEvent, Listener, Platform, ScoreStorage, Surface, Word, WordSource};
use crate::options::GameOptions;

const FONT_STACK: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif";
const TEXT_LIGHT: &str = "#ecf0f1";
const TEXT_BLUE: &str = "#3498db";
const TEXT_RED: &str = "#e74c3c";
const TEXT_GOLD: &str = "#f39c12";

type KeyCallback = Closure<dyn FnMut(KeyboardEvent)>;

thread_local! {
    static GAME: RefCell<Option<Game<WebHost>>> = const { RefCell::new(None) };
}

/// Runs `f` against the live game, if one has been started. Never re-entered:
/// listeners, frames and the fetch continuation all run on the JS event loop.
fn with_game<R>(f: impl FnOnce(&mut Game<WebHost>) -> R) -> Option<R> {
    GAME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

// --- Host -------------------------------------------------------------------------

pub struct WebHost {
    window: Window,
    document: Document,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    score_el: Element,
    speed_el: Element,
    buffer_el: Element,
    storage_key: String,
    // One closure per listener kind, alive as long as the host.
    restart_cb: KeyCallback,
    typing_cb: KeyCallback,
}

impl WebHost {
    pub fn new(opts: &GameOptions) -> Result<Self, JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let doc = win
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let width = win.inner_width()?.as_f64().unwrap_or(800.0);
        let height = win.inner_height()?.as_f64().unwrap_or(600.0) * opts.canvas_height_ratio;

        // Reuse the page's canvas when present
        let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("canvas") {
            el.dyn_into()?
        } else {
            let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
            c.set_id("canvas");
            c.set_attribute("style", "display:block; background:#2c3e50;").ok();
            body(&doc)?.append_child(&c)?;
            c
        };
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let score_el = hud_value(&doc, "score-value", "Score")?;
        let speed_el = hud_value(&doc, "speed-value", "Speed")?;
        let buffer_el = hud_value(&doc, "buffer-value", "Typed")?;

        Ok(Self {
            window: win,
            document: doc,
            ctx,
            width,
            height,
            score_el,
            speed_el,
            buffer_el,
            storage_key: opts.high_score_key.clone(),
            restart_cb: key_callback(Listener::Restart),
            typing_cb: key_callback(Listener::Typing),
        })
    }

    fn callback(&self, listener: Listener) -> &js_sys::Function {
        let cb = match listener {
            Listener::Restart => &self.restart_cb,
            Listener::Typing => &self.typing_cb,
        };
        cb.as_ref().unchecked_ref()
    }

    fn storage(&self) -> Result<Storage, GameError> {
        self.window
            .local_storage()
            .map_err(|e| GameError::storage(&e))?
            .ok_or_else(|| GameError::StorageUnavailable("localStorage disabled".to_string()))
    }

    fn centered(&self, text: &str, font: &str, color: &str, dy: f64) {
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(&format!("{font} {FONT_STACK}"));
        self.ctx
            .fill_text(text, self.width / 2.0, self.height / 2.0 + dy)
            .ok();
    }
}

fn body(doc: &Document) -> Result<web_sys::HtmlElement, JsValue> {
    doc.body().ok_or_else(|| JsValue::from_str("no body"))
}

// Finds the page's readout element or appends a minimal HUD entry for it.
fn hud_value(doc: &Document, id: &str, label: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let row = doc.create_element("div")?;
    row.set_attribute("style", "display:inline-block; margin:6px 14px; font-family:'Fira Code', monospace; font-size:16px; color:#ecf0f1;").ok();
    row.set_text_content(Some(&format!("{label}: ")));
    let value = doc.create_element("span")?;
    value.set_id(id);
    row.append_child(&value)?;
    body(doc)?.append_child(&row)?;
    Ok(value)
}

fn key_callback(listener: Listener) -> KeyCallback {
    Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        if listener == Listener::Typing && evt.key() == " " {
            evt.prevent_default(); // keep space from scrolling the page
        }
        let event = KeyEvent {
            key: evt.key(),
            shift: evt.shift_key(),
            repeat: evt.repeat(),
        };
        with_game(|g| g.dispatch(listener, &event));
    }) as Box<dyn FnMut(_)>)
}

impl Surface for WebHost {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_word(&mut self, word: &Word) {
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("alphabetic");
        self.ctx.set_fill_style_str(TEXT_LIGHT);
        self.ctx.set_font(&format!("bold 32px {FONT_STACK}"));
        self.ctx.fill_text(&word.text, word.x, word.y).ok();
    }

    fn draw_loading(&mut self) {
        self.centered("Loading words...", "24px", TEXT_LIGHT, 0.0);
    }

    fn draw_title(&mut self) {
        self.centered("Press 'R' to Start", "bold 48px", TEXT_BLUE, 0.0);
        self.centered("Type the words before they disappear!", "24px", TEXT_LIGHT, 60.0);
    }

    fn draw_game_over(&mut self, final_score: u64, high_score: u64) {
        self.centered("Game Over", "bold 56px", TEXT_RED, -80.0);
        self.centered(&format!("Final Score: {final_score}"), "bold 36px", TEXT_BLUE, -10.0);
        self.centered(&format!("High Score: {high_score}"), "bold 28px", TEXT_GOLD, 40.0);
        self.centered("Press 'R' to Restart", "24px", TEXT_LIGHT, 90.0);
    }

    fn show_score(&mut self, score: u64) {
        self.score_el.set_text_content(Some(&score.to_string()));
    }

    fn show_speed(&mut self, speed: f64) {
        self.speed_el.set_text_content(Some(&speed.to_string()));
    }

    fn show_buffer(&mut self, text: &str) {
        self.buffer_el.set_text_content(Some(text));
    }

    fn notify_blocking(&mut self, message: &str) {
        if self.window.alert_with_message(message).is_err() {
            log::error!("alert failed: {message}");
        }
    }
}

impl ScoreStorage for WebHost {
    fn load(&self) -> Result<Option<String>, GameError> {
        self.storage()?
            .get_item(&self.storage_key)
            .map_err(|e| GameError::storage(&e))
    }

    fn save(&mut self, value: &str) -> Result<(), GameError> {
        self.storage()?
            .set_item(&self.storage_key, value)
            .map_err(|e| GameError::storage(&e))
    }
}

impl Platform for WebHost {
    fn bind_listener(&mut self, listener: Listener) {
        let res = self
            .document
            .add_event_listener_with_callback("keydown", self.callback(listener));
        if res.is_err() {
            log::error!("binding {listener:?} listener failed");
        }
    }

    fn unbind_listener(&mut self, listener: Listener) {
        let res = self
            .document
            .remove_event_listener_with_callback("keydown", self.callback(listener));
        if res.is_err() {
            log::error!("unbinding {listener:?} listener failed");
        }
    }
}

// --- Dictionary ---------------------------------------------------------------------

pub async fn fetch_dictionary(url: &str) -> Result<WordSource, GameError> {
    let win = window().ok_or_else(|| GameError::WordSourceUnavailable("no window".to_string()))?;
    let request: js_sys::Promise = win.fetch_with_str(url);
    let resp: Response = JsFuture::from(request)
        .await
        .and_then(|v| v.dyn_into())
        .map_err(|e| GameError::word_source(&e))?;
    if !resp.ok() {
        return Err(GameError::WordSourceUnavailable(format!(
            "HTTP status {}",
            resp.status()
        )));
    }
    let body = resp.text().map_err(|e| GameError::word_source(&e))?;
    let text = JsFuture::from(body)
        .await
        .map_err(|e| GameError::word_source(&e))?
        .as_string()
        .ok_or_else(|| GameError::WordSourceUnavailable("response body is not text".to_string()))?;
    WordSource::parse(&text)
}

// --- Entry / frame loop ---------------------------------------------------------------

pub fn launch(opts: GameOptions) -> Result<(), JsValue> {
    if GAME.with(|cell| cell.borrow().is_some()) {
        return Err(JsValue::from_str("game already started"));
    }
    let url = opts.dictionary_url.clone();
    let host = WebHost::new(&opts)?;
    let game = Game::new(host, opts, StdRng::from_entropy());
    GAME.with(|cell| cell.replace(Some(game)));
    with_game(|g| g.boot());

    spawn_local(async move {
        let loaded = fetch_dictionary(&url).await;
        // failure is already reported to the player; Start stays unready
        let _ = with_game(|g| g.install_words(loaded));
    });

    start_frame_loop();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_game(|game| game.on_frame(ts));
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(cb: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), cb.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
