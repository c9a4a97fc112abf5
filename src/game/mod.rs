//! Typing arcade core: words scroll in from the right and must be typed before
//! they cross the left edge.
//!
//! The machine has three states (`Start`, `Playing`, `GameOver`). Each state
//! owns one keyboard [`Listener`]; [`Game::transition`] is the only place that
//! rebinds it, so exactly one listener is bound at any time. Everything that
//! touches the browser goes through the [`Platform`] seam, which keeps the
//! whole loop runnable natively in tests.
use rand::Rng;
use rand::rngs::StdRng;

use crate::error::GameError;
use crate::options::GameOptions;

mod clock;
mod field;
mod input;
mod score;
mod words;

pub use clock::GameClock;
pub use field::{SpawnPlacer, Word, WordField};
pub use input::{InputBuffer, KeyAction, KeyEvent};
pub use score::{HighScore, ScoreKeeper};
pub use words::WordSource;

pub const LOAD_FAILED_NOTICE: &str = "Failed to load word dictionary. Please refresh the page.";

// --- Host seams ---------------------------------------------------------------

/// Drawing surface plus the three text readouts (score, speed, buffer).
pub trait Surface {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn draw_word(&mut self, word: &Word);
    fn draw_loading(&mut self);
    fn draw_title(&mut self);
    fn draw_game_over(&mut self, final_score: u64, high_score: u64);
    fn show_score(&mut self, score: u64);
    fn show_speed(&mut self, speed: f64);
    fn show_buffer(&mut self, text: &str);
    /// Modal notice the player has to acknowledge.
    fn notify_blocking(&mut self, message: &str);
}

/// Single persisted high-score slot.
pub trait ScoreStorage {
    fn load(&self) -> Result<Option<String>, GameError>;
    fn save(&mut self, value: &str) -> Result<(), GameError>;
}

pub trait Platform: Surface + ScoreStorage {
    fn bind_listener(&mut self, listener: Listener);
    fn unbind_listener(&mut self, listener: Listener);
}

// --- States -------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Listener {
    /// Waits for the restart key (Start / GameOver).
    Restart,
    /// Routes keystrokes into the input buffer (Playing).
    Typing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Start,
    Playing,
    GameOver,
}

impl GameState {
    pub fn listener(self) -> Listener {
        match self {
            GameState::Start | GameState::GameOver => Listener::Restart,
            GameState::Playing => Listener::Typing,
        }
    }
}

/// Mutable state of one play-through.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub keeper: ScoreKeeper,
    pub cycles: u64,
    pub buffer: InputBuffer,
    pub field: WordField,
}

impl GameSession {
    pub fn new(opts: &GameOptions, field_width: f64) -> Self {
        Self {
            keeper: ScoreKeeper::new(opts),
            cycles: 0,
            buffer: InputBuffer::new(),
            field: WordField::new(field_width),
        }
    }

    pub fn score(&self) -> u64 {
        self.keeper.score()
    }

    pub fn speed(&self) -> f64 {
        self.keeper.speed()
    }
}

// --- State machine --------------------------------------------------------------

pub struct Game<P: Platform> {
    host: P,
    opts: GameOptions,
    rng: StdRng,
    state: GameState,
    bound: Option<Listener>,
    words: Option<WordSource>,
    session: GameSession,
    high: HighScore,
    clock: GameClock,
    placer: SpawnPlacer,
}

impl<P: Platform> Game<P> {
    /// Builds the machine in `Start` with nothing bound yet; call [`Game::boot`].
    pub fn new(host: P, opts: GameOptions, rng: StdRng) -> Self {
        let session = GameSession::new(&opts, host.size().0);
        let clock = GameClock::new(opts.tick_interval_ms, opts.max_catch_up_ticks);
        let placer = SpawnPlacer::new(opts.spawn_attempts, opts.min_word_spacing);
        let mut high = HighScore::default();
        high.refresh(&host);
        Self {
            host,
            opts,
            rng,
            state: GameState::Start,
            bound: None,
            words: None,
            session,
            high,
            clock,
            placer,
        }
    }

    pub fn boot(&mut self) {
        self.transition(GameState::Start);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn bound_listener(&self) -> Option<Listener> {
        self.bound
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn high_score(&self) -> u64 {
        self.high.value()
    }

    pub fn is_ready(&self) -> bool {
        self.words.is_some()
    }

    pub fn clock_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn options(&self) -> &GameOptions {
        &self.opts
    }

    pub fn host(&self) -> &P {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut P {
        &mut self.host
    }

    /// Unbind the outgoing listener, bind the incoming one, then run the entry action.
    pub fn transition(&mut self, next: GameState) {
        if let Some(old) = self.bound.take() {
            self.host.unbind_listener(old);
        }
        let listener = next.listener();
        self.host.bind_listener(listener);
        self.bound = Some(listener);
        log::info!("state {:?} -> {:?}", self.state, next);
        self.state = next;
        match next {
            GameState::Start => self.enter_start(),
            GameState::Playing => self.enter_playing(),
            GameState::GameOver => self.enter_game_over(),
        }
    }

    /// Completes the Start entry once the dictionary fetch resolves. On failure
    /// the player gets a blocking notice and Start stays not ready.
    pub fn install_words(&mut self, loaded: Result<WordSource, GameError>) -> Result<(), GameError> {
        match loaded {
            Ok(words) => {
                log::info!("dictionary loaded: {} words", words.len());
                self.words = Some(words);
                if self.state == GameState::Start {
                    self.enter_start();
                }
                Ok(())
            }
            Err(err) => {
                log::error!("{err}");
                self.host.notify_blocking(LOAD_FAILED_NOTICE);
                Err(err)
            }
        }
    }

    /// Key-down from whichever listener is currently bound.
    pub fn on_key(&mut self, event: &KeyEvent) {
        if let Some(listener) = self.bound {
            self.dispatch(listener, event);
        }
    }

    /// Key-down delivered through `listener`. Events arriving through a
    /// listener that is no longer bound are dropped, as are auto-repeats.
    pub fn dispatch(&mut self, listener: Listener, event: &KeyEvent) {
        if self.bound != Some(listener) || event.repeat {
            return;
        }
        match listener {
            Listener::Restart => self.on_restart_key(event),
            Listener::Typing => self.on_typing_key(event),
        }
    }

    /// Called every animation frame with a millisecond timestamp.
    pub fn on_frame(&mut self, now_ms: f64) {
        while self.state == GameState::Playing && self.clock.poll(now_ms) {
            self.tick();
        }
    }

    // --- entry actions ---

    fn enter_start(&mut self) {
        self.host.clear();
        if self.words.is_some() {
            self.host.draw_title();
        } else {
            self.host.draw_loading();
        }
    }

    fn enter_playing(&mut self) {
        self.reset_session();
        self.host.clear();
        self.clock.start();
    }

    fn enter_game_over(&mut self) {
        self.clock.stop();
        let final_score = self.session.score();
        if self.high.record(&mut self.host, final_score) {
            log::info!("new high score {final_score}");
        }
        let high = self.high.value();
        self.reset_session();
        self.host.clear();
        self.host.draw_game_over(final_score, high);
    }

    fn reset_session(&mut self) {
        self.session = GameSession::new(&self.opts, self.host.size().0);
        self.high.refresh(&self.host);
        self.host.show_score(self.session.score());
        self.host.show_speed(self.session.speed());
        self.host.show_buffer(self.session.buffer.display());
    }

    // --- listeners ---

    fn on_restart_key(&mut self, event: &KeyEvent) {
        if !event.is_restart(self.opts.restart_key) {
            return;
        }
        match self.state {
            GameState::Start if self.words.is_none() => {}
            GameState::Start | GameState::GameOver => self.transition(GameState::Playing),
            GameState::Playing => {}
        }
    }

    fn on_typing_key(&mut self, event: &KeyEvent) {
        let Some(action) = KeyAction::classify(event) else {
            return;
        };
        let session = &mut self.session;
        match action {
            KeyAction::Submit => {
                let typed = session.buffer.submit_and_clear();
                if session.field.try_consume(&typed) {
                    let pts = session.keeper.credit(typed.chars().count());
                    if pts > 0 {
                        self.host.show_score(session.keeper.score());
                    }
                }
            }
            KeyAction::Backspace => session.buffer.backspace(),
            KeyAction::Char(c) => {
                session.buffer.append(c);
            }
        }
        self.host.show_buffer(session.buffer.display());
    }

    // --- tick ---

    fn tick(&mut self) {
        let session = &mut self.session;
        session.cycles += 1;
        if let Some(speed) = session.keeper.maybe_advance_speed(session.cycles) {
            self.host.show_speed(speed);
        }
        self.host.clear();

        let chance = self.opts.spawn_chance;
        if let Some(words) = &self.words {
            if chance > 0.0 && self.rng.gen_bool(chance.min(1.0)) {
                let (_, height) = self.host.size();
                let ys = session.field.ys();
                let y = self.placer.pick(&mut self.rng, &ys, self.opts.min_word_y, height);
                let text = words.random(&mut self.rng).to_string();
                session.field.spawn(text, y, session.keeper.speed());
            }
        }

        session.field.advance();
        if session.field.evict_offscreen() {
            log::trace!("word escaped after {} cycles", session.cycles);
            self.clock.stop();
            self.transition(GameState::GameOver);
            return;
        }
        for word in self.session.field.words() {
            self.host.draw_word(word);
        }
    }
}
