//! Score and speed bookkeeping for one session, plus the persisted high score.
use super::ScoreStorage;
use crate::options::GameOptions;

// --- Session score / speed --------------------------------------------------

#[derive(Clone, Debug)]
pub struct ScoreKeeper {
    score: u64,
    speed: f64,
    points_multiplier: f64,
    speed_cycles: u64,
    growth_factor: f64,
}

impl ScoreKeeper {
    pub fn new(opts: &GameOptions) -> Self {
        Self {
            score: 0,
            speed: opts.init_speed,
            points_multiplier: opts.points_multiplier,
            speed_cycles: opts.speed_cycles,
            growth_factor: opts.speed_increase,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Points for a consumed word: round(len * speed / multiplier).
    pub fn award(&self, word_len: usize, current_speed: f64) -> u64 {
        let pts = (word_len as f64 * current_speed / self.points_multiplier).round();
        if pts.is_finite() && pts > 0.0 { pts as u64 } else { 0 }
    }

    /// Adds the award for a word at the current speed. Returns the points added.
    pub fn credit(&mut self, word_len: usize) -> u64 {
        let pts = self.award(word_len, self.speed);
        self.score += pts;
        pts
    }

    /// On every `speed_cycles`-th cycle grow the speed and return the new value.
    /// Returns None when the speed did not change.
    pub fn maybe_advance_speed(&mut self, cycle_count: u64) -> Option<f64> {
        if self.speed_cycles == 0 || cycle_count == 0 || cycle_count % self.speed_cycles != 0 {
            return None;
        }
        let next = (self.speed * self.growth_factor).round();
        if next == self.speed {
            return None;
        }
        self.speed = next;
        Some(next)
    }
}

// --- Persisted high score ---------------------------------------------------

/// Cached copy of the persisted high score. Storage failures are logged and
/// degrade to 0 (reads) or are dropped (writes).
#[derive(Clone, Debug, Default)]
pub struct HighScore {
    value: u64,
}

impl HighScore {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn refresh<S: ScoreStorage + ?Sized>(&mut self, storage: &S) -> u64 {
        self.value = match storage.load() {
            Ok(Some(raw)) => parse_stored(&raw),
            Ok(None) => 0,
            Err(err) => {
                log::warn!("reading high score failed: {err}");
                0
            }
        };
        self.value
    }

    /// Persist `score` when it beats the cached value. Returns true on a new record.
    pub fn record<S: ScoreStorage + ?Sized>(&mut self, storage: &mut S, score: u64) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        if let Err(err) = storage.save(&score.to_string()) {
            log::warn!("saving high score failed: {err}");
        }
        true
    }
}

// Leading integer digits, like a lenient parseInt; anything else reads as 0.
fn parse_stored(raw: &str) -> u64 {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[derive(Default)]
    struct MemStore {
        slot: Option<String>,
        broken: bool,
    }

    impl ScoreStorage for MemStore {
        fn load(&self) -> Result<Option<String>, GameError> {
            if self.broken {
                return Err(GameError::StorageUnavailable("denied".into()));
            }
            Ok(self.slot.clone())
        }
        fn save(&mut self, value: &str) -> Result<(), GameError> {
            if self.broken {
                return Err(GameError::StorageUnavailable("quota".into()));
            }
            self.slot = Some(value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_award_cat_at_initial_speed() {
        let keeper = ScoreKeeper::new(&GameOptions::default());
        assert_eq!(keeper.award(3, 25.0), 3);
        assert_eq!(keeper.award(5, 28.0), 6); // 5.6 rounds up
    }

    #[test]
    fn test_speed_changes_only_on_cycle_boundaries() {
        let mut keeper = ScoreKeeper::new(&GameOptions::default());
        let mut expected = 25.0_f64;
        for cycle in 1..=100u64 {
            let before = keeper.speed();
            let changed = keeper.maybe_advance_speed(cycle);
            if cycle % 20 == 0 {
                expected = (expected * 1.1).round();
                assert_eq!(changed, Some(expected), "cycle {cycle}");
            } else {
                assert_eq!(changed, None, "cycle {cycle}");
                assert_eq!(keeper.speed(), before);
            }
        }
        // 25 -> 28 -> 31 -> 34 -> 37 -> 41
        assert_eq!(keeper.speed(), 41.0);
    }

    #[test]
    fn test_high_score_only_increases() {
        let mut store = MemStore { slot: Some("100".into()), broken: false };
        let mut high = HighScore::default();
        assert_eq!(high.refresh(&store), 100);
        assert!(!high.record(&mut store, 80));
        assert_eq!(store.slot.as_deref(), Some("100"));
        assert!(high.record(&mut store, 150));
        assert_eq!(store.slot.as_deref(), Some("150"));
        assert_eq!(high.refresh(&store), 150);
    }

    #[test]
    fn test_broken_storage_degrades_to_zero() {
        let mut store = MemStore { slot: None, broken: true };
        let mut high = HighScore::default();
        assert_eq!(high.refresh(&store), 0);
        assert!(high.record(&mut store, 12));
        assert_eq!(high.value(), 12);
        assert_eq!(high.refresh(&store), 0);
    }

    #[test]
    fn test_parse_stored_is_lenient() {
        assert_eq!(parse_stored("42"), 42);
        assert_eq!(parse_stored(" 42abc"), 42);
        assert_eq!(parse_stored("garbage"), 0);
        assert_eq!(parse_stored(""), 0);
    }
}
