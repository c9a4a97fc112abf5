//! Active on-screen words and spawn placement.
use rand::Rng;

/// A word scrolling right to left. `speed` is fixed at spawn time.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub speed: f64, // px per tick
}

// --- Word field -------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct WordField {
    width: f64,
    words: Vec<Word>,
}

impl WordField {
    pub fn new(width: f64) -> Self {
        Self { width, words: Vec::new() }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.words.iter().map(|w| w.y).collect()
    }

    /// New words enter at the right edge.
    pub fn spawn(&mut self, text: impl Into<String>, y: f64, speed: f64) {
        self.words.push(Word { text: text.into(), x: self.width, y, speed });
    }

    pub fn advance(&mut self) {
        for w in &mut self.words {
            w.x -= w.speed;
        }
    }

    /// Removes the first word (in storage order) whose text equals `text`.
    pub fn try_consume(&mut self, text: &str) -> bool {
        match self.words.iter().position(|w| w.text == text) {
            Some(idx) => {
                self.words.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Drops every word past the left edge. True if anything escaped.
    pub fn evict_offscreen(&mut self) -> bool {
        let before = self.words.len();
        self.words.retain(|w| w.x >= 0.0);
        self.words.len() != before
    }
}

// --- Spawn placement --------------------------------------------------------

/// Best-effort vertical declutter for new words.
#[derive(Clone, Copy, Debug)]
pub struct SpawnPlacer {
    pub attempts: u32,
    pub min_spacing: f64,
}

impl SpawnPlacer {
    pub fn new(attempts: u32, min_spacing: f64) -> Self {
        Self { attempts, min_spacing }
    }

    /// Uniform draw in [min, max) at least `min_spacing` away from every existing y.
    /// Falls back to the last draw when every attempt collides.
    pub fn pick<R: Rng>(&self, rng: &mut R, existing: &[f64], min: f64, max: f64) -> f64 {
        if !(max > min) {
            return min;
        }
        let mut y = rng.gen_range(min..max);
        for _ in 1..self.attempts.max(1) {
            if self.clear_of(existing, y) {
                return y;
            }
            y = rng.gen_range(min..max);
        }
        y
    }

    fn clear_of(&self, existing: &[f64], y: f64) -> bool {
        existing.iter().all(|&e| (e - y).abs() >= self.min_spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_spawn_enters_at_field_width() {
        let mut field = WordField::new(800.0);
        field.spawn("cat", 120.0, 25.0);
        assert_eq!(field.words()[0], Word { text: "cat".into(), x: 800.0, y: 120.0, speed: 25.0 });
    }

    #[test]
    fn test_advance_uses_each_words_own_speed() {
        let mut field = WordField::new(100.0);
        field.spawn("slow", 10.0, 25.0);
        field.spawn("fast", 80.0, 28.0);
        field.advance();
        field.advance();
        assert_eq!(field.words()[0].x, 50.0);
        assert_eq!(field.words()[1].x, 44.0);
    }

    #[test]
    fn test_try_consume_removes_first_exact_match_only() {
        let mut field = WordField::new(100.0);
        field.spawn("dog", 10.0, 1.0);
        field.spawn("cat", 70.0, 1.0);
        field.spawn("cat", 140.0, 1.0);
        assert!(!field.try_consume("ca"));
        assert!(!field.try_consume("Cat"));
        assert_eq!(field.len(), 3);
        assert!(field.try_consume("cat"));
        assert_eq!(field.ys(), vec![10.0, 140.0]);
    }

    #[test]
    fn test_evict_reports_escape() {
        let mut field = WordField::new(30.0);
        field.spawn("a", 10.0, 25.0);
        field.advance();
        assert!(!field.evict_offscreen()); // x == 5
        field.advance();
        assert!(field.evict_offscreen()); // x == -20
        assert!(field.is_empty());
        assert!(!field.evict_offscreen());
    }

    #[test]
    fn test_pick_avoids_existing_when_room() {
        let placer = SpawnPlacer::new(10, 50.0);
        let mut rng = StdRng::seed_from_u64(3);
        let existing = [100.0];
        let mut clear = 0;
        for _ in 0..200 {
            let y = placer.pick(&mut rng, &existing, 20.0, 1000.0);
            assert!((20.0..1000.0).contains(&y));
            if (y - 100.0).abs() >= 50.0 {
                clear += 1;
            }
        }
        // Collision odds per draw are ~10%, so ten attempts almost never all fail.
        assert!(clear >= 195, "only {clear} of 200 were clear");
    }

    #[test]
    fn test_pick_dense_field_still_returns_in_range() {
        let placer = SpawnPlacer::new(10, 50.0);
        let mut rng = StdRng::seed_from_u64(11);
        let existing: Vec<f64> = (0..100).map(|i| 20.0 + i as f64 * 5.0).collect();
        for _ in 0..100 {
            let y = placer.pick(&mut rng, &existing, 20.0, 520.0);
            assert!((20.0..520.0).contains(&y));
        }
    }

    #[test]
    fn test_pick_degenerate_range() {
        let placer = SpawnPlacer::new(10, 50.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(placer.pick(&mut rng, &[], 20.0, 20.0), 20.0);
        assert_eq!(placer.pick(&mut rng, &[], 20.0, 5.0), 20.0);
    }
}
