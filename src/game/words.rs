// Word list provider backed by a newline-delimited dictionary.
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::GameError;

#[derive(Clone, Debug)]
pub struct WordSource {
    words: Vec<String>,
}

impl WordSource {
    /// Every non-empty trimmed line is one word. An empty result is an error.
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return Err(GameError::WordSourceUnavailable(
                "dictionary is empty".to_string(),
            ));
        }
        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn random<R: Rng>(&self, rng: &mut R) -> &str {
        // parse() guarantees at least one entry
        self.words.choose(rng).map(String::as_str).unwrap_or_default()
    }
}
