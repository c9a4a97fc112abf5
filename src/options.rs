//! Gameplay modifiers. Defaults reproduce the classic pacing; the host page may
//! override any subset as JSON via `start_game_with_options`.

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameOptions {
    pub init_speed: f64,      // px per tick for freshly spawned words
    pub speed_increase: f64,  // geometric growth applied every `speed_cycles`
    pub speed_cycles: u64,
    pub spawn_chance: f64,    // probability of a spawn on each tick
    pub tick_interval_ms: f64,
    pub min_word_y: f64,
    pub points_multiplier: f64,
    pub min_word_spacing: f64,
    pub spawn_attempts: u32,
    /// Upper bound on ticks released by a single frame after a stall.
    pub max_catch_up_ticks: u32,
    pub high_score_key: String,
    pub dictionary_url: String,
    /// Canvas height as a fraction of the window height.
    pub canvas_height_ratio: f64,
    pub restart_key: char,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            init_speed: 25.0,
            speed_increase: 1.1,
            speed_cycles: 20,
            spawn_chance: 0.25,
            tick_interval_ms: 250.0,
            min_word_y: 20.0,
            points_multiplier: 25.0,
            min_word_spacing: 50.0,
            spawn_attempts: 10,
            max_catch_up_ticks: 8,
            high_score_key: "typingGameHighScore".to_string(),
            dictionary_url: "dictionary.txt".to_string(),
            canvas_height_ratio: 0.85,
            restart_key: 'r',
        }
    }
}

#[cfg(feature = "serde_json")]
impl GameOptions {
    /// Parse a (possibly partial) JSON object; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_pacing() {
        let o = GameOptions::default();
        assert_eq!(o.init_speed, 25.0);
        assert_eq!(o.speed_cycles, 20);
        assert_eq!(o.tick_interval_ms, 250.0);
        assert_eq!(o.points_multiplier, 25.0);
        assert_eq!(o.spawn_attempts, 10);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let o = GameOptions::from_json(r#"{ "init_speed": 40, "dictionary_url": "words.txt" }"#)
            .unwrap();
        assert_eq!(o.init_speed, 40.0);
        assert_eq!(o.dictionary_url, "words.txt");
        assert_eq!(o.speed_cycles, 20);
        assert_eq!(o.high_score_key, "typingGameHighScore");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(GameOptions::from_json("{ init_speed: }").is_err());
    }
}
