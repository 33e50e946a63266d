//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! We look for a docnav.toml in the working directory and, if present and valid, load settings
//! from there. Command line flags override it.

use facet::Facet;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// File the configuration is read from.
pub const CONFIG_FILE: &str = "docnav.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from docnav.toml or falling back to defaults.
pub struct Config {
    #[facet(default = vec!["md".to_string(), "json".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
    #[facet(default = 180)]
    /// Simulated speech rate, which paces continuous reading in the terminal UI.
    pub words_per_minute: u32,
    #[facet(default = "en-US".to_string())]
    /// Language announcements are made in.
    pub locale: String,
    #[facet(default)]
    /// Where to write logs; logging is off without it.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_extensions: vec!["md".to_string(), "json".to_string()],
            words_per_minute: 180,
            locale: "en-US".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from docnav.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, using defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|contents| Self::parse(&contents))
            .unwrap_or_default()
    }

    #[must_use]
    /// Parse TOML text, filling unspecified settings with defaults.
    pub fn parse(contents: &str) -> Option<Self> {
        facet_toml::from_str::<Self>(contents).ok()
    }

    #[must_use]
    /// How long speaking `text` takes at the configured rate, with a floor of one word.
    pub fn speech_duration(&self, text: &str) -> Duration {
        let words = u64::try_from(text.split_whitespace().count().max(1)).unwrap_or(u64::MAX);
        let wpm = u64::from(self.words_per_minute.max(1));
        Duration::from_millis(words.saturating_mul(60_000) / wpm)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
