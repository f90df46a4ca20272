use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Bundled fallback so a fresh install has something to type.
const DEFAULT_TEMPLATES: &str = include_str!("../assets/coding_templates.json");

/// Common short words for warm-up practice rounds.
const PRACTICE_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me", "when", "make",
    "can", "like", "time", "no", "just", "him", "know", "take", "people", "into", "year", "your",
    "good", "some", "could", "them", "see", "other", "than", "then", "now", "look", "only",
    "come", "its", "over", "think", "also", "back", "after", "use", "two", "how", "our", "work",
    "first", "well", "way", "even", "new", "want", "because", "any", "these", "give", "day",
    "most", "us",
];

/// Code practice snippets keyed by language, then difficulty.
///
/// Lookups never fail: unknown keys and empty lists come back as a
/// descriptive placeholder string the host can display as-is.
#[derive(Clone, Debug, Default)]
pub struct TemplateLibrary {
    templates: HashMap<String, HashMap<String, Vec<String>>>,
}

impl TemplateLibrary {
    /// The templates shipped inside the binary.
    pub fn bundled() -> Self {
        match serde_json::from_str(DEFAULT_TEMPLATES) {
            Ok(templates) => Self { templates },
            Err(err) => {
                eprintln!("dvotype: bundled templates unparseable: {err}");
                Self::default()
            }
        }
    }

    /// Load from a user-supplied JSON file; missing or unparseable files
    /// degrade to an empty library with a stderr diagnostic.
    pub fn from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(templates) => Self { templates },
                Err(err) => {
                    eprintln!("dvotype: template file unparseable: {err}");
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("dvotype: could not read template file: {err}");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn difficulties(&self, language: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .templates
            .get(language)
            .map(|by_difficulty| by_difficulty.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    /// Practice text for a language/difficulty pair. Basic rounds join the
    /// first two snippets so they run a bit longer; other tiers use the
    /// first snippet.
    pub fn text_for(&self, language: &str, difficulty: &str) -> String {
        if self.templates.is_empty() {
            return "No coding templates are loaded.".to_string();
        }
        match self
            .templates
            .get(language)
            .and_then(|by_difficulty| by_difficulty.get(difficulty))
        {
            Some(snippets) if !snippets.is_empty() => {
                if difficulty == "basic" {
                    snippets
                        .iter()
                        .take(2)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join("\n\n")
                } else {
                    snippets[0].clone()
                }
            }
            Some(_) => format!("The {language} {difficulty} template list is empty."),
            None => format!("No {difficulty} templates found for {language}."),
        }
    }
}

pub fn practice_words() -> &'static [&'static str] {
    PRACTICE_WORDS
}

/// A short warm-up line: 2-5 distinct easy words.
pub fn practice_text(rng: &mut SmallRng) -> String {
    let count = rng.gen_range(2..=5);
    let words: Vec<&str> = PRACTICE_WORDS
        .choose_multiple(rng, count)
        .copied()
        .collect();
    words.join(" ")
}

/// Fixed plain-typing sentences per tier; unknown tiers get the basic one.
pub fn typing_text(difficulty: &str) -> &'static str {
    match difficulty {
        "intermediate" => {
            "Practice typing with the Dvorak keyboard layout for improved efficiency."
        }
        "advanced" => {
            "The Dvorak Simplified Keyboard was designed to increase typing speed and reduce finger fatigue through optimized key placement."
        }
        _ => "The cat sat on the mat. The dog ran in the yard.",
    }
}
