use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::scoring;
use crate::session::line::LineSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Typing,
    Coding,
}

/// One finished session as persisted in the stats document. Immutable once
/// written; the field names and the date format are the on-disk contract.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub date: String,
    pub name: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub time: f64,
    pub score: f64,
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

fn default_mode() -> Mode {
    Mode::Typing
}

impl ScoreRecord {
    /// Freeze the metrics of a completed session into a record.
    ///
    /// Plain typing sessions carry no language/difficulty tag and score at
    /// the `"typing"` rate regardless of what the caller passes.
    pub fn from_session(
        session: &LineSession,
        name: &str,
        mode: Mode,
        language: Option<&str>,
        difficulty: Option<&str>,
    ) -> Self {
        let elapsed = session.elapsed_secs();
        let wpm = scoring::words_per_minute(session.total_count, elapsed);
        let accuracy = scoring::accuracy_percent(session.correct_count, session.total_count);
        let tag = match mode {
            Mode::Coding => difficulty.unwrap_or("basic"),
            Mode::Typing => "typing",
        };
        let score = scoring::score(wpm, accuracy, tag);
        let (language, difficulty) = match mode {
            Mode::Coding => (
                language.map(str::to_string),
                difficulty.map(str::to_string),
            ),
            Mode::Typing => (None, None),
        };

        Self {
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            name: name.to_string(),
            wpm,
            accuracy,
            time: elapsed,
            score,
            mode,
            language,
            difficulty,
        }
    }
}
