use std::cmp::Ordering;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::session::ScoreRecord;
use crate::store::schema::StatsData;

const STATS_FILE: &str = "typing_stats.json";

/// Sort key for leaderboard views over the stored sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankKey {
    Score,
    Wpm,
    Accuracy,
    Date,
}

/// File-backed session history plus the current user name.
///
/// Loading never fails: a missing or corrupt file degrades to an empty
/// store with a stderr diagnostic. Saves rewrite the whole document
/// atomically; a failed save is logged and the in-memory state stays
/// authoritative for the rest of the process.
pub struct StatsStore {
    path: PathBuf,
    data: StatsData,
}

impl StatsStore {
    pub fn load() -> Self {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dvotype");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        let path = base_dir.join(STATS_FILE);
        let data = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match StatsData::parse(&content) {
                    Ok(data) => data,
                    Err(err) => {
                        eprintln!("dvotype: stats file unreadable, starting fresh: {err}");
                        StatsData::default()
                    }
                },
                Err(err) => {
                    eprintln!("dvotype: could not read stats file: {err}");
                    StatsData::default()
                }
            }
        } else {
            StatsData::default()
        };
        Self { path, data }
    }

    /// Record one session and persist. The record stays in memory even
    /// when the disk write fails.
    pub fn append(&mut self, record: ScoreRecord) {
        self.data.sessions.push(record);
        self.save_logged();
    }

    pub fn sessions(&self) -> &[ScoreRecord] {
        &self.data.sessions
    }

    pub fn user_name(&self) -> &str {
        &self.data.user_name
    }

    /// Blank names fall back to the default rather than persisting an
    /// empty string.
    pub fn set_user_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.data.user_name = if trimmed.is_empty() {
            crate::store::schema::default_user_name()
        } else {
            trimmed.to_string()
        };
        self.save_logged();
    }

    /// Drop all sessions, keeping the user name, and persist.
    pub fn clear(&mut self) {
        self.data.sessions.clear();
        self.save_logged();
    }

    /// A freshly sorted view over the stored sessions. The stored order is
    /// never touched; ties keep their insertion order in both directions
    /// (stable sort with a flipped comparator, not a reversal).
    pub fn ranked(&self, key: RankKey, descending: bool) -> Vec<&ScoreRecord> {
        let by_key = |a: &ScoreRecord, b: &ScoreRecord| -> Ordering {
            match key {
                RankKey::Score => a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal),
                RankKey::Wpm => a.wpm.partial_cmp(&b.wpm).unwrap_or(Ordering::Equal),
                RankKey::Accuracy => a
                    .accuracy
                    .partial_cmp(&b.accuracy)
                    .unwrap_or(Ordering::Equal),
                RankKey::Date => a.date.cmp(&b.date),
            }
        };

        let mut view: Vec<&ScoreRecord> = self.data.sessions.iter().collect();
        view.sort_by(|a, b| if descending { by_key(b, a) } else { by_key(a, b) });
        view
    }

    /// Write the whole document: serialize, write to a temp file, fsync,
    /// rename over the live file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");

        let json = serde_json::to_string_pretty(&self.data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn save_logged(&self) {
        if let Err(err) = self.save() {
            eprintln!("dvotype: failed to save stats: {err}");
        }
    }
}
