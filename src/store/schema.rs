use serde::{Deserialize, Serialize};

use crate::session::ScoreRecord;

/// The persisted stats document: every recorded session plus the current
/// user name, saved as a whole on each change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsData {
    #[serde(default)]
    pub sessions: Vec<ScoreRecord>,
    #[serde(default = "default_user_name")]
    pub user_name: String,
}

pub fn default_user_name() -> String {
    "Player".to_string()
}

impl Default for StatsData {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            user_name: default_user_name(),
        }
    }
}

// Early versions of the store were a bare top-level array of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatsDocument {
    Wrapped(StatsData),
    Bare(Vec<ScoreRecord>),
}

impl StatsData {
    /// Parse either document shape; a bare array is wrapped with the
    /// default user name.
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        Ok(match serde_json::from_str::<StatsDocument>(json)? {
            StatsDocument::Wrapped(data) => data,
            StatsDocument::Bare(sessions) => Self {
                sessions,
                user_name: default_user_name(),
            },
        })
    }
}
