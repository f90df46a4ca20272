pub mod line;
pub mod record;

pub use line::{KeystrokeEvent, LineSession, Phase};
pub use record::{Mode, ScoreRecord};
