pub mod json_store;
pub mod schema;

pub use json_store::{RankKey, StatsStore};
pub use schema::StatsData;
