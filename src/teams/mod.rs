pub mod names;
pub mod rankings;
pub mod store;

pub use names::NameNormalizer;
pub use rankings::{CompetitorRanking, RankingEntry, RankingTable, Strength, WEAKEST_TIER};
pub use store::{RankingSchedule, RankingStore};
