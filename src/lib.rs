//! Scoring engine for a season-long scoreline prediction game.
//!
//! A correct direction earns a flat base award; an exact scoreline replaces
//! it with `base × multiplier`, where the multiplier reflects how surprising
//! the result was given the two competitors' strength tiers.

pub mod api;
pub mod error;
pub mod scoring;
pub mod teams;

pub use error::{OutcomeParseError, RankingError};
pub use scoring::{
    DifficultyPreview, DifficultyTier, MatchOutcome, Outcome, Prediction, ScoreTally,
    ScoringEngine, ScoringResult,
};
pub use teams::{NameNormalizer, RankingSchedule, RankingStore, RankingTable};
