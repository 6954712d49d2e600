pub mod engine;
pub mod likelihood;
pub mod models;
pub mod points;

pub use engine::ScoringEngine;
pub use likelihood::classify;
pub use models::{
    DifficultyPreview, DifficultyTier, Likelihood, MatchOutcome, Outcome, Prediction, ScoreTally,
    ScoringResult, BASE_POINTS,
};
