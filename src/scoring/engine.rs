use chrono::NaiveDate;
use tracing::debug;

use super::likelihood::classify;
use super::models::{DifficultyPreview, MatchOutcome, Prediction, ScoreTally, ScoringResult};
use super::points::{self, resolve_strength, unranked_note};
use crate::teams::{NameNormalizer, RankingStore, RankingTable};

/// Entry point for the orchestration layer.
///
/// Cheap to clone; clones share the same [`RankingStore`], so a table
/// published through one handle is seen by all of them.
#[derive(Clone)]
pub struct ScoringEngine {
    rankings: RankingStore,
    names: NameNormalizer,
}

impl ScoringEngine {
    pub fn new(rankings: RankingStore, names: NameNormalizer) -> Self {
        ScoringEngine { rankings, names }
    }

    pub fn rankings(&self) -> &RankingStore {
        &self.rankings
    }

    pub fn names(&self) -> &NameNormalizer {
        &self.names
    }

    /// Score one prediction against the table in force today.
    pub fn score(&self, result: &MatchOutcome, prediction: &Prediction) -> ScoringResult {
        let table = self.rankings.current();
        points::score(&table, &self.names, result, prediction)
    }

    /// Score against the table that was in force on `date`.
    pub fn score_as_of(
        &self,
        date: NaiveDate,
        result: &MatchOutcome,
        prediction: &Prediction,
    ) -> ScoringResult {
        let table = self.rankings.active_on(date);
        points::score(&table, &self.names, result, prediction)
    }

    /// Score every prediction for one fixture against a single table snapshot.
    pub fn score_batch(
        &self,
        result: &MatchOutcome,
        predictions: &[Prediction],
    ) -> (Vec<ScoringResult>, ScoreTally) {
        let table = self.rankings.current();
        let results: Vec<ScoringResult> = predictions
            .iter()
            .map(|p| points::score(&table, &self.names, result, p))
            .collect();
        let tally = results.iter().collect();
        debug!(
            "Scored {} prediction(s) for {} vs {} against '{}'",
            results.len(),
            result.home_team,
            result.away_team,
            table.label()
        );
        (results, tally)
    }

    /// Implied difficulty of a scoreline before kick-off. Never awards points.
    pub fn classify_difficulty(
        &self,
        home_team: &str,
        away_team: &str,
        predicted_home_goals: u32,
        predicted_away_goals: u32,
    ) -> DifficultyPreview {
        let table = self.rankings.current();
        preview(
            &table,
            &self.names,
            home_team,
            away_team,
            predicted_home_goals,
            predicted_away_goals,
        )
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(RankingStore::default(), NameNormalizer::builtin())
    }
}

fn preview(
    table: &RankingTable,
    names: &NameNormalizer,
    home_team: &str,
    away_team: &str,
    home_goals: u32,
    away_goals: u32,
) -> DifficultyPreview {
    let home = resolve_strength(table, names, home_team);
    let away = resolve_strength(table, names, away_team);
    let prediction = Prediction::new(home_goals, away_goals);
    let likelihood = classify(
        home.tier,
        away.tier,
        prediction.outcome(),
        home_goals,
        away_goals,
    );
    let explanation = format!("{}{}", likelihood.explanation, unranked_note(&home, &away));

    DifficultyPreview {
        tier: likelihood.tier,
        display_odds: likelihood.tier.display_odds(),
        multiplier: likelihood.tier.multiplier(),
        explanation,
        home,
        away,
    }
}
