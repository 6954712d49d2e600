//! Points calculator.
//!
//! Linear pipeline per (result, prediction):
//! no winner → 0; wrong direction → 0; right direction → [`BASE_POINTS`];
//! exact score → `BASE_POINTS * multiplier(tier)`, replacing the base award.

use tracing::{debug, warn};

use super::likelihood::classify;
use super::models::{MatchOutcome, Prediction, ScoringResult, BASE_POINTS};
use crate::teams::{NameNormalizer, RankingTable, Strength, WEAKEST_TIER};

pub fn score(
    table: &RankingTable,
    names: &NameNormalizer,
    result: &MatchOutcome,
    prediction: &Prediction,
) -> ScoringResult {
    let scored = evaluate(table, names, result, prediction);
    debug!(
        "Scored {} {}-{} {} against {}-{}: {} points, tier {}",
        result.home_team,
        result.home_goals,
        result.away_goals,
        result.away_team,
        prediction.home_goals,
        prediction.away_goals,
        scored.total_points,
        scored.tier.map_or("none", |t| t.as_str())
    );
    scored
}

fn evaluate(
    table: &RankingTable,
    names: &NameNormalizer,
    result: &MatchOutcome,
    prediction: &Prediction,
) -> ScoringResult {
    let Some(actual) = result.winner else {
        return ScoringResult::zero("No final result for this fixture yet; prediction not scored");
    };
    if result.winner_conflicts_with_goals() {
        warn!(
            "Result {} {}-{} {} declares winner '{}', which disagrees with the goals",
            result.home_team, result.home_goals, result.away_goals, result.away_team, actual
        );
    }

    let predicted = prediction.outcome();
    if predicted != actual {
        return ScoringResult::zero("Incorrect outcome predicted (0 points)");
    }

    let exact = prediction.home_goals == result.home_goals
        && prediction.away_goals == result.away_goals;
    if !exact {
        return ScoringResult {
            total_points: BASE_POINTS,
            outcome_correct: true,
            score_correct: false,
            tier: None,
            explanation: format!("Correct outcome predicted ({BASE_POINTS} points)"),
        };
    }

    let home = resolve_strength(table, names, &result.home_team);
    let away = resolve_strength(table, names, &result.away_team);
    let likelihood = classify(
        home.tier,
        away.tier,
        predicted,
        prediction.home_goals,
        prediction.away_goals,
    );
    let multiplier = likelihood.tier.multiplier();
    let total_points = BASE_POINTS * multiplier;

    let explanation = format!(
        "{}{} ({} - {}x multiplier applied to base {} points)",
        likelihood.explanation,
        unranked_note(&home, &away),
        likelihood.tier,
        multiplier,
        BASE_POINTS
    );

    ScoringResult {
        total_points,
        outcome_correct: true,
        score_correct: true,
        tier: Some(likelihood.tier),
        explanation,
    }
}

/// Normalise a raw competitor name and look up its strength, logging misses.
pub(crate) fn resolve_strength(
    table: &RankingTable,
    names: &NameNormalizer,
    raw: &str,
) -> Strength {
    let canonical = names.to_canonical(raw);
    let strength = table.strength_of(&canonical);
    if !strength.is_ranked() {
        warn!(
            "Competitor '{}' (normalised '{}') missing from ranking table '{}', using Group {}",
            raw,
            canonical,
            table.label(),
            WEAKEST_TIER
        );
    }
    strength
}

/// Explanation suffix flagging any competitor that fell back to the weakest tier.
pub(crate) fn unranked_note(home: &Strength, away: &Strength) -> String {
    let missing: Vec<&str> = [home, away]
        .into_iter()
        .filter(|s| !s.is_ranked())
        .map(|s| s.name.as_str())
        .collect();
    if missing.is_empty() {
        String::new()
    } else {
        format!(
            ". Unranked team(s) {} defaulted to Group {}",
            missing.join(", "),
            WEAKEST_TIER
        )
    }
}
