use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OutcomeParseError;
use crate::teams::Strength;

/// Flat award for calling the direction of a match correctly.
pub const BASE_POINTS: u32 = 5;

/// Full-time outcome of a match (or the outcome a scoreline implies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl Outcome {
    pub fn from_goals(home: u32, away: u32) -> Self {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::HomeWin => "home_win",
            Outcome::AwayWin => "away_win",
            Outcome::Draw => "draw",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts every spelling the fixture feed and stored documents use.
impl FromStr for Outcome {
    type Err = OutcomeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HOME_TEAM" | "HOME_WIN" | "HOMEWIN" => Ok(Outcome::HomeWin),
            "AWAY_TEAM" | "AWAY_WIN" | "AWAYWIN" => Ok(Outcome::AwayWin),
            "DRAW" => Ok(Outcome::Draw),
            _ => Err(OutcomeParseError(s.to_string())),
        }
    }
}

/// Unknown or malformed winner strings deserialize as "no winner yet".
fn lenient_winner<'de, D>(deserializer: D) -> Result<Option<Outcome>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// The real result of a fixture, as handed over by the orchestration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    /// `None` until the fixture is final.
    #[serde(default, deserialize_with = "lenient_winner")]
    pub winner: Option<Outcome>,
}

impl MatchOutcome {
    /// A finished match; the winner is derived from the goals.
    pub fn finished(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_goals: u32,
        away_goals: u32,
    ) -> Self {
        MatchOutcome {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals,
            away_goals,
            winner: Some(Outcome::from_goals(home_goals, away_goals)),
        }
    }

    /// A fixture with no final result yet.
    pub fn pending(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        MatchOutcome {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals: 0,
            away_goals: 0,
            winner: None,
        }
    }

    /// Whether a declared winner contradicts the goal counts.
    pub fn winner_conflicts_with_goals(&self) -> bool {
        self.winner
            .is_some_and(|w| w != Outcome::from_goals(self.home_goals, self.away_goals))
    }
}

/// A user's guessed scoreline. The predicted outcome is always derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub home_goals: u32,
    pub away_goals: u32,
}

impl Prediction {
    pub fn new(home_goals: u32, away_goals: u32) -> Self {
        Prediction {
            home_goals,
            away_goals,
        }
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_goals(self.home_goals, self.away_goals)
    }

    pub fn total_goals(&self) -> u32 {
        self.home_goals.saturating_add(self.away_goals)
    }
}

/// How surprising a correct exact-score prediction was, least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Likely,
    ModeratelyLikely,
    Unlikely,
    VeryUnlikely,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 4] = [
        DifficultyTier::Likely,
        DifficultyTier::ModeratelyLikely,
        DifficultyTier::Unlikely,
        DifficultyTier::VeryUnlikely,
    ];

    pub fn multiplier(&self) -> u32 {
        match self {
            DifficultyTier::Likely => 2,
            DifficultyTier::ModeratelyLikely => 3,
            DifficultyTier::Unlikely => 4,
            DifficultyTier::VeryUnlikely => 5,
        }
    }

    /// One step up; `VeryUnlikely` stays put.
    pub fn escalate(&self) -> Self {
        match self {
            DifficultyTier::Likely => DifficultyTier::ModeratelyLikely,
            DifficultyTier::ModeratelyLikely => DifficultyTier::Unlikely,
            DifficultyTier::Unlikely | DifficultyTier::VeryUnlikely => DifficultyTier::VeryUnlikely,
        }
    }

    /// Label shown next to a scoreline in the UI.
    pub fn display_odds(&self) -> &'static str {
        match self {
            DifficultyTier::Likely => "2.0",
            DifficultyTier::ModeratelyLikely => "3.0",
            DifficultyTier::Unlikely => "4.0",
            DifficultyTier::VeryUnlikely => "5.0",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Likely => "likely",
            DifficultyTier::ModeratelyLikely => "moderately_likely",
            DifficultyTier::Unlikely => "unlikely",
            DifficultyTier::VeryUnlikely => "very_unlikely",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the outcome-likelihood classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Likelihood {
    pub tier: DifficultyTier,
    pub explanation: String,
}

/// Points awarded for one prediction against one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub total_points: u32,
    pub outcome_correct: bool,
    pub score_correct: bool,
    /// Only set when the exact score was hit.
    pub tier: Option<DifficultyTier>,
    pub explanation: String,
}

impl ScoringResult {
    pub(crate) fn zero(explanation: impl Into<String>) -> Self {
        ScoringResult {
            total_points: 0,
            outcome_correct: false,
            score_correct: false,
            tier: None,
            explanation: explanation.into(),
        }
    }
}

/// Difficulty of a scoreline before the match is played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifficultyPreview {
    pub tier: DifficultyTier,
    pub display_odds: &'static str,
    pub multiplier: u32,
    pub explanation: String,
    pub home: Strength,
    pub away: Strength,
}

/// Running totals over a set of scoring results, for stat bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreTally {
    pub predictions: u32,
    pub points: u32,
    pub correct_outcomes: u32,
    pub correct_scores: u32,
}

impl ScoreTally {
    pub fn add(&mut self, result: &ScoringResult) {
        self.predictions += 1;
        self.points += result.total_points;
        if result.outcome_correct {
            self.correct_outcomes += 1;
        }
        if result.score_correct {
            self.correct_scores += 1;
        }
    }
}

impl<'a> FromIterator<&'a ScoringResult> for ScoreTally {
    fn from_iter<I: IntoIterator<Item = &'a ScoringResult>>(iter: I) -> Self {
        let mut tally = ScoreTally::default();
        for r in iter {
            tally.add(r);
        }
        tally
    }
}
