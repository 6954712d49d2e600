//! Outcome-likelihood classifier.
//!
//! Turns the two competitors' tiers and a predicted scoreline into a
//! [`DifficultyTier`]:
//!
//! 1. `gap = |home_tier - away_tier|`
//! 2. upset = the predicted winner sits in the numerically larger tier
//! 3. first match wins:
//!    - upset with gap ≥ 2 → `Unlikely`
//!    - draw with gap ≥ 2 → `Unlikely`
//!    - expected win with gap ≥ 2 → `Likely`
//!    - anything with gap ≤ 1 → `ModeratelyLikely`
//! 4. a predicted total above [`ESCALATION_THRESHOLD`] goals moves the tier
//!    one step up, saturating at `VeryUnlikely`.
//!
//! Gaps of 2 and 3 are deliberately treated the same.

use super::models::{DifficultyTier, Likelihood, Outcome};

/// Predicted goal totals strictly above this escalate the tier.
pub const ESCALATION_THRESHOLD: u32 = 3;

/// Gap at which the favourite/outsider distinction starts to count.
const WIDE_GAP: u8 = 2;

pub fn classify(
    home_tier: u8,
    away_tier: u8,
    predicted: Outcome,
    predicted_home_goals: u32,
    predicted_away_goals: u32,
) -> Likelihood {
    let (base, mut explanation) = base_tier(home_tier, away_tier, predicted);

    let total = predicted_home_goals.saturating_add(predicted_away_goals);
    let tier = if total > ESCALATION_THRESHOLD {
        let escalated = base.escalate();
        explanation.push_str(&format!(
            ". Additionally, the large goal total ({}) bumped the likelihood from '{}' to '{}'",
            total, base, escalated
        ));
        escalated
    } else {
        base
    };

    Likelihood { tier, explanation }
}

pub fn is_upset(home_tier: u8, away_tier: u8, predicted: Outcome) -> bool {
    match predicted {
        Outcome::HomeWin => home_tier > away_tier,
        Outcome::AwayWin => away_tier > home_tier,
        Outcome::Draw => false,
    }
}

fn base_tier(home_tier: u8, away_tier: u8, predicted: Outcome) -> (DifficultyTier, String) {
    let gap = home_tier.abs_diff(away_tier);
    let stronger = home_tier.min(away_tier);
    let weaker = home_tier.max(away_tier);

    if is_upset(home_tier, away_tier, predicted) && gap >= WIDE_GAP {
        let (winner, loser) = if home_tier > away_tier {
            ("Home", "away")
        } else {
            ("Away", "home")
        };
        (
            DifficultyTier::Unlikely,
            format!(
                "Major upset: {} team (Group {}) beating {} team (Group {})",
                winner, weaker, loser, stronger
            ),
        )
    } else if predicted == Outcome::Draw && gap >= WIDE_GAP {
        (
            DifficultyTier::Unlikely,
            format!(
                "Unlikely draw between Group {} and Group {} teams",
                home_tier, away_tier
            ),
        )
    } else if gap >= WIDE_GAP {
        (
            DifficultyTier::Likely,
            format!(
                "Expected win: Strong team (Group {}) beating weak team (Group {})",
                stronger, weaker
            ),
        )
    } else if gap == 0 {
        (
            DifficultyTier::ModeratelyLikely,
            format!(
                "Same group matchup: Both teams are in Group {}, making this prediction moderately difficult",
                home_tier
            ),
        )
    } else {
        (
            DifficultyTier::ModeratelyLikely,
            format!(
                "Moderate difficulty prediction between adjacent groups (Groups {} vs {})",
                home_tier, away_tier
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use DifficultyTier::*;
    use Outcome::*;

    #[test]
    fn expected_win_across_wide_gap_is_likely() {
        let l = classify(1, 4, HomeWin, 2, 0);
        assert_eq!(l.tier, Likely);
        assert_eq!(
            l.explanation,
            "Expected win: Strong team (Group 1) beating weak team (Group 4)"
        );
        assert_eq!(classify(4, 1, AwayWin, 0, 1).tier, Likely);
        assert_eq!(classify(3, 1, AwayWin, 1, 2).tier, Likely);
    }

    #[test]
    fn wide_gap_upset_is_unlikely() {
        let l = classify(4, 1, HomeWin, 2, 1);
        assert_eq!(l.tier, Unlikely);
        assert_eq!(
            l.explanation,
            "Major upset: Home team (Group 4) beating away team (Group 1)"
        );
        let l = classify(1, 3, AwayWin, 0, 1);
        assert_eq!(l.tier, Unlikely);
        assert_eq!(
            l.explanation,
            "Major upset: Away team (Group 3) beating home team (Group 1)"
        );
    }

    #[test]
    fn wide_gap_draw_is_unlikely() {
        let l = classify(1, 3, Draw, 1, 1);
        assert_eq!(l.tier, Unlikely);
        assert_eq!(l.explanation, "Unlikely draw between Group 1 and Group 3 teams");
    }

    #[test]
    fn narrow_gaps_are_moderately_likely() {
        let l = classify(2, 2, Draw, 1, 1);
        assert_eq!(l.tier, ModeratelyLikely);
        assert!(l.explanation.starts_with("Same group matchup: Both teams are in Group 2"));

        for outcome in [HomeWin, AwayWin, Draw] {
            let l = classify(2, 3, outcome, 1, 0);
            assert_eq!(l.tier, ModeratelyLikely, "{outcome}");
            assert_eq!(
                l.explanation,
                "Moderate difficulty prediction between adjacent groups (Groups 2 vs 3)"
            );
        }
    }

    #[test]
    fn huge_goal_totals_saturate_and_still_escalate() {
        let l = classify(1, 4, HomeWin, u32::MAX, 1);
        assert_eq!(l.tier, ModeratelyLikely);
        assert!(l.explanation.contains(&format!("large goal total ({})", u32::MAX)));
        assert_eq!(classify(2, 2, Draw, u32::MAX, u32::MAX).tier, Unlikely);
    }

    #[test]
    fn gaps_of_two_and_three_are_not_distinguished() {
        assert_eq!(classify(4, 2, HomeWin, 1, 0).tier, classify(4, 1, HomeWin, 1, 0).tier);
        assert_eq!(classify(1, 3, Draw, 0, 0).tier, classify(1, 4, Draw, 0, 0).tier);
        assert_eq!(classify(1, 3, HomeWin, 1, 0).tier, classify(1, 4, HomeWin, 1, 0).tier);
    }

    #[test]
    fn high_scoring_prediction_escalates_one_step() {
        let l = classify(4, 1, HomeWin, 4, 3);
        assert_eq!(l.tier, VeryUnlikely);
        assert!(l.explanation.ends_with(
            ". Additionally, the large goal total (7) bumped the likelihood from 'unlikely' to 'very_unlikely'"
        ));

        assert_eq!(classify(1, 4, HomeWin, 3, 1).tier, ModeratelyLikely);
        assert_eq!(classify(2, 2, Draw, 2, 2).tier, Unlikely);
    }

    #[test]
    fn three_goals_is_not_enough_to_escalate() {
        let l = classify(1, 4, HomeWin, 3, 0);
        assert_eq!(l.tier, Likely);
        assert!(!l.explanation.contains("Additionally"));
    }

    #[test]
    fn draws_are_never_upsets() {
        for (h, a) in [(1, 4), (4, 1), (2, 2)] {
            assert!(!is_upset(h, a, Draw));
        }
        assert!(is_upset(3, 2, HomeWin));
        assert!(!is_upset(2, 3, HomeWin));
    }

    proptest! {
        #[test]
        fn escalation_never_lowers_the_tier(
            home in 1u8..=4,
            away in 1u8..=4,
            hg in 0u32..10,
            ag in 0u32..10,
        ) {
            let outcome = Outcome::from_goals(hg, ag);
            let (base, _) = base_tier(home, away, outcome);
            let l = classify(home, away, outcome, hg, ag);
            prop_assert!(l.tier >= base);
            prop_assert!(l.tier.multiplier() >= base.multiplier());
            if hg + ag > ESCALATION_THRESHOLD {
                prop_assert_eq!(l.tier, base.escalate());
            } else {
                prop_assert_eq!(l.tier, base);
            }
        }

        #[test]
        fn classify_is_deterministic(
            home in 1u8..=4,
            away in 1u8..=4,
            hg in 0u32..10,
            ag in 0u32..10,
        ) {
            let outcome = Outcome::from_goals(hg, ag);
            prop_assert_eq!(
                classify(home, away, outcome, hg, ag),
                classify(home, away, outcome, hg, ag)
            );
        }
    }
}
