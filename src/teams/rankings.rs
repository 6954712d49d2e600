//! Competitor strength tiers.
//!
//! A [`RankingTable`] is an immutable snapshot of one season phase's
//! ordering: every competitor has a unique rank `1..=N` and a tier `1..=4`
//! derived from that rank by splitting `1..=N` into four contiguous bands
//! (band 1 = strongest). Every band is non-empty once `N >= 4`.
//! Tables are replaced wholesale, never patched (see [`super::store`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::names::strip_club_tokens;
use crate::error::RankingError;

pub const TIER_COUNT: u8 = 4;
/// Tier assigned to competitors missing from the table.
pub const WEAKEST_TIER: u8 = TIER_COUNT;

/// 2025/26 ordering, strongest first.
const BUILTIN_ORDER: &[&str] = &[
    "Arsenal",
    "Manchester City",
    "Liverpool",
    "Bournemouth",
    "Chelsea",
    "Tottenham Hotspur",
    "Sunderland",
    "Crystal Palace",
    "Manchester United",
    "Brighton & Hove Albion",
    "Aston Villa",
    "Everton",
    "Brentford",
    "Newcastle United",
    "Fulham",
    "Leeds United",
    "Burnley",
    "Nottingham Forest",
    "West Ham United",
    "Wolverhampton Wanderers",
];

/// One row of a ranking file. Tier is never read from input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorRanking {
    pub name: String,
    pub rank: u32,
    pub tier: u8,
}

/// Resolved strength of a competitor for one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strength {
    /// Name used for the lookup (after normalisation).
    pub name: String,
    /// `None` when the competitor is not in the table.
    pub rank: Option<u32>,
    pub tier: u8,
}

impl Strength {
    pub fn is_ranked(&self) -> bool {
        self.rank.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingTable {
    label: String,
    effective_from: NaiveDate,
    /// Sorted by rank.
    teams: Vec<CompetitorRanking>,
    /// lowercased name → index into `teams`
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl RankingTable {
    /// Validate and build a table. Ranks must be unique and cover `1..=N`.
    pub fn new(
        label: impl Into<String>,
        effective_from: NaiveDate,
        entries: Vec<RankingEntry>,
    ) -> Result<Self, RankingError> {
        let label = label.into();
        if entries.is_empty() {
            return Err(RankingError::Empty(label));
        }
        if entries.len() < TIER_COUNT as usize {
            return Err(RankingError::TooFewCompetitors {
                label,
                count: entries.len(),
            });
        }

        let expected_max = entries.len() as u32;
        let mut seen_ranks = vec![false; entries.len()];
        let mut seen_names = HashSet::new();
        for entry in &entries {
            if entry.rank == 0 || entry.rank > expected_max {
                return Err(RankingError::RankOutOfRange {
                    label,
                    rank: entry.rank,
                    expected_max,
                });
            }
            let slot = &mut seen_ranks[(entry.rank - 1) as usize];
            if *slot {
                return Err(RankingError::DuplicateRank {
                    label,
                    rank: entry.rank,
                });
            }
            *slot = true;
            if !seen_names.insert(name_key(&entry.name)) {
                return Err(RankingError::DuplicateName {
                    label,
                    name: entry.name.clone(),
                });
            }
        }

        Ok(Self::assemble(label, effective_from, entries))
    }

    /// Build a table from names listed strongest first.
    pub fn from_ordered<S: AsRef<str>>(
        label: impl Into<String>,
        effective_from: NaiveDate,
        names: &[S],
    ) -> Result<Self, RankingError> {
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, name)| RankingEntry {
                name: name.as_ref().to_string(),
                rank: i as u32 + 1,
            })
            .collect();
        Self::new(label, effective_from, entries)
    }

    /// The built-in 2025/26 season table.
    pub fn builtin() -> Self {
        let entries = BUILTIN_ORDER
            .iter()
            .enumerate()
            .map(|(i, name)| RankingEntry {
                name: (*name).to_string(),
                rank: i as u32 + 1,
            })
            .collect();
        let season_start = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap_or(NaiveDate::MIN);
        Self::assemble("2025-26 season".to_string(), season_start, entries)
    }

    fn assemble(label: String, effective_from: NaiveDate, mut entries: Vec<RankingEntry>) -> Self {
        entries.sort_by_key(|e| e.rank);
        let pool = entries.len() as u32;
        let teams: Vec<CompetitorRanking> = entries
            .into_iter()
            .map(|e| CompetitorRanking {
                tier: tier_for_rank(e.rank, pool),
                name: e.name,
                rank: e.rank,
            })
            .collect();
        let index = teams
            .iter()
            .enumerate()
            .map(|(i, t)| (name_key(&t.name), i))
            .collect();
        RankingTable {
            label,
            effective_from,
            teams,
            index,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn teams(&self) -> &[CompetitorRanking] {
        &self.teams
    }

    /// Exact (case-insensitive) lookup, retried once with club suffixes removed.
    pub fn ranking_of(&self, name: &str) -> Option<&CompetitorRanking> {
        self.index
            .get(&name_key(name))
            .or_else(|| self.index.get(&name_key(strip_club_tokens(name))))
            .map(|&i| &self.teams[i])
    }

    /// Rank and tier of `name`; unknown competitors get [`WEAKEST_TIER`].
    pub fn strength_of(&self, name: &str) -> Strength {
        match self.ranking_of(name) {
            Some(r) => Strength {
                name: r.name.clone(),
                rank: Some(r.rank),
                tier: r.tier,
            },
            None => Strength {
                name: name.to_string(),
                rank: None,
                tier: WEAKEST_TIER,
            },
        }
    }

    /// Competitors in one tier, strongest first.
    pub fn tier_members(&self, tier: u8) -> impl Iterator<Item = &CompetitorRanking> {
        self.teams.iter().filter(move |t| t.tier == tier)
    }
}

/// Tier of `rank` in a pool of `pool` competitors: `(rank - 1) * 4 / pool + 1`.
///
/// Bands are contiguous and differ in size by at most one, so a 20-team
/// pool bands in fives and no band is left empty.
pub fn tier_for_rank(rank: u32, pool: u32) -> u8 {
    let pool = u64::from(pool.max(1));
    let offset = u64::from(rank.saturating_sub(1)).min(pool - 1);
    (offset * u64::from(TIER_COUNT) / pool + 1) as u8
}

fn name_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
