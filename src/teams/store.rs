//! Versioned ranking configuration.
//!
//! A season is described by a [`RankingSchedule`]: one immutable
//! [`RankingTable`] per checkpoint, each effective from a date. The live
//! schedule sits behind a [`RankingStore`], which hands out `Arc` snapshots
//! and swaps the whole schedule by reference on reload. Readers holding an
//! older snapshot keep scoring against it until they drop it.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::info;

use super::rankings::{RankingEntry, RankingTable};
use crate::error::RankingError;

#[derive(Debug, Deserialize)]
struct ScheduleFile {
    tables: Vec<TableFile>,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    label: String,
    effective_from: NaiveDate,
    teams: Vec<RankingEntry>,
}

/// Ranking tables ordered by effective date.
#[derive(Debug, Clone)]
pub struct RankingSchedule {
    /// Sorted by `effective_from`, never empty.
    tables: Vec<Arc<RankingTable>>,
}

impl RankingSchedule {
    pub fn new(tables: Vec<RankingTable>) -> Result<Self, RankingError> {
        if tables.is_empty() {
            return Err(RankingError::EmptySchedule);
        }
        let mut tables: Vec<Arc<RankingTable>> = tables.into_iter().map(Arc::new).collect();
        tables.sort_by_key(|t| t.effective_from());
        for pair in tables.windows(2) {
            if pair[0].effective_from() == pair[1].effective_from() {
                return Err(RankingError::DuplicateEffectiveDate(pair[0].effective_from()));
            }
        }
        Ok(RankingSchedule { tables })
    }

    pub fn single(table: RankingTable) -> Self {
        RankingSchedule {
            tables: vec![Arc::new(table)],
        }
    }

    pub fn builtin() -> Self {
        Self::single(RankingTable::builtin())
    }

    /// Parse a schedule from its JSON form. `source` is only used in errors.
    pub fn from_json(json: &str, source: &str) -> Result<Self, RankingError> {
        let file: ScheduleFile = serde_json::from_str(json).map_err(|e| RankingError::Parse {
            path: source.to_string(),
            source: e,
        })?;
        let tables = file
            .tables
            .into_iter()
            .map(|t| RankingTable::new(t.label, t.effective_from, t.teams))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tables)
    }

    pub fn load(path: &Path) -> Result<Self, RankingError> {
        Self::load_with_source(path).map(|(schedule, _)| schedule)
    }

    /// Like [`load`](Self::load), also returning the exact text that was parsed.
    pub fn load_with_source(path: &Path) -> Result<(Self, String), RankingError> {
        let display = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|e| RankingError::Io {
            path: display.clone(),
            source: e,
        })?;
        let schedule = Self::from_json(&json, &display)?;
        Ok((schedule, json))
    }

    /// Table in force on `date`. Dates before the first checkpoint resolve
    /// to the earliest table.
    pub fn active_on(&self, date: NaiveDate) -> Arc<RankingTable> {
        let idx = self
            .tables
            .partition_point(|t| t.effective_from() <= date)
            .saturating_sub(1);
        Arc::clone(&self.tables[idx])
    }

    pub fn tables(&self) -> &[Arc<RankingTable>] {
        &self.tables
    }
}

/// Shared handle to the live ranking schedule.
#[derive(Clone)]
pub struct RankingStore {
    inner: Arc<RwLock<Arc<RankingSchedule>>>,
}

impl RankingStore {
    pub fn new(schedule: RankingSchedule) -> Self {
        RankingStore {
            inner: Arc::new(RwLock::new(Arc::new(schedule))),
        }
    }

    /// Consistent view of the whole schedule.
    pub fn snapshot(&self) -> Arc<RankingSchedule> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Table in force today (UTC).
    pub fn current(&self) -> Arc<RankingTable> {
        self.active_on(Utc::now().date_naive())
    }

    pub fn active_on(&self, date: NaiveDate) -> Arc<RankingTable> {
        self.snapshot().active_on(date)
    }

    /// Replace the whole schedule. Callers mid-lookup finish on the old one.
    pub fn publish(&self, schedule: RankingSchedule) {
        let tables = schedule.tables().len();
        let latest = schedule
            .tables()
            .last()
            .map(|t| t.label().to_string())
            .unwrap_or_default();
        let next = Arc::new(schedule);
        {
            let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
            *guard = next;
        }
        info!("Published ranking schedule: {} table(s), latest '{}'", tables, latest);
    }
}

impl Default for RankingStore {
    fn default() -> Self {
        Self::new(RankingSchedule::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(label: &str, from: NaiveDate, order: &[&str]) -> RankingTable {
        RankingTable::from_ordered(label, from, order).unwrap()
    }

    const SCHEDULE_JSON: &str = r#"{
        "tables": [
            { "label": "week 10", "effective_from": "2025-11-01",
              "teams": [ {"name": "D", "rank": 1}, {"name": "C", "rank": 2},
                         {"name": "B", "rank": 3}, {"name": "A", "rank": 4} ] },
            { "label": "preseason", "effective_from": "2025-08-01",
              "teams": [ {"name": "A", "rank": 1}, {"name": "B", "rank": 2},
                         {"name": "C", "rank": 3}, {"name": "D", "rank": 4} ] }
        ]
    }"#;

    #[test]
    fn schedule_resolves_table_by_date() {
        let s = RankingSchedule::from_json(SCHEDULE_JSON, "inline").unwrap();
        assert_eq!(s.tables().len(), 2);
        assert_eq!(s.active_on(date(2025, 9, 15)).label(), "preseason");
        assert_eq!(s.active_on(date(2025, 11, 1)).label(), "week 10");
        assert_eq!(s.active_on(date(2026, 5, 1)).label(), "week 10");
        // before the first checkpoint
        assert_eq!(s.active_on(date(2025, 1, 1)).label(), "preseason");
    }

    #[test]
    fn replayed_tiers_follow_the_table_in_force() {
        let s = RankingSchedule::from_json(SCHEDULE_JSON, "inline").unwrap();
        assert_eq!(s.active_on(date(2025, 9, 1)).strength_of("A").tier, 1);
        assert_eq!(s.active_on(date(2025, 12, 1)).strength_of("A").tier, 4);
    }

    #[test]
    fn example_rankings_file_is_valid() {
        let json = include_str!("../../config/rankings.example.json");
        let s = RankingSchedule::from_json(json, "rankings.example.json").unwrap();
        assert_eq!(s.tables().len(), 2);
        let checkpoint = s.active_on(date(2025, 10, 15));
        assert_eq!(checkpoint.strength_of("Bournemouth").tier, 1);
        let preseason = s.active_on(date(2025, 8, 20));
        assert_eq!(preseason.strength_of("Bournemouth").tier, 4);
    }

    #[test]
    fn schedule_rejects_duplicate_dates() {
        let d = date(2025, 8, 1);
        let err = RankingSchedule::new(vec![
            table("one", d, &["A", "B", "C", "D"]),
            table("two", d, &["D", "C", "B", "A"]),
        ])
        .unwrap_err();
        assert!(matches!(err, RankingError::DuplicateEffectiveDate(_)));
        assert!(matches!(
            RankingSchedule::new(vec![]).unwrap_err(),
            RankingError::EmptySchedule
        ));
    }

    #[test]
    fn invalid_table_in_file_is_reported() {
        let json = r#"{ "tables": [ { "label": "x", "effective_from": "2025-08-01",
            "teams": [ {"name": "A", "rank": 1}, {"name": "B", "rank": 1},
                       {"name": "C", "rank": 3}, {"name": "D", "rank": 4} ] } ] }"#;
        let err = RankingSchedule::from_json(json, "inline").unwrap_err();
        assert!(matches!(err, RankingError::DuplicateRank { rank: 1, .. }));

        let err = RankingSchedule::from_json("{ not json", "inline").unwrap_err();
        assert!(matches!(err, RankingError::Parse { .. }));
    }

    #[test]
    fn load_returns_the_text_it_parsed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rankings.json");
        std::fs::write(&path, SCHEDULE_JSON).unwrap();
        let (s, json) = RankingSchedule::load_with_source(&path).unwrap();
        assert_eq!(json, SCHEDULE_JSON);
        assert_eq!(s.tables().len(), 2);
        assert_eq!(RankingSchedule::load(&path).unwrap().tables().len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RankingSchedule::load(Path::new("/nonexistent/rankings.json")).unwrap_err();
        assert!(matches!(err, RankingError::Io { .. }));
    }

    #[test]
    fn publish_swaps_without_touching_held_snapshots() {
        let store = RankingStore::default();
        let before = store.current();
        assert_eq!(before.len(), 20);

        store.publish(RankingSchedule::single(table(
            "cup",
            NaiveDate::MIN,
            &["W", "X", "Y", "Z"],
        )));

        assert_eq!(before.len(), 20, "held snapshot must not change");
        assert_eq!(store.current().label(), "cup");
        assert_eq!(store.current().len(), 4);
    }

    #[test]
    fn concurrent_readers_always_see_a_whole_table() {
        let store = RankingStore::default();
        let small = || RankingSchedule::single(table("small", NaiveDate::MIN, &["A", "B", "C", "D"]));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let store = store.clone();
                scope.spawn(move || {
                    for _ in 0..500 {
                        let t = store.current();
                        assert!(t.len() == 20 || t.len() == 4);
                        assert_eq!(t.teams().len(), t.len());
                    }
                });
            }
            for i in 0..100 {
                if i % 2 == 0 {
                    store.publish(small());
                } else {
                    store.publish(RankingSchedule::builtin());
                }
            }
        });
    }
}
