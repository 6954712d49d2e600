use thiserror::Error;

/// Problems found while building or loading a ranking table / schedule.
///
/// These only surface at configuration time. Once a table is published,
/// scoring never fails because of it.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("ranking table '{0}' has no competitors")]
    Empty(String),

    #[error("ranking table '{label}' has {count} competitors, at least 4 are needed to form tiers")]
    TooFewCompetitors { label: String, count: usize },

    #[error("ranking table '{label}' lists '{name}' more than once")]
    DuplicateName { label: String, name: String },

    #[error("ranking table '{label}' assigns rank {rank} more than once")]
    DuplicateRank { label: String, rank: u32 },

    #[error("ranking table '{label}' ranks must run 1..={expected_max}, found {rank}")]
    RankOutOfRange {
        label: String,
        rank: u32,
        expected_max: u32,
    },

    #[error("ranking schedule contains no tables")]
    EmptySchedule,

    #[error("ranking schedule has two tables effective from {0}")]
    DuplicateEffectiveDate(chrono::NaiveDate),

    #[error("failed to read rankings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rankings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A winner string from a feed or stored document that names no known outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown outcome: {0}")]
pub struct OutcomeParseError(pub String);
