use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

mod config;

use config::{Command, Config};
use scorecast::api::{self, AppState, BatchRequest};
use scorecast::{NameNormalizer, RankingSchedule, RankingStore, ScoringEngine};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let (schedule, loaded_json) = load_schedule(config.rankings.as_deref())?;
    let store = RankingStore::new(schedule);
    let engine = ScoringEngine::new(store, NameNormalizer::builtin());

    match config.command {
        Command::Serve {
            listen_addr,
            reload_secs,
        } => {
            if let Some(path) = config.rankings.clone().filter(|_| reload_secs > 0) {
                spawn_reloader(
                    engine.rankings().clone(),
                    path,
                    loaded_json,
                    Duration::from_secs(reload_secs),
                );
            }
            serve(engine, &listen_addr).await?;
        }
        Command::Score { input } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let req: BatchRequest = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", input.display()))?;
            let (results, tally) = engine.score_batch(&req.result, &req.predictions);
            print_json(&api::BatchResponse { results, tally })?;
        }
        Command::Preview {
            home,
            away,
            home_goals,
            away_goals,
        } => {
            print_json(&engine.classify_difficulty(&home, &away, home_goals, away_goals))?;
        }
        Command::Rankings { as_of } => {
            let table = match as_of {
                Some(date) => engine.rankings().active_on(date),
                None => engine.rankings().current(),
            };
            println!("{} ({} teams)", table.label(), table.len());
            for team in table.teams() {
                println!("{:>3}  G{}  {}", team.rank, team.tier, team.name);
            }
        }
    }

    Ok(())
}

/// Returns the schedule and, when it came from a file, the text it was parsed from.
fn load_schedule(path: Option<&Path>) -> Result<(RankingSchedule, Option<String>)> {
    match path {
        Some(path) => {
            let (schedule, json) = RankingSchedule::load_with_source(path)?;
            info!(
                "Loaded {} ranking table(s) from {}",
                schedule.tables().len(),
                path.display()
            );
            Ok((schedule, Some(json)))
        }
        None => {
            info!("No rankings file configured, using built-in season table");
            Ok((RankingSchedule::builtin(), None))
        }
    }
}

async fn serve(engine: ScoringEngine, listen_addr: &str) -> Result<()> {
    let app = api::router(AppState { engine });
    let addr: SocketAddr = listen_addr.parse()?;
    info!("Scoring API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically re-read the rankings file and publish it as a whole.
/// A file that fails to load leaves the live schedule untouched.
fn spawn_reloader(
    store: RankingStore,
    path: PathBuf,
    mut last_json: Option<String>,
    every: Duration,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // first tick fires immediately; the file was just loaded
        interval.tick().await;

        loop {
            interval.tick().await;
            reload_if_changed(&store, &path, &mut last_json).await;
        }
    });
}

/// Re-read `path` and publish it unless it matches `last_json`.
/// Returns whether a new schedule was published.
async fn reload_if_changed(
    store: &RankingStore,
    path: &Path,
    last_json: &mut Option<String>,
) -> bool {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to read rankings file {}: {}", path.display(), e);
            return false;
        }
    };
    if last_json.as_deref() == Some(json.as_str()) {
        return false;
    }
    let published = match RankingSchedule::from_json(&json, &path.display().to_string()) {
        Ok(schedule) => {
            store.publish(schedule);
            true
        }
        Err(e) => {
            warn!("Rankings reload rejected, keeping current table: {}", e);
            false
        }
    };
    *last_json = Some(json);
    published
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn schedule_json(label: &str, order: &[&str]) -> String {
        let teams: Vec<String> = order
            .iter()
            .enumerate()
            .map(|(i, name)| format!(r#"{{"name": "{}", "rank": {}}}"#, name, i + 1))
            .collect();
        format!(
            r#"{{"tables": [{{"label": "{}", "effective_from": "2025-08-01", "teams": [{}]}}]}}"#,
            label,
            teams.join(", ")
        )
    }

    #[tokio::test]
    async fn reload_compares_against_the_text_that_was_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rankings.json");
        std::fs::write(&path, schedule_json("first", &["A", "B", "C", "D"])).unwrap();

        let (schedule, mut last_json) = load_schedule(Some(path.as_path())).unwrap();
        let store = RankingStore::new(schedule);

        // edited after startup but before the reloader's first look
        std::fs::write(&path, schedule_json("second", &["D", "C", "B", "A"])).unwrap();

        assert!(reload_if_changed(&store, &path, &mut last_json).await);
        assert_eq!(store.current().label(), "second");
        assert!(!reload_if_changed(&store, &path, &mut last_json).await);
    }

    #[tokio::test]
    async fn bad_reload_keeps_the_live_schedule() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rankings.json");
        std::fs::write(&path, schedule_json("good", &["A", "B", "C", "D"])).unwrap();
        let (schedule, mut last_json) = load_schedule(Some(path.as_path())).unwrap();
        let store = RankingStore::new(schedule);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(!reload_if_changed(&store, &path, &mut last_json).await);
        assert_eq!(store.current().label(), "good");

        std::fs::remove_file(&path).unwrap();
        assert!(!reload_if_changed(&store, &path, &mut last_json).await);
        assert_eq!(store.current().label(), "good");
    }

    #[test]
    fn builtin_schedule_has_no_source_text() {
        let (schedule, json) = load_schedule(None).unwrap();
        assert_eq!(schedule.tables().len(), 1);
        assert!(json.is_none());
    }
}
