use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Prediction-game scoring engine
#[derive(Parser, Debug, Clone)]
#[command(name = "scorecast", version, about)]
pub struct Config {
    /// JSON ranking schedule; the built-in season table is used when absent
    #[arg(long, env = "RANKINGS_PATH", global = true)]
    pub rankings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the preview / scoring HTTP API
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,

        /// Re-read the rankings file every N seconds (0 = never)
        #[arg(long, env = "RANKINGS_RELOAD_SECS", default_value = "0")]
        reload_secs: u64,
    },

    /// Score predictions for one fixture from a JSON file
    Score {
        /// File holding `{ "result": {...}, "predictions": [...] }`
        #[arg(long)]
        input: PathBuf,
    },

    /// Show the implied difficulty of a scoreline
    Preview {
        #[arg(long)]
        home: String,
        #[arg(long)]
        away: String,
        #[arg(long)]
        home_goals: u32,
        #[arg(long)]
        away_goals: u32,
    },

    /// Print the ranking table in force (today, or on --as-of)
    Rankings {
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Command::Serve {
            listen_addr,
            reload_secs,
        } = &self.command
        {
            if listen_addr.parse::<SocketAddr>().is_err() {
                anyhow::bail!("listen_addr '{}' is not a valid socket address", listen_addr);
            }
            if *reload_secs > 0 && self.rankings.is_none() {
                anyhow::bail!(
                    "RANKINGS_RELOAD_SECS needs a rankings file. Set --rankings or RANKINGS_PATH."
                );
            }
        }
        Ok(())
    }
}
