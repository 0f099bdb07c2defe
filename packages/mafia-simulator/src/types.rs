//! Shared types for the simulator.

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per game plus the CSV summary.
    Jsonl,
    /// CSV summary only.
    Csv,
}

/// How bots behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BotKind {
    /// Every night role acts on a random plausible target; everyone votes.
    Random,
    /// Nobody acts at night; everyone votes.
    Passive,
}

impl BotKind {
    pub fn name(self) -> &'static str {
        match self {
            BotKind::Random => "random",
            BotKind::Passive => "passive",
        }
    }
}
