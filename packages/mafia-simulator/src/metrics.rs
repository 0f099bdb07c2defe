//! Metrics collection and output for simulation results.

use mafia::domain::{Phase, PlayerId, Role, RoundOutcome, Verdict};
use serde::Serialize;

use crate::simulator::GameResult;
use crate::types::BotKind;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: GameConfig,
    pub result: GameResultMetrics,
    pub rounds: Vec<RoundOutcome>,
    pub players: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    pub players: usize,
    pub bots: BotKind,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub verdict: Verdict,
    pub stalemate: bool,
    pub rounds_played: usize,
    pub night_deaths: usize,
    pub executions: usize,
    pub vengeance_triggered: bool,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub player: PlayerId,
    pub role: Role,
    pub survived: bool,
    /// Round in which the player died.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub died_in_round: Option<u32>,
}

pub fn build_game_metrics(
    game_id: u32,
    seed: u64,
    config: GameConfig,
    result: &GameResult,
    duration_ms: f64,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let night_deaths = result
        .rounds
        .iter()
        .filter(|r| r.resolved == Phase::Night)
        .map(|r| r.deaths.len())
        .sum();
    let executions = result
        .rounds
        .iter()
        .filter(|r| r.executed.is_some())
        .count();

    let players = result
        .roles
        .iter()
        .map(|(player, role)| PlayerMetrics {
            player: *player,
            role: *role,
            survived: result.survivors.contains(player),
            died_in_round: result
                .rounds
                .iter()
                .find(|r| r.deaths.contains(player))
                .map(|r| r.round_no),
        })
        .collect();

    GameMetrics {
        game_id,
        seed,
        timestamp,
        config,
        result: GameResultMetrics {
            verdict: result.verdict,
            stalemate: result.stalemate,
            rounds_played: result.rounds.len(),
            night_deaths,
            executions,
            vengeance_triggered: result.rounds.iter().any(|r| r.vengeance.is_some()),
            duration_ms,
        },
        rounds: result.rounds.clone(),
        players,
    }
}

/// Flat summary row for CSV output.
#[derive(Debug, Clone, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub players: usize,
    pub bots: &'static str,
    pub winner: String,
    pub rounds_played: usize,
    pub night_deaths: usize,
    pub executions: usize,
    pub survivors: usize,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            players: metrics.config.players,
            bots: metrics.config.bots.name(),
            winner: winner_label(metrics.result.verdict),
            rounds_played: metrics.result.rounds_played,
            night_deaths: metrics.result.night_deaths,
            executions: metrics.result.executions,
            survivors: metrics.players.iter().filter(|p| p.survived).count(),
        }
    }
}

pub fn winner_label(verdict: Verdict) -> String {
    match verdict {
        Verdict::Winner(faction) => faction.to_string(),
        Verdict::NoOne => "никто".to_string(),
        Verdict::Undecided => "ничья".to_string(),
    }
}
