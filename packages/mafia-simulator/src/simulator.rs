//! In-memory game simulator.
//!
//! Drives a `Session` directly with bot players. No registry, no timers and
//! no messaging: every window closes as soon as the bots have acted.

use mafia::domain::{
    ActionKind, Phase, PlayerId, Role, RoundOutcome, Session, Verdict,
};
use mafia::DomainError;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::types::BotKind;

/// Games still undecided after this many windows are called a stalemate.
pub const MAX_ROUNDS: u32 = 200;

/// Chance a random-bot sniper fires on a given night.
const SNIPER_FIRE_CHANCE: f64 = 0.25;

const BOT_SEED_SALT: u64 = 0x5EED_B075;

#[derive(Debug, Clone)]
pub struct GameResult {
    pub verdict: Verdict,
    /// Hit `MAX_ROUNDS` without a verdict.
    pub stalemate: bool,
    pub roles: Vec<(PlayerId, Role)>,
    pub survivors: Vec<PlayerId>,
    pub rounds: Vec<RoundOutcome>,
}

pub struct Simulator {
    seed: u64,
    players: usize,
    bots: BotKind,
}

impl Simulator {
    pub fn new(seed: u64, players: usize, bots: BotKind) -> Self {
        Self {
            seed,
            players,
            bots,
        }
    }

    pub fn simulate_game(&self) -> Result<GameResult, SimulatorError> {
        let mut session = Session::new(1, 1, self.seed);
        for id in 1..=self.players as PlayerId {
            session.join(id, format!("bot-{id}"))?;
        }
        let roles = session.start(1)?;
        let mut rng = StdRng::seed_from_u64(self.seed ^ BOT_SEED_SALT);

        let mut rounds = Vec::new();
        while session.phase() != Phase::Ended {
            if session.round_no() > MAX_ROUNDS {
                return Ok(GameResult {
                    verdict: Verdict::Undecided,
                    stalemate: true,
                    roles,
                    survivors: session.roster().living_ids(),
                    rounds,
                });
            }
            match session.phase() {
                Phase::Night => self.play_night(&mut session, &mut rng)?,
                Phase::Day => play_day(&mut session, &mut rng)?,
                phase => return Err(SimulatorError::InvalidState(format!("{phase:?}"))),
            }
            rounds.push(session.resolve_round()?);
        }

        let verdict = rounds
            .last()
            .map(|r| r.verdict)
            .ok_or_else(|| SimulatorError::InvalidState("game ended without a round".into()))?;
        Ok(GameResult {
            verdict,
            stalemate: false,
            roles,
            survivors: session.roster().living_ids(),
            rounds,
        })
    }

    fn play_night(&self, session: &mut Session, rng: &mut StdRng) -> Result<(), SimulatorError> {
        if self.bots == BotKind::Passive {
            return Ok(());
        }

        let acting: Vec<(PlayerId, Role)> = session
            .roster()
            .living()
            .filter_map(|p| p.role.filter(|r| r.is_night_role()).map(|r| (p.id, r)))
            .collect();

        for (actor, role) in acting {
            for &kind in role.night_actions() {
                if kind == ActionKind::SniperShot
                    && (session.flags().sniper_used || !rng.random_bool(SNIPER_FIRE_CHANCE))
                {
                    continue;
                }
                let Some(target) = pick_target(session, actor, kind, rng) else {
                    continue;
                };
                session.submit_night_action(actor, role, kind, target)?;
            }
        }
        Ok(())
    }
}

/// Everyone votes. Mafia never votes for its own.
fn play_day(session: &mut Session, rng: &mut StdRng) -> Result<(), SimulatorError> {
    let voters = session.roster().living_ids();
    for voter in voters {
        let mafia = session
            .roster()
            .get(voter)
            .is_some_and(|p| p.is_mafia_aligned());
        let candidates: Vec<PlayerId> = session
            .roster()
            .living()
            .filter(|p| p.id != voter && !(mafia && p.is_mafia_aligned()))
            .map(|p| p.id)
            .collect();
        if let Some(target) = candidates.choose(rng) {
            session.submit_vote(voter, *target)?;
        }
    }
    Ok(())
}

/// Heals and guards may land on anyone living; the mafia's kill and check
/// avoid their own; everything else avoids the actor.
fn pick_target(
    session: &Session,
    actor: PlayerId,
    kind: ActionKind,
    rng: &mut StdRng,
) -> Option<PlayerId> {
    let actor_mafia = session
        .roster()
        .get(actor)
        .is_some_and(|p| p.is_mafia_aligned());
    let candidates: Vec<PlayerId> = session
        .roster()
        .living()
        .filter(|p| match kind {
            ActionKind::Heal | ActionKind::Guard => true,
            ActionKind::FactionKill | ActionKind::DonCheck => {
                p.id != actor && !(actor_mafia && p.is_mafia_aligned())
            }
            _ => p.id != actor,
        })
        .map(|p| p.id)
        .collect();
    candidates.choose(rng).copied()
}

#[derive(Debug)]
pub enum SimulatorError {
    /// The engine rejected a bot move
    Domain(DomainError),
    /// Session left the night/day cycle unexpectedly
    InvalidState(String),
}

impl From<DomainError> for SimulatorError {
    fn from(err: DomainError) -> Self {
        SimulatorError::Domain(err)
    }
}

impl std::fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulatorError::Domain(err) => write!(f, "Domain error: {err}"),
            SimulatorError::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
        }
    }
}

impl std::error::Error for SimulatorError {}
