//! Game loop: the driver that asks an agent for one move per turn.

use anyhow::{ensure, Context, Result};
use mosaic_core::{Game, Player};
use mosaic_game::{MosaicGame, MosaicMove};
use mosaic_mcts::{Agent, SearchConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Rounds after which a game is abandoned.
const MAX_ROUNDS: u32 = 50;

/// Which configured agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentLabel {
    First,
    Second,
}

/// One decision in a game.
#[derive(Clone, Debug, Serialize)]
pub struct MoveRecord {
    pub round: u32,
    pub player: Player,
    pub action: MosaicMove,
    pub iterations: u32,
    pub nodes: u64,
}

/// A finished game.
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub seed: u64,
    /// Agent sitting in the first-player seat.
    pub first_seat: AgentLabel,
    /// Final scores by seat.
    pub scores: [i32; 2],
    pub winner: Option<AgentLabel>,
    pub rounds: u32,
    pub decisions: usize,
    /// Total MCTS iterations per agent, `[first, second]` by label.
    pub iterations: [u64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moves: Option<Vec<MoveRecord>>,
}

impl GameRecord {
    /// Final score of the given agent.
    pub fn score_of(&self, label: AgentLabel) -> i32 {
        if label == self.first_seat {
            self.scores[0]
        } else {
            self.scores[1]
        }
    }
}

/// Play one game between the two configured agents.
///
/// With `swap_seats` the `[second]` agent moves first.
pub fn play_game(
    first: &SearchConfig,
    second: &SearchConfig,
    seed: u64,
    swap_seats: bool,
    record_moves: bool,
) -> Result<GameRecord> {
    let game = MosaicGame;
    let (seat0, seat1) = if swap_seats {
        (AgentLabel::Second, AgentLabel::First)
    } else {
        (AgentLabel::First, AgentLabel::Second)
    };
    let config_for = |label: AgentLabel| match label {
        AgentLabel::First => first.clone(),
        AgentLabel::Second => second.clone(),
    };
    let mut agents = [
        Agent::new(config_for(seat0), ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)))?,
        Agent::new(config_for(seat1), ChaCha8Rng::seed_from_u64(seed.wrapping_add(2)))?,
    ];
    let labels = [seat0, seat1];

    let mut state = game.new_game(seed);
    let mut moves = Vec::new();
    let mut iterations = [0u64; 2];
    let mut decisions = 0;

    while !game.is_game_over(&state) {
        ensure!(state.round() <= MAX_ROUNDS, "game {seed} exceeded {MAX_ROUNDS} rounds");

        while game.has_remaining_material(&state) {
            let player = state.to_move();
            let legal = game.legal_actions(&state, player);
            let budget = agents[player.index()].config().time_limit;
            let decision = agents[player.index()]
                .decide(&game, &state, player, legal, budget)
                .with_context(|| format!("{player} failed to move in game {seed}"))?;

            debug!(
                seed,
                round = state.round(),
                %player,
                action = %decision.action,
                iterations = decision.stats.iterations,
                "move"
            );
            let label = labels[player.index()];
            iterations[label as usize] += u64::from(decision.stats.iterations);
            if record_moves {
                moves.push(MoveRecord {
                    round: state.round(),
                    player,
                    action: decision.action,
                    iterations: decision.stats.iterations,
                    nodes: decision.stats.nodes,
                });
            }

            state = game.apply(&state, player, &decision.action)?;
            decisions += 1;
        }
        state = game.finish_round(&state)?;
    }

    let scores = [state.score(Player::First), state.score(Player::Second)];
    let winner = game.winner(&state).map(|seat| labels[seat.index()]);
    info!(seed, ?scores, ?winner, rounds = state.round() - 1, "game finished");

    Ok(GameRecord {
        seed,
        first_seat: seat0,
        scores,
        winner,
        rounds: state.round() - 1,
        decisions,
        iterations,
        moves: record_moves.then_some(moves),
    })
}

/// Aggregate results of a match.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchSummary {
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    pub first_mean_score: f64,
    pub second_mean_score: f64,
}

impl MatchSummary {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let games = records.len();
        let count = |label: AgentLabel| records.iter().filter(|r| r.winner == Some(label)).count();
        let mean = |label: AgentLabel| {
            if games == 0 {
                0.0
            } else {
                records.iter().map(|r| f64::from(r.score_of(label))).sum::<f64>() / games as f64
            }
        };
        let first_wins = count(AgentLabel::First);
        let second_wins = count(AgentLabel::Second);
        Self {
            games,
            first_wins,
            second_wins,
            draws: games - first_wins - second_wins,
            first_mean_score: mean(AgentLabel::First),
            second_mean_score: mean(AgentLabel::Second),
        }
    }
}
