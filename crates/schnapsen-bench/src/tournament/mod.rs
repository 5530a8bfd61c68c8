mod external;

pub use external::ExternalEngine;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use schnapsen_bot::{HeuristicBot, HeuristicParams, RandBot};
use schnapsen_core::game::bot::Bot;
use schnapsen_core::game::engine::{EngineError, GamePlayEngine, PlayerSlot};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, AgentKind, TournamentConfig};

/// Round-robin driver: every pair of agents plays `repeats` games.
pub struct TournamentRunner {
    config: TournamentConfig,
    agents: Vec<AgentBlueprint>,
}

/// Per-agent tallies after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentTally {
    pub name: String,
    pub game_points: u64,
    pub games_won: u32,
}

/// Summary details returned after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentSummary {
    pub run_id: String,
    pub games_played: usize,
    pub tallies: Vec<AgentTally>,
}

impl TournamentSummary {
    pub fn write_json(&self, path: &Path) -> Result<(), RunnerError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// `name: points` pairs in agent order, as shown in progress lines.
    pub fn tally_line(&self) -> String {
        format_tallies(&self.tallies)
    }
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: TournamentConfig) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents, config.seed.unwrap_or(0))?;
        if agents.len() < 2 {
            return Err(RunnerError::AgentCount {
                found: agents.len(),
            });
        }
        Ok(Self { config, agents })
    }

    /// Unordered agent pairs `(a, b)` with `a < b`.
    pub fn matches(&self) -> Vec<(usize, usize)> {
        let n = self.agents.len();
        (0..n)
            .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
            .collect()
    }

    pub fn total_games(&self) -> usize {
        self.matches().len() * self.config.repeats
    }

    /// Play every scheduled game through `engine`.
    pub fn run<E: GamePlayEngine>(&self, engine: &mut E) -> Result<TournamentSummary, RunnerError> {
        let mut rng = StdRng::seed_from_u64(self.config.seed.unwrap_or(0));
        let mut participants: Vec<Participant> =
            self.agents.iter().map(AgentBlueprint::spawn).collect();
        let mut tallies: Vec<AgentTally> = self
            .agents
            .iter()
            .map(|agent| AgentTally {
                name: agent.name.clone(),
                game_points: 0,
                games_won: 0,
            })
            .collect();

        let total_games = self.total_games();
        let mut played_games = 0usize;
        event!(
            target: "schnapsen_bench::progress",
            Level::INFO,
            run_id = %self.config.run_id,
            total_games,
            "Playing {total_games} games"
        );

        for (a, b) in self.matches() {
            for repeat in 0..self.config.repeats {
                let order = if rng.gen_bool(0.5) { [a, b] } else { [b, a] };
                let seed = self.config.game_seed.unwrap_or_else(|| rng.next_u64());

                let outcome = {
                    let (first, second) = pair_mut(&mut participants, order[0], order[1]);
                    engine
                        .play_game([first.slot(), second.slot()], seed)
                        .map_err(|source| RunnerError::Engine {
                            game: played_games,
                            source,
                        })?
                };

                let winner = *order.get(outcome.winner).ok_or(RunnerError::InvalidWinner {
                    game: played_games,
                    winner: outcome.winner,
                })?;
                tallies[winner].game_points += u64::from(outcome.game_points);
                tallies[winner].games_won += 1;
                played_games += 1;

                let percent = played_games as f64 / total_games as f64 * 100.0;
                let tally_line = format_tallies(&tallies);
                event!(
                    target: "schnapsen_bench::progress",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    leader = %self.agents[order[0]].name,
                    follower = %self.agents[order[1]].name,
                    repeat,
                    seed,
                    winner = %self.agents[winner].name,
                    game_points = outcome.game_points,
                    "Played {played_games} out of {total_games} games ({percent:.0}%): {tally_line}"
                );
            }
        }

        Ok(TournamentSummary {
            run_id: self.config.run_id.clone(),
            games_played: played_games,
            tallies,
        })
    }
}

fn format_tallies(tallies: &[AgentTally]) -> String {
    let entries = tallies
        .iter()
        .map(|tally| format!("{}: {}", tally.name, tally.game_points))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{entries}}}")
}

fn pair_mut<T>(items: &mut [T], first: usize, second: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(first, second);
    if first < second {
        let (head, tail) = items.split_at_mut(second);
        (&mut head[first], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(first);
        (&mut tail[0], &mut head[second])
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("game {game} failed: {source}")]
    Engine {
        game: usize,
        #[source]
        source: EngineError,
    },
    #[error("game {game} reported unknown winner index {winner}")]
    InvalidWinner { game: usize, winner: usize },
    #[error("a round robin requires at least 2 agents but found {found}")]
    AgentCount { found: usize },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize summary: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid heuristic parameter for agent '{name}': {message}")]
    InvalidHeuristicParam { name: String, message: String },
    #[error("invalid random parameter for agent '{name}': {message}")]
    InvalidRandomParam { name: String, message: String },
    #[error("invalid hosted parameter for agent '{name}': {message}")]
    InvalidHostedParam { name: String, message: String },
}

struct AgentBlueprint {
    name: String,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Heuristic(HeuristicParams),
    Random { seed: u64 },
    Hosted(serde_json::Value),
}

enum Participant {
    Local(Box<dyn Bot>),
    Hosted {
        name: String,
        params: serde_json::Value,
    },
}

impl Participant {
    fn slot(&mut self) -> PlayerSlot<'_> {
        match self {
            Participant::Local(bot) => PlayerSlot::Local(bot.as_mut()),
            Participant::Hosted { name, params } => PlayerSlot::Hosted {
                name: name.as_str(),
                params: &*params,
            },
        }
    }
}

impl AgentBlueprint {
    /// Unseeded random agents get the tournament seed offset by their index.
    fn from_configs(configs: &[AgentConfig], tournament_seed: u64) -> Result<Vec<Self>, AgentError> {
        configs
            .iter()
            .enumerate()
            .map(|(index, config)| {
                Self::from_config(config, tournament_seed.wrapping_add(index as u64))
            })
            .collect()
    }

    fn from_config(config: &AgentConfig, default_seed: u64) -> Result<Self, AgentError> {
        let implementation = match config.kind {
            AgentKind::Heuristic => {
                AgentImplementation::Heuristic(heuristic_params(&config.name, &config.params)?)
            }
            AgentKind::Random => AgentImplementation::Random {
                seed: random_seed(&config.name, &config.params, default_seed)?,
            },
            AgentKind::Hosted => {
                let params = serde_json::to_value(&config.params).map_err(|err| {
                    AgentError::InvalidHostedParam {
                        name: config.name.clone(),
                        message: err.to_string(),
                    }
                })?;
                AgentImplementation::Hosted(params)
            }
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    fn spawn(&self) -> Participant {
        match &self.implementation {
            AgentImplementation::Heuristic(params) => {
                Participant::Local(Box::new(HeuristicBot::with_params(self.name.clone(), *params)))
            }
            AgentImplementation::Random { seed } => {
                Participant::Local(Box::new(RandBot::seeded(self.name.clone(), *seed)))
            }
            AgentImplementation::Hosted(params) => Participant::Hosted {
                name: self.name.clone(),
                params: params.clone(),
            },
        }
    }
}

fn heuristic_params(name: &str, params: &serde_yaml::Value) -> Result<HeuristicParams, AgentError> {
    let mut parsed = HeuristicParams::default();
    if params.is_null() {
        return Ok(parsed);
    }

    let mapping = params
        .as_mapping()
        .ok_or_else(|| AgentError::InvalidHeuristicParam {
            name: name.to_string(),
            message: "expected mapping for heuristic params".to_string(),
        })?;

    for (key, value) in mapping {
        let key = key.as_str().unwrap_or_default();
        let slot = match key {
            "prefer_trump_marriage" => &mut parsed.prefer_trump_marriage,
            "discard_avoids_trump" => &mut parsed.discard_avoids_trump,
            "contest_led_suit" => &mut parsed.contest_led_suit,
            other => {
                return Err(AgentError::InvalidHeuristicParam {
                    name: name.to_string(),
                    message: format!("unknown parameter '{other}'"),
                });
            }
        };
        *slot = value
            .as_bool()
            .ok_or_else(|| AgentError::InvalidHeuristicParam {
                name: name.to_string(),
                message: format!("{key} must be a boolean"),
            })?;
    }

    Ok(parsed)
}

fn random_seed(name: &str, params: &serde_yaml::Value, default_seed: u64) -> Result<u64, AgentError> {
    if params.is_null() {
        return Ok(default_seed);
    }

    let mapping = params
        .as_mapping()
        .ok_or_else(|| AgentError::InvalidRandomParam {
            name: name.to_string(),
            message: "expected mapping for random params".to_string(),
        })?;

    let seed_value = mapping
        .iter()
        .find_map(|(key, value)| (key.as_str() == Some("seed")).then_some(value));

    match seed_value {
        Some(value) => value.as_u64().ok_or_else(|| AgentError::InvalidRandomParam {
            name: name.to_string(),
            message: "seed must be a non-negative integer".to_string(),
        }),
        None => Ok(default_seed),
    }
}
