use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Instant;

use schnapsen_core::game::engine::{EngineError, GameOutcome, GamePlayEngine, PlayerSlot};
use schnapsen_core::game::perspective::{PerspectiveSnapshot, Turn};
use schnapsen_core::model::card::Card;
use schnapsen_core::model::moves::Move;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

use crate::config::EngineConfig;

/// Engine reached through a child process speaking JSON lines.
///
/// One process per game: the driver sends `play_game`, then answers every
/// `move_request` for a local player until the engine reports `game_over`.
pub struct ExternalEngine {
    options: EngineConfig,
}

impl ExternalEngine {
    pub fn new(options: EngineConfig) -> Self {
        if options.command.is_none() {
            event!(
                target: "schnapsen_bench::external",
                Level::WARN,
                "no engine command configured; games will fail"
            );
        }
        Self { options }
    }

    fn spawn(&self) -> Result<Child, EngineError> {
        let command = match &self.options.command {
            Some(cmd) if !cmd.is_empty() => cmd,
            _ => return Err(EngineError::Unavailable("no command configured".into())),
        };

        let mut cmd = Command::new(command);
        if !self.options.args.is_empty() {
            cmd.args(&self.options.args);
        }
        if let Some(dir) = &self.options.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::piped()).stdout(Stdio::piped());

        cmd.spawn()
            .map_err(|err| EngineError::Unavailable(format!("failed to spawn '{command}': {err}")))
    }
}

impl GamePlayEngine for ExternalEngine {
    fn play_game(
        &mut self,
        players: [PlayerSlot<'_>; 2],
        seed: u64,
    ) -> Result<GameOutcome, EngineError> {
        let start = Instant::now();
        let mut child = self.spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Io("stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Io("stdout".into()))?;

        let outcome = match drive_game(players, seed, stdin, stdout) {
            Ok(outcome) => outcome,
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(err);
            }
        };

        let status = child
            .wait()
            .map_err(|err| EngineError::Io(err.to_string()))?;
        if !status.success() {
            return Err(EngineError::Protocol(format!("exit status {status}")));
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        if let Some(timeout) = self.options.timeout_ms
            && elapsed_ms > timeout as f64
        {
            event!(
                target: "schnapsen_bench::external",
                Level::WARN,
                seed,
                elapsed_ms,
                timeout_ms = timeout,
                "engine game exceeded timeout"
            );
        }

        Ok(outcome)
    }
}

fn drive_game(
    mut players: [PlayerSlot<'_>; 2],
    seed: u64,
    mut stdin: ChildStdin,
    stdout: ChildStdout,
) -> Result<GameOutcome, EngineError> {
    let request = PlayGameRequest {
        action: "play_game",
        seed,
        players: players.iter().map(PlayerDescriptor::from_slot).collect(),
    };
    send(&mut stdin, &request)?;

    let mut lines = BufReader::new(stdout).lines();
    loop {
        let line = match lines.next() {
            Some(line) => line.map_err(|err| EngineError::Io(err.to_string()))?,
            None => {
                return Err(EngineError::Protocol(
                    "engine closed its output before game_over".into(),
                ));
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let message: EngineMessage = serde_json::from_str(&line)
            .map_err(|err| EngineError::Protocol(format!("{err}: {line}")))?;

        match message {
            EngineMessage::MoveRequest {
                player,
                perspective,
                leader_card,
            } => {
                let slot = players.get_mut(player).ok_or_else(|| {
                    EngineError::Protocol(format!("move requested for unknown player {player}"))
                })?;
                let chosen = match slot {
                    PlayerSlot::Local(bot) => {
                        let turn = Turn::from_leader_card(leader_card);
                        match bot.get_move(&perspective, turn) {
                            Ok(chosen) => chosen,
                            Err(source) => {
                                return Err(EngineError::Bot {
                                    player: bot.name().to_string(),
                                    source,
                                });
                            }
                        }
                    }
                    PlayerSlot::Hosted { name, .. } => {
                        return Err(EngineError::Protocol(format!(
                            "engine requested a move from hosted player '{name}'"
                        )));
                    }
                };
                send(&mut stdin, &MoveReply { chosen })?;
            }
            EngineMessage::GameOver {
                winner,
                game_points,
            } => {
                if winner >= players.len() {
                    return Err(EngineError::Protocol(format!(
                        "winner index {winner} out of range"
                    )));
                }
                return Ok(GameOutcome {
                    winner,
                    game_points,
                });
            }
        }
    }
}

fn send<T: Serialize>(stdin: &mut ChildStdin, message: &T) -> Result<(), EngineError> {
    serde_json::to_writer(&mut *stdin, message)
        .map_err(|err| EngineError::Protocol(err.to_string()))?;
    stdin
        .write_all(b"\n")
        .and_then(|_| stdin.flush())
        .map_err(|err| EngineError::Io(err.to_string()))
}

#[derive(Serialize)]
struct PlayGameRequest {
    action: &'static str,
    seed: u64,
    players: Vec<PlayerDescriptor>,
}

#[derive(Serialize)]
struct PlayerDescriptor {
    name: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<serde_json::Value>,
}

impl PlayerDescriptor {
    fn from_slot(slot: &PlayerSlot<'_>) -> Self {
        match slot {
            PlayerSlot::Local(bot) => Self {
                name: bot.name().to_string(),
                kind: "local",
                params: None,
            },
            PlayerSlot::Hosted { name, params } => Self {
                name: name.to_string(),
                kind: "hosted",
                params: Some((*params).clone()),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EngineMessage {
    MoveRequest {
        player: usize,
        perspective: PerspectiveSnapshot,
        #[serde(default)]
        leader_card: Option<Card>,
    },
    GameOver {
        winner: usize,
        game_points: u32,
    },
}

#[derive(Serialize)]
struct MoveReply {
    #[serde(rename = "move")]
    chosen: Move,
}
