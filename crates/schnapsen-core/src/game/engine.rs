use crate::game::bot::{Bot, BotError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two participants handed to the engine for a game.
pub enum PlayerSlot<'a> {
    /// Decisions come from a bot in this process.
    Local(&'a mut dyn Bot),
    /// Decisions come from a bot the engine runs itself (e.g. a sampling bot).
    Hosted {
        name: &'a str,
        params: &'a serde_json::Value,
    },
}

impl PlayerSlot<'_> {
    pub fn name(&self) -> &str {
        match self {
            PlayerSlot::Local(bot) => bot.name(),
            PlayerSlot::Hosted { name, .. } => name,
        }
    }

    pub const fn is_local(&self) -> bool {
        matches!(self, PlayerSlot::Local(_))
    }
}

/// Result of one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Index into the `players` array passed to [`GamePlayEngine::play_game`].
    pub winner: usize,
    pub game_points: u32,
}

/// Plays complete games; owns the rules, dealing and scoring.
pub trait GamePlayEngine {
    /// `players[0]` leads the first trick.
    fn play_game(
        &mut self,
        players: [PlayerSlot<'_>; 2],
        seed: u64,
    ) -> Result<GameOutcome, EngineError>;
}

#[derive(Debug)]
pub enum EngineError {
    /// A local bot failed to produce a legal move; fatal to the game.
    Bot { player: String, source: BotError },
    Unavailable(String),
    Io(String),
    Protocol(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Bot { player, source } => write!(f, "bot '{player}' failed: {source}"),
            EngineError::Unavailable(message) => write!(f, "engine unavailable: {message}"),
            EngineError::Io(message) => write!(f, "engine I/O error: {message}"),
            EngineError::Protocol(message) => write!(f, "engine protocol error: {message}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Bot { source, .. } => Some(source),
            _ => None,
        }
    }
}
