use crate::game::perspective::{PlayerPerspective, Turn};
use crate::model::moves::Move;
use std::fmt;

/// A player the engine asks for one move per turn.
pub trait Bot {
    fn name(&self) -> &str;

    fn get_move(
        &mut self,
        perspective: &dyn PlayerPerspective,
        turn: Turn,
    ) -> Result<Move, BotError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    /// Every candidate list was empty, including the fallback.
    NoCandidateMove,
    /// The chosen move is not among the engine's legal moves.
    IllegalMove { chosen: Move },
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::NoCandidateMove => write!(f, "no legal move available"),
            BotError::IllegalMove { chosen } => {
                write!(f, "chosen move '{chosen}' is not legal in this position")
            }
        }
    }
}

impl std::error::Error for BotError {}

/// Rejects a move outside the perspective's legal set.
pub fn ensure_legal(perspective: &dyn PlayerPerspective, chosen: Move) -> Result<Move, BotError> {
    if perspective.valid_moves().contains(&chosen) {
        Ok(chosen)
    } else {
        Err(BotError::IllegalMove { chosen })
    }
}
