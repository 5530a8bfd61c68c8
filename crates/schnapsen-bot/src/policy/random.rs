use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use schnapsen_core::game::bot::{Bot, BotError};
use schnapsen_core::game::perspective::{PlayerPerspective, Turn};
use schnapsen_core::model::moves::Move;
use tracing::{Level, event};

/// Baseline bot that plays a uniformly random legal move.
pub struct RandBot {
    name: String,
    rng: StdRng,
}

impl RandBot {
    pub fn new(name: impl Into<String>, rng: StdRng) -> Self {
        Self {
            name: name.into(),
            rng,
        }
    }

    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self::new(name, StdRng::seed_from_u64(seed))
    }
}

impl Bot for RandBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(
        &mut self,
        perspective: &dyn PlayerPerspective,
        turn: Turn,
    ) -> Result<Move, BotError> {
        let moves = perspective.valid_moves();
        let chosen = moves
            .choose(&mut self.rng)
            .copied()
            .ok_or(BotError::NoCandidateMove)?;
        event!(
            target: "schnapsen_bot::play",
            Level::TRACE,
            bot = %self.name,
            leading = turn.is_leading(),
            legal_count = moves.len(),
            chosen = %chosen,
            reason = "random",
        );
        Ok(chosen)
    }
}
