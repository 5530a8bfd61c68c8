use core::fmt;
use serde::{Deserialize, Serialize};

/// Stage of a Schnapsen game.
///
/// During `One` the talon is open and players draw after every trick; trump
/// exchanges are only legal here. `Two` starts once the talon is closed or
/// exhausted and suit-following becomes mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    One,
    Two,
}

impl GamePhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            GamePhase::One => "one",
            GamePhase::Two => "two",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
