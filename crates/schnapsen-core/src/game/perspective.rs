use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::moves::Move;
use crate::model::phase::GamePhase;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Read-only view of a game from the acting player's seat.
///
/// Implemented by the engine; bots only query it.
pub trait PlayerPerspective {
    /// Moves the engine accepts right now, in engine enumeration order.
    fn valid_moves(&self) -> Vec<Move>;

    fn hand(&self) -> &Hand;

    fn trump_suit(&self) -> Suit;

    fn phase(&self) -> GamePhase;

    /// Card the opponent put on the table in the previous trick.
    fn opponent_last_card(&self) -> Option<Card>;
}

/// Position of the acting player within the current trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Leading,
    /// Following the card the opponent led.
    Following(Card),
}

impl Turn {
    pub fn from_leader_card(card: Option<Card>) -> Self {
        card.map_or(Turn::Leading, Turn::Following)
    }

    pub const fn is_leading(self) -> bool {
        matches!(self, Turn::Leading)
    }

    pub const fn led_card(self) -> Option<Card> {
        match self {
            Turn::Leading => None,
            Turn::Following(card) => Some(card),
        }
    }
}

/// Owned perspective, as shipped by the engine over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveSnapshot {
    pub hand: Hand,
    pub trump_suit: Suit,
    pub phase: GamePhase,
    pub valid_moves: Vec<Move>,
    #[serde(default)]
    pub opponent_last_card: Option<Card>,
}

impl PerspectiveSnapshot {
    pub fn new(hand: Hand, trump_suit: Suit, phase: GamePhase, valid_moves: Vec<Move>) -> Self {
        Self {
            hand,
            trump_suit,
            phase,
            valid_moves,
            opponent_last_card: None,
        }
    }

    /// Snapshot where every card in hand may be played and the listed extra
    /// moves (marriages, exchanges) follow the card plays.
    pub fn open(hand: Hand, trump_suit: Suit, phase: GamePhase, extra: &[Move]) -> Self {
        let mut valid_moves: Vec<Move> = hand.iter().copied().map(Move::regular).collect();
        valid_moves.extend_from_slice(extra);
        Self::new(hand, trump_suit, phase, valid_moves)
    }

    pub fn with_opponent_last_card(mut self, card: Option<Card>) -> Self {
        self.opponent_last_card = card;
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl PlayerPerspective for PerspectiveSnapshot {
    fn valid_moves(&self) -> Vec<Move> {
        self.valid_moves.clone()
    }

    fn hand(&self) -> &Hand {
        &self.hand
    }

    fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn opponent_last_card(&self) -> Option<Card> {
        self.opponent_last_card
    }
}
