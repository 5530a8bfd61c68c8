use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Plain card play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegularMove {
    pub card: Card,
}

/// King and queen of one suit declared together; the queen is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marriage {
    pub queen: Card,
    pub king: Card,
}

/// Swap of the trump jack in hand for the face-up trump card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrumpExchange {
    pub jack: Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Move {
    Regular(RegularMove),
    Marriage(Marriage),
    TrumpExchange(TrumpExchange),
}

impl RegularMove {
    pub const fn new(card: Card) -> Self {
        Self { card }
    }
}

impl Marriage {
    pub const fn of_suit(suit: Suit) -> Self {
        Self {
            queen: Card::new(Rank::Queen, suit),
            king: Card::new(Rank::King, suit),
        }
    }

    pub const fn suit(self) -> Suit {
        self.queen.suit
    }

    pub const fn as_regular_move(self) -> RegularMove {
        RegularMove::new(self.queen)
    }
}

impl TrumpExchange {
    pub const fn for_trump(trump: Suit) -> Self {
        Self {
            jack: Card::new(Rank::Jack, trump),
        }
    }
}

impl Move {
    pub const fn regular(card: Card) -> Self {
        Move::Regular(RegularMove::new(card))
    }

    pub const fn marriage(suit: Suit) -> Self {
        Move::Marriage(Marriage::of_suit(suit))
    }

    pub const fn trump_exchange(trump: Suit) -> Self {
        Move::TrumpExchange(TrumpExchange::for_trump(trump))
    }

    pub const fn is_regular_move(&self) -> bool {
        matches!(self, Move::Regular(_))
    }

    pub const fn is_marriage(&self) -> bool {
        matches!(self, Move::Marriage(_))
    }

    pub const fn is_trump_exchange(&self) -> bool {
        matches!(self, Move::TrumpExchange(_))
    }

    /// Card put on the table by this move, if it puts one there.
    pub const fn as_regular_move(&self) -> Option<RegularMove> {
        match self {
            Move::Regular(regular) => Some(*regular),
            Move::Marriage(marriage) => Some(marriage.as_regular_move()),
            Move::TrumpExchange(_) => None,
        }
    }

    pub const fn as_marriage(&self) -> Option<Marriage> {
        match self {
            Move::Marriage(marriage) => Some(*marriage),
            _ => None,
        }
    }

    pub fn cards(&self) -> Vec<Card> {
        match self {
            Move::Regular(regular) => vec![regular.card],
            Move::Marriage(marriage) => vec![marriage.queen, marriage.king],
            Move::TrumpExchange(exchange) => vec![exchange.jack],
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Regular(regular) => write!(f, "play {}", regular.card),
            Move::Marriage(marriage) => {
                write!(f, "marriage {}+{}", marriage.queen, marriage.king)
            }
            Move::TrumpExchange(exchange) => write!(f, "exchange {}", exchange.jack),
        }
    }
}
