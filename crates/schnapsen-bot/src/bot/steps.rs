//! Conditions and actions of the heuristic decision chain.
//!
//! Actions return `None` when their candidate list is empty; the caller then
//! falls back to [`fallback_move`]. Point ties keep engine enumeration order.

use schnapsen_core::game::bot::BotError;
use schnapsen_core::game::perspective::{PlayerPerspective, Turn};
use schnapsen_core::model::card::Card;
use schnapsen_core::model::moves::Move;
use schnapsen_core::model::phase::GamePhase;
use schnapsen_core::model::suit::Suit;
use std::cmp::Reverse;

/// Step of the chain that produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Marriage,
    HighestOfLedSuit,
    LowestTrump,
    LowestDiscard,
    Fallback,
}

impl Rule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Rule::Marriage => "marriage",
            Rule::HighestOfLedSuit => "highest_of_led_suit",
            Rule::LowestTrump => "lowest_trump",
            Rule::LowestDiscard => "lowest_discard",
            Rule::Fallback => "fallback",
        }
    }
}

fn regular_plays(moves: &[Move]) -> impl Iterator<Item = (Move, Card)> + '_ {
    moves.iter().filter_map(|mv| match mv {
        Move::Regular(regular) => Some((*mv, regular.card)),
        _ => None,
    })
}

fn lowest(candidates: impl Iterator<Item = (Move, Card)>) -> Option<Move> {
    candidates
        .min_by_key(|(_, card)| card.points())
        .map(|(mv, _)| mv)
}

fn highest(candidates: impl Iterator<Item = (Move, Card)>) -> Option<Move> {
    candidates
        .min_by_key(|(_, card)| Reverse(card.points()))
        .map(|(mv, _)| mv)
}

/// Trump jack exchange is legal, the talon is open and we lead.
pub fn trump_exchange_available(perspective: &dyn PlayerPerspective, moves: &[Move], turn: Turn) -> bool {
    turn.is_leading()
        && perspective.phase() == GamePhase::One
        && moves.iter().any(Move::is_trump_exchange)
}

pub fn request_trump_exchange(trump: Suit) -> Move {
    Move::trump_exchange(trump)
}

pub fn marriage_available(moves: &[Move]) -> bool {
    moves.iter().any(Move::is_marriage)
}

pub fn play_marriage(moves: &[Move], trump: Suit, prefer_trump: bool) -> Option<Move> {
    if prefer_trump
        && let Some(mv) = moves
            .iter()
            .copied()
            .find(|mv| mv.as_marriage().is_some_and(|m| m.suit() == trump))
    {
        return Some(mv);
    }
    moves.iter().copied().find(Move::is_marriage)
}

/// Returns the led card when a legal card of its suit outscores it.
///
/// Leading has no led card, so this never fires there.
pub fn beatable_led_card(moves: &[Move], turn: Turn) -> Option<Card> {
    let led = turn.led_card()?;
    regular_plays(moves)
        .any(|(_, card)| card.suit == led.suit && card.points() > led.points())
        .then_some(led)
}

pub fn play_highest_of_suit(moves: &[Move], suit: Suit) -> Option<Move> {
    highest(regular_plays(moves).filter(|(_, card)| card.suit == suit))
}

pub fn opponent_played_face_card(perspective: &dyn PlayerPerspective) -> bool {
    perspective
        .opponent_last_card()
        .is_some_and(|card| card.rank.is_face())
}

pub fn holds_trump(perspective: &dyn PlayerPerspective) -> bool {
    perspective.hand().has_suit(perspective.trump_suit())
}

pub fn play_lowest_trump(moves: &[Move], trump: Suit) -> Option<Move> {
    lowest(regular_plays(moves).filter(|(_, card)| card.suit == trump))
}

pub fn play_lowest_discard(moves: &[Move], trump: Suit, avoid_trump: bool) -> Option<Move> {
    if avoid_trump {
        let plain = lowest(regular_plays(moves).filter(|(_, card)| card.suit != trump));
        if plain.is_some() {
            return plain;
        }
    }
    lowest(regular_plays(moves))
}

/// First legal regular card play; marriages and exchanges never qualify.
pub fn fallback_move(moves: &[Move]) -> Result<Move, BotError> {
    moves
        .iter()
        .copied()
        .find(Move::is_regular_move)
        .ok_or(BotError::NoCandidateMove)
}
