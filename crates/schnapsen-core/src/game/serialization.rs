//! Two-character wire form for cards (`"QS"`, `"TH"`, `"9C"`), shared by the
//! engine protocol and perspective snapshots.

use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardParseError {
    input: String,
}

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid card '{}'", self.input)
    }
}

impl std::error::Error for CardParseError {}

pub fn card_to_string(card: Card) -> String {
    format!("{}{}", card.rank.symbol(), card.suit.symbol())
}

pub fn card_from_string(value: &str) -> Result<Card, CardParseError> {
    let invalid = || CardParseError {
        input: value.to_string(),
    };
    let mut chars = value.trim().chars();
    let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(invalid());
    };
    let rank = Rank::from_symbol(rank).ok_or_else(invalid)?;
    let suit = Suit::from_symbol(suit).ok_or_else(invalid)?;
    Ok(Card::new(rank, suit))
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        card_from_string(s)
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&card_to_string(*self))
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        card_from_string(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::moves::Move;

    #[test]
    fn parses_documented_forms() {
        assert_eq!(
            card_from_string("QS").unwrap(),
            Card::new(Rank::Queen, Suit::Spades)
        );
        assert_eq!(
            "th".parse::<Card>().unwrap(),
            Card::new(Rank::Ten, Suit::Hearts)
        );
        assert_eq!(
            card_from_string("9C").unwrap(),
            Card::new(Rank::Nine, Suit::Clubs)
        );
    }

    #[test]
    fn rejects_malformed_cards() {
        assert!(card_from_string("").is_err());
        assert!(card_from_string("10H").is_err());
        assert!(card_from_string("2C").is_err());
        assert!(card_from_string("QX").is_err());
    }

    #[test]
    fn moves_use_tagged_json() {
        let json = serde_json::to_string(&Move::regular(Card::new(Rank::Ace, Suit::Diamonds)))
            .unwrap();
        assert_eq!(json, r#"{"type":"regular","card":"AD"}"#);

        let marriage: Move =
            serde_json::from_str(r#"{"type":"marriage","queen":"QS","king":"KS"}"#).unwrap();
        assert_eq!(marriage, Move::marriage(Suit::Spades));

        let exchange: Move =
            serde_json::from_str(r#"{"type":"trump_exchange","jack":"JH"}"#).unwrap();
        assert_eq!(exchange, Move::trump_exchange(Suit::Hearts));
    }

    #[test]
    fn invalid_card_in_move_is_a_decode_error() {
        let result: Result<Move, _> = serde_json::from_str(r#"{"type":"regular","card":"ZZ"}"#);
        assert!(result.is_err());
    }
}
