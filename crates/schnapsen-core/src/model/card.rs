use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn points(self) -> u8 {
        self.rank.points()
    }

    pub fn is_trump(self, trump: Suit) -> bool {
        self.suit == trump
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Rank, Suit};

    #[test]
    fn ace_is_worth_eleven() {
        let card = Card::new(Rank::Ace, Suit::Spades);
        assert_eq!(card.points(), 11);
        assert!(card.is_trump(Suit::Spades));
        assert!(!card.is_trump(Suit::Hearts));
    }

    #[test]
    fn display_joins_rank_and_suit() {
        assert_eq!(Card::new(Rank::Ten, Suit::Clubs).to_string(), "TC");
        assert_eq!(Card::new(Rank::Queen, Suit::Hearts).to_string(), "QH");
    }
}
