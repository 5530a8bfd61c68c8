use crate::bot::HeuristicParams;
use crate::bot::steps::{self, Rule};
use schnapsen_core::game::bot::{Bot, BotError, ensure_legal};
use schnapsen_core::game::perspective::{PlayerPerspective, Turn};
use schnapsen_core::model::moves::Move;
use tracing::{Level, event};

/// Rule-based bot: a fixed, ordered chain of conditions and actions.
///
/// Memoryless across turns; the same perspective and turn always give the
/// same move.
pub struct HeuristicBot {
    name: String,
    params: HeuristicParams,
}

impl HeuristicBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_params(name, HeuristicParams::default())
    }

    pub fn with_params(name: impl Into<String>, params: HeuristicParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn params(&self) -> HeuristicParams {
        self.params
    }

    /// Runs the decision chain and reports which step fired.
    pub fn decide(
        &self,
        perspective: &dyn PlayerPerspective,
        turn: Turn,
    ) -> Result<(Move, Rule), BotError> {
        let moves = perspective.valid_moves();
        let trump = perspective.trump_suit();

        let (rule, picked) = match turn {
            Turn::Following(_) => {
                if steps::trump_exchange_available(perspective, &moves, turn) {
                    let exchange = steps::request_trump_exchange(trump);
                    event!(
                        target: "schnapsen_bot::play",
                        Level::DEBUG,
                        bot = %self.name,
                        exchange = %exchange,
                        "trump exchange requested while following; continuing"
                    );
                }

                if steps::marriage_available(&moves) {
                    (
                        Rule::Marriage,
                        steps::play_marriage(&moves, trump, self.params.prefer_trump_marriage),
                    )
                } else if self.params.contest_led_suit
                    && let Some(led) = steps::beatable_led_card(&moves, turn)
                {
                    (
                        Rule::HighestOfLedSuit,
                        steps::play_highest_of_suit(&moves, led.suit),
                    )
                } else {
                    (
                        Rule::LowestDiscard,
                        steps::play_lowest_discard(&moves, trump, self.params.discard_avoids_trump),
                    )
                }
            }
            Turn::Leading => {
                if let Some(led) = steps::beatable_led_card(&moves, turn) {
                    (
                        Rule::HighestOfLedSuit,
                        steps::play_highest_of_suit(&moves, led.suit),
                    )
                } else if steps::opponent_played_face_card(perspective) {
                    (
                        Rule::LowestDiscard,
                        steps::play_lowest_discard(&moves, trump, self.params.discard_avoids_trump),
                    )
                } else if steps::holds_trump(perspective) {
                    (Rule::LowestTrump, steps::play_lowest_trump(&moves, trump))
                } else {
                    (
                        Rule::LowestDiscard,
                        steps::play_lowest_discard(&moves, trump, self.params.discard_avoids_trump),
                    )
                }
            }
        };

        let (chosen, rule) = match picked {
            Some(mv) => (mv, rule),
            None => (steps::fallback_move(&moves)?, Rule::Fallback),
        };
        let chosen = ensure_legal(perspective, chosen)?;
        Ok((chosen, rule))
    }
}

impl Bot for HeuristicBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(
        &mut self,
        perspective: &dyn PlayerPerspective,
        turn: Turn,
    ) -> Result<Move, BotError> {
        match self.decide(perspective, turn) {
            Ok((chosen, rule)) => {
                log_play_decision(&self.name, perspective, turn, chosen, rule);
                Ok(chosen)
            }
            Err(err) => {
                event!(
                    target: "schnapsen_bot::play",
                    Level::WARN,
                    bot = %self.name,
                    legal_count = perspective.valid_moves().len(),
                    error = %err,
                    "heuristic bot could not produce a move"
                );
                Err(err)
            }
        }
    }
}

fn log_play_decision(
    name: &str,
    perspective: &dyn PlayerPerspective,
    turn: Turn,
    chosen: Move,
    rule: Rule,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let moves = perspective.valid_moves();
    let legal_preview = if moves.len() <= 6 {
        moves
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", moves.len())
    };
    let led = turn
        .led_card()
        .map(|card| card.to_string())
        .unwrap_or_else(|| "-".to_string());

    event!(
        target: "schnapsen_bot::play",
        Level::DEBUG,
        bot = %name,
        leading = turn.is_leading(),
        led = %led,
        trump = %perspective.trump_suit(),
        phase = %perspective.phase(),
        legal_count = moves.len(),
        legal_moves = %legal_preview,
        chosen = %chosen,
        reason = rule.as_str(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use schnapsen_core::game::perspective::PerspectiveSnapshot;
    use schnapsen_core::model::card::Card;
    use schnapsen_core::model::hand::Hand;
    use schnapsen_core::model::phase::GamePhase;
    use schnapsen_core::model::rank::Rank;
    use schnapsen_core::model::suit::Suit;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn open(cards: &[Card], trump: Suit, extra: &[Move]) -> PerspectiveSnapshot {
        PerspectiveSnapshot::open(Hand::with_cards(cards.to_vec()), trump, GamePhase::One, extra)
    }

    #[test]
    fn follower_plays_plain_marriage_without_trump_marriage() {
        let snapshot = open(
            &[
                card(Rank::Queen, Suit::Spades),
                card(Rank::King, Suit::Spades),
                card(Rank::Ten, Suit::Hearts),
            ],
            Suit::Hearts,
            &[Move::marriage(Suit::Spades)],
        );
        let mut bot = HeuristicBot::new("heuristic");
        let led = Turn::Following(card(Rank::Nine, Suit::Clubs));
        assert_eq!(bot.get_move(&snapshot, led), Ok(Move::marriage(Suit::Spades)));
    }

    #[test]
    fn follower_prefers_trump_marriage() {
        let snapshot = open(
            &[
                card(Rank::Queen, Suit::Spades),
                card(Rank::King, Suit::Spades),
                card(Rank::Queen, Suit::Hearts),
                card(Rank::King, Suit::Hearts),
            ],
            Suit::Hearts,
            &[Move::marriage(Suit::Spades), Move::marriage(Suit::Hearts)],
        );
        let bot = HeuristicBot::new("heuristic");
        let led = Turn::Following(card(Rank::Nine, Suit::Clubs));
        assert_eq!(
            bot.decide(&snapshot, led),
            Ok((Move::marriage(Suit::Hearts), Rule::Marriage))
        );
    }

    #[test]
    fn follower_discards_lowest_non_trump() {
        let snapshot = open(
            &[
                card(Rank::Jack, Suit::Hearts),
                card(Rank::King, Suit::Clubs),
                card(Rank::Queen, Suit::Diamonds),
                card(Rank::Ace, Suit::Spades),
            ],
            Suit::Hearts,
            &[],
        );
        let bot = HeuristicBot::new("heuristic");
        let led = Turn::Following(card(Rank::Ten, Suit::Spades));
        assert_eq!(
            bot.decide(&snapshot, led),
            Ok((
                Move::regular(card(Rank::Queen, Suit::Diamonds)),
                Rule::LowestDiscard
            ))
        );
    }

    #[test]
    fn follower_contests_led_suit_when_enabled() {
        let cards = [card(Rank::Ace, Suit::Spades), card(Rank::Nine, Suit::Clubs)];
        let snapshot = open(&cards, Suit::Hearts, &[]);
        let led = Turn::Following(card(Rank::Ten, Suit::Spades));

        let classic = HeuristicBot::new("classic");
        assert_eq!(
            classic.decide(&snapshot, led).map(|(mv, _)| mv),
            Ok(Move::regular(card(Rank::Nine, Suit::Clubs)))
        );

        let params = HeuristicParams {
            contest_led_suit: true,
            ..HeuristicParams::default()
        };
        let contesting = HeuristicBot::with_params("contest", params);
        assert_eq!(
            contesting.decide(&snapshot, led),
            Ok((
                Move::regular(card(Rank::Ace, Suit::Spades)),
                Rule::HighestOfLedSuit
            ))
        );
    }

    #[test]
    fn leader_with_only_trumps_plays_lowest_trump() {
        let snapshot = PerspectiveSnapshot::open(
            Hand::with_cards(vec![card(Rank::Jack, Suit::Clubs), card(Rank::Ten, Suit::Clubs)]),
            Suit::Clubs,
            GamePhase::Two,
            &[],
        );
        let bot = HeuristicBot::new("heuristic");
        assert_eq!(
            bot.decide(&snapshot, Turn::Leading),
            Ok((Move::regular(card(Rank::Jack, Suit::Clubs)), Rule::LowestTrump))
        );
    }

    #[test]
    fn leader_with_trump_in_hand_leads_lowest_trump() {
        let snapshot = open(
            &[
                card(Rank::Ace, Suit::Hearts),
                card(Rank::Nine, Suit::Spades),
                card(Rank::Queen, Suit::Hearts),
            ],
            Suit::Hearts,
            &[],
        );
        let bot = HeuristicBot::new("heuristic");
        assert_eq!(
            bot.decide(&snapshot, Turn::Leading),
            Ok((Move::regular(card(Rank::Queen, Suit::Hearts)), Rule::LowestTrump))
        );
    }

    #[test]
    fn leader_after_face_card_discards_lowest_non_trump() {
        let snapshot = open(
            &[
                card(Rank::Ace, Suit::Hearts),
                card(Rank::Ten, Suit::Spades),
                card(Rank::Jack, Suit::Hearts),
            ],
            Suit::Hearts,
            &[],
        )
        .with_opponent_last_card(Some(card(Rank::King, Suit::Diamonds)));
        let bot = HeuristicBot::new("heuristic");
        assert_eq!(
            bot.decide(&snapshot, Turn::Leading),
            Ok((Move::regular(card(Rank::Ten, Suit::Spades)), Rule::LowestDiscard))
        );
    }

    #[test]
    fn leader_without_trump_discards_lowest() {
        let snapshot = open(
            &[card(Rank::Ace, Suit::Clubs), card(Rank::King, Suit::Spades)],
            Suit::Diamonds,
            &[],
        )
        .with_opponent_last_card(Some(card(Rank::Ace, Suit::Diamonds)));
        let bot = HeuristicBot::new("heuristic");
        assert_eq!(
            bot.decide(&snapshot, Turn::Leading),
            Ok((Move::regular(card(Rank::King, Suit::Spades)), Rule::LowestDiscard))
        );
    }

    #[test]
    fn leader_in_phase_one_does_not_play_the_exchange() {
        let snapshot = open(
            &[card(Rank::Jack, Suit::Hearts), card(Rank::Nine, Suit::Clubs)],
            Suit::Hearts,
            &[Move::trump_exchange(Suit::Hearts)],
        );
        let mut bot = HeuristicBot::new("heuristic");
        let chosen = bot.get_move(&snapshot, Turn::Leading).unwrap();
        assert!(chosen.is_regular_move());
        assert_eq!(chosen, Move::regular(card(Rank::Jack, Suit::Hearts)));
    }

    #[test]
    fn single_legal_move_is_always_returned() {
        let only = card(Rank::Six, Suit::Diamonds);
        let snapshot = PerspectiveSnapshot::new(
            Hand::with_cards(vec![only, card(Rank::Ace, Suit::Spades)]),
            Suit::Spades,
            GamePhase::Two,
            vec![Move::regular(only)],
        );
        let mut bot = HeuristicBot::new("heuristic");
        assert_eq!(bot.get_move(&snapshot, Turn::Leading), Ok(Move::regular(only)));
        let led = Turn::Following(card(Rank::Ten, Suit::Diamonds));
        assert_eq!(bot.get_move(&snapshot, led), Ok(Move::regular(only)));
    }

    #[test]
    fn trump_held_but_not_legal_falls_back_to_first_play() {
        let plain = card(Rank::Nine, Suit::Clubs);
        let snapshot = PerspectiveSnapshot::new(
            Hand::with_cards(vec![plain, card(Rank::Ace, Suit::Hearts)]),
            Suit::Hearts,
            GamePhase::Two,
            vec![Move::regular(plain)],
        );
        let bot = HeuristicBot::new("heuristic");
        assert_eq!(
            bot.decide(&snapshot, Turn::Leading),
            Ok((Move::regular(plain), Rule::Fallback))
        );
    }

    #[test]
    fn fallback_skips_marriage_listed_before_card_play() {
        let plain = card(Rank::Nine, Suit::Clubs);
        let snapshot = PerspectiveSnapshot::new(
            Hand::with_cards(vec![
                card(Rank::Queen, Suit::Spades),
                card(Rank::King, Suit::Spades),
                plain,
                card(Rank::Ace, Suit::Hearts),
            ]),
            Suit::Hearts,
            GamePhase::Two,
            vec![Move::marriage(Suit::Spades), Move::regular(plain)],
        );
        let bot = HeuristicBot::new("heuristic");
        assert_eq!(
            bot.decide(&snapshot, Turn::Leading),
            Ok((Move::regular(plain), Rule::Fallback))
        );
    }

    #[test]
    fn only_marriage_legal_when_leading_has_no_candidate() {
        let snapshot = PerspectiveSnapshot::new(
            Hand::with_cards(vec![
                card(Rank::Queen, Suit::Spades),
                card(Rank::King, Suit::Spades),
            ]),
            Suit::Hearts,
            GamePhase::Two,
            vec![Move::marriage(Suit::Spades)],
        );
        let bot = HeuristicBot::new("heuristic");
        assert_eq!(
            bot.decide(&snapshot, Turn::Leading),
            Err(BotError::NoCandidateMove)
        );
    }

    #[test]
    fn no_legal_moves_is_an_error() {
        let snapshot = PerspectiveSnapshot::new(Hand::new(), Suit::Hearts, GamePhase::Two, Vec::new());
        let mut bot = HeuristicBot::new("heuristic");
        assert_eq!(
            bot.get_move(&snapshot, Turn::Leading),
            Err(BotError::NoCandidateMove)
        );
        let led = Turn::Following(card(Rank::Ace, Suit::Clubs));
        assert_eq!(bot.get_move(&snapshot, led), Err(BotError::NoCandidateMove));
    }

    #[test]
    fn repeated_calls_return_the_same_move() {
        let snapshot = open(
            &[
                card(Rank::Ten, Suit::Diamonds),
                card(Rank::Nine, Suit::Spades),
                card(Rank::Jack, Suit::Hearts),
            ],
            Suit::Hearts,
            &[],
        );
        let mut bot = HeuristicBot::new("heuristic");
        let led = Turn::Following(card(Rank::Ace, Suit::Diamonds));
        let first = bot.get_move(&snapshot, led);
        let second = bot.get_move(&snapshot, led);
        assert_eq!(first, second);
        assert_eq!(first, Ok(Move::regular(card(Rank::Nine, Suit::Spades))));
    }
}
