/// Switches for the heuristic decision chain.
///
/// The defaults reproduce the classic rule order; each flag only changes
/// which candidate an existing step picks or whether an optional step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicParams {
    /// Play the trump-suit marriage ahead of any plain-suit one (default: true)
    pub prefer_trump_marriage: bool,

    /// Discard non-trump cards before trumps (default: true)
    pub discard_avoids_trump: bool,

    /// When following, take the trick with the highest card of the led suit
    /// if one outscores the led card (default: false)
    pub contest_led_suit: bool,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            prefer_trump_marriage: true,
            discard_avoids_trump: true,
            contest_led_suit: false,
        }
    }
}
