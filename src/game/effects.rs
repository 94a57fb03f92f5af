//! Value arithmetic shared by authoritative draws and previews.
//!
//! Both `compute_effect` and `compute_marginal` take the value *before* the
//! card is applied. Decreasing effects are floored at [`BASELINE`]; additive
//! effects have no ceiling.

use crate::card::Card;
use crate::game::deck::Deck;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Starting value and floor for decreasing effects
pub const BASELINE: f64 = 100.0;

/// Recommendation derived from the expected remaining impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Advice {
    Continue,
    Stop,
}

impl Advice {
    /// Continue on a non-negative impact; exactly 0 counts as Continue
    pub fn from_impact(impact: f64) -> Advice {
        if impact >= 0.0 {
            Advice::Continue
        } else {
            Advice::Stop
        }
    }

    /// Long form used in history lines
    pub fn description(&self) -> &'static str {
        match self {
            Advice::Continue => "Continue drawing cards",
            Advice::Stop => "Stop drawing cards",
        }
    }
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advice::Continue => write!(f, "Continue"),
            Advice::Stop => write!(f, "Stop"),
        }
    }
}

/// New value after applying `card` to `value`
pub fn compute_effect(value: f64, card: Card) -> f64 {
    match card {
        Card::Additive(p) => value + p as f64,
        Card::Subtractive(p) => BASELINE.max(value - p as f64),
        Card::Multiplicative(m) => BASELINE.max(value * m.factor()),
    }
}

/// Signed change `card` would make if drawn next from `value`.
///
/// Down-effects only count the part above the floor. For `M < 1` the clamp
/// is applied to the product itself when the drop stays within 100 points,
/// which agrees with `compute_effect` for `x0.5` at any value >= 100.
pub fn compute_marginal(value: f64, card: Card) -> f64 {
    match card {
        Card::Additive(p) => p as f64,
        Card::Subtractive(p) => -(p as f64).min(value - BASELINE),
        Card::Multiplicative(m) => {
            let factor = m.factor();
            let raw = value * factor;
            if m.is_reducing() {
                let mut drop = raw;
                if value - raw <= 100.0 {
                    drop = raw.min(value - BASELINE);
                }
                -drop
            } else {
                raw - value
            }
        }
    }
}

/// Mean marginal effect over every physical card left in `deck`, 0 when empty
pub fn expected_remaining_impact(value: f64, deck: &Deck) -> f64 {
    let total = deck.total();
    if total == 0 {
        return 0.0;
    }
    let sum: f64 = deck
        .counts()
        .iter()
        .map(|(card, count)| compute_marginal(value, *card) * *count as f64)
        .sum();
    sum / total as f64
}
