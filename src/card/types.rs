use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardParseError {
    #[error("empty card")]
    Empty,
    #[error("unknown card kind in '{0}' (expected +P%, -P% or xM)")]
    UnknownKind(String),
    #[error("invalid magnitude in '{0}'")]
    InvalidMagnitude(String),
}

/// Multiplication factor stored in hundredths, so `x0.5` is 50 and `x3` is 300
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Multiplier(hundredths)
    }

    pub fn factor(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// True for multipliers that can only lower the value (M < 1)
    pub fn is_reducing(&self) -> bool {
        self.0 < 100
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}", whole, frac)
        }
    }
}

impl FromStr for Multiplier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(());
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(());
        }
        let whole: u32 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ())?
        };
        let frac: u32 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u32>().map_err(|_| ())? * 10,
            _ => frac.parse().map_err(|_| ())?,
        };
        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac))
            .map(Multiplier)
            .ok_or(())
    }
}

/// A card's effect on the running value.
///
/// Cards are parsed once from their symbolic form and compared by kind and
/// magnitude, so two `+10%` cards are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Card {
    /// `+P%`: adds P percentage points
    Additive(u32),
    /// `-P%`: subtracts P percentage points, floored at the baseline
    Subtractive(u32),
    /// `xM`: multiplies the value, floored at the baseline
    Multiplicative(Multiplier),
}

impl Card {
    pub const fn plus(points: u32) -> Self {
        Card::Additive(points)
    }

    pub const fn minus(points: u32) -> Self {
        Card::Subtractive(points)
    }

    pub const fn times(hundredths: u32) -> Self {
        Card::Multiplicative(Multiplier::from_hundredths(hundredths))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Additive(p) => write!(f, "+{}%", p),
            Card::Subtractive(p) => write!(f, "-{}%", p),
            Card::Multiplicative(m) => write!(f, "x{}", m),
        }
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let kind = chars.next().ok_or(CardParseError::Empty)?;
        let rest = chars.as_str();

        let points = |body: &str| -> Result<u32, CardParseError> {
            let digits = body.strip_suffix('%').unwrap_or(body);
            digits
                .parse::<u32>()
                .map_err(|_| CardParseError::InvalidMagnitude(trimmed.to_string()))
        };

        match kind {
            '+' => Ok(Card::Additive(points(rest)?)),
            '-' => Ok(Card::Subtractive(points(rest)?)),
            'x' | 'X' | '*' => rest
                .parse::<Multiplier>()
                .map(Card::Multiplicative)
                .map_err(|_| CardParseError::InvalidMagnitude(trimmed.to_string())),
            _ => Err(CardParseError::UnknownKind(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}
