use crate::card::{Card, CardParseError};
use crate::game::Deck;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid deck format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },
    #[error("Invalid card at line {line}: {source}")]
    InvalidCard {
        line: usize,
        #[source]
        source: CardParseError,
    },
}

/// Parse a deck file into a card multiset
/// Format: "4 +10%" per line, supports comments with # or //
pub fn parse_deck_file(path: &str) -> Result<Deck, DeckError> {
    let content = std::fs::read_to_string(path)?;
    parse_deck(&content)
}

/// Parse deck text in the same format as `parse_deck_file`
pub fn parse_deck(content: &str) -> Result<Deck, DeckError> {
    let mut deck = Deck::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(DeckError::InvalidFormat {
                line: line_num + 1,
                reason: "Expected format: 'COUNT CARD'".to_string(),
            });
        }

        let count: usize = parts[0].parse().map_err(|_| DeckError::InvalidFormat {
            line: line_num + 1,
            reason: format!("'{}' is not a valid number", parts[0]),
        })?;

        let card: Card = parts[1].parse().map_err(|source| DeckError::InvalidCard {
            line: line_num + 1,
            source,
        })?;

        deck.add_cards(card, count);
    }

    if deck.is_empty() {
        return Err(DeckError::InvalidFormat {
            line: 0,
            reason: "deck has no cards".to_string(),
        });
    }

    Ok(deck)
}
