use crate::card::Card;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical 21-card composition
pub const STANDARD_DECK: &[(Card, usize)] = &[
    (Card::plus(10), 4),
    (Card::plus(20), 3),
    (Card::plus(40), 2),
    (Card::plus(50), 2),
    (Card::times(200), 2),
    (Card::times(300), 1),
    (Card::minus(20), 2),
    (Card::minus(30), 2),
    (Card::minus(40), 1),
    (Card::minus(50), 1),
    (Card::times(50), 1),
];

/// Deck - multiset of fungible cards
///
/// Only ever shrinks during play. Kinds whose count reaches zero are dropped
/// from the map, so `counts()` lists exactly the cards still drawable. This
/// holds for deserialized decks too: zero entries are discarded on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDeck")]
pub struct Deck {
    cards: BTreeMap<Card, usize>,
}

#[derive(Deserialize)]
struct RawDeck {
    cards: BTreeMap<Card, usize>,
}

impl From<RawDeck> for Deck {
    fn from(raw: RawDeck) -> Self {
        Deck::from_counts(raw.cards)
    }
}

impl Deck {
    pub fn new() -> Self {
        Deck { cards: BTreeMap::new() }
    }

    pub fn standard() -> Self {
        Self::from_counts(STANDARD_DECK.iter().copied())
    }

    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (Card, usize)>,
    {
        let mut deck = Deck::new();
        for (card, count) in counts {
            deck.add_cards(card, count);
        }
        deck
    }

    pub fn add_cards(&mut self, card: Card, count: usize) {
        if count > 0 {
            *self.cards.entry(card).or_insert(0) += count;
        }
    }

    /// Remove one instance of `card`. Returns false if none is left.
    pub fn remove_one(&mut self, card: Card) -> bool {
        match self.cards.get_mut(&card) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.cards.remove(&card);
                }
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, card: Card) -> usize {
        self.cards.get(&card).copied().unwrap_or(0)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.count(card) > 0
    }

    pub fn total(&self) -> usize {
        self.cards.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remaining count per kind, in card order
    pub fn counts(&self) -> &BTreeMap<Card, usize> {
        &self.cards
    }

    /// Chance of `card` being the next uniformly random draw, in [0, 1]
    pub fn probability(&self, card: Card) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(card) as f64 / total as f64
        }
    }

    /// Every physical card, duplicates included
    pub fn iter_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards
            .iter()
            .flat_map(|(card, count)| std::iter::repeat(*card).take(*count))
    }

    /// Card at position `index` when the multiset is laid out in card order
    pub fn nth_card(&self, mut index: usize) -> Option<Card> {
        for (card, count) in &self.cards {
            if index < *count {
                return Some(*card);
            }
            index -= count;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck_composition() {
        let deck = Deck::standard();
        assert_eq!(deck.total(), 21, "Standard deck should have 21 cards");
        assert_eq!(deck.count(Card::plus(10)), 4);
        assert_eq!(deck.count(Card::plus(20)), 3);
        assert_eq!(deck.count(Card::times(300)), 1);
        assert_eq!(deck.count(Card::times(50)), 1);
        assert_eq!(deck.counts().len(), 11, "Should have 11 distinct kinds");
    }

    #[test]
    fn test_remove_one_is_fungible() {
        let mut deck = Deck::standard();
        assert!(deck.remove_one(Card::plus(10)));
        assert_eq!(deck.count(Card::plus(10)), 3);
        assert_eq!(deck.total(), 20);
    }

    #[test]
    fn test_remove_last_drops_kind() {
        let mut deck = Deck::standard();
        assert!(deck.remove_one(Card::times(300)));
        assert!(!deck.contains(Card::times(300)));
        assert!(!deck.counts().contains_key(&Card::times(300)));
        assert!(!deck.remove_one(Card::times(300)));
        assert_eq!(deck.total(), 20);
    }

    #[test]
    fn test_remove_unknown_card() {
        let mut deck = Deck::standard();
        assert!(!deck.remove_one(Card::plus(15)));
        assert_eq!(deck.total(), 21);
    }

    #[test]
    fn test_deserialize_drops_zero_counts() {
        let deck: Deck = serde_json::from_str(r#"{"cards":{"+10%":0,"x2":1}}"#).unwrap();
        assert_eq!(deck.total(), 1);
        assert_eq!(deck.counts().len(), 1);
        assert!(!deck.contains(Card::plus(10)));

        let mut deck = deck;
        assert!(!deck.remove_one(Card::plus(10)));
        assert_eq!(deck.total(), 1);
        assert!(!deck.is_empty());
    }

    #[test]
    fn test_deserialize_all_zero_is_empty() {
        let deck: Deck = serde_json::from_str(r#"{"cards":{"+10%":0}}"#).unwrap();
        assert!(deck.is_empty());
        assert_eq!(deck, Deck::new());
        assert_eq!(deck.nth_card(0), None);
    }

    #[test]
    fn test_serialized_deck_reloads_equal() {
        let mut deck = Deck::standard();
        deck.remove_one(Card::times(300));
        let json = serde_json::to_string(&deck).unwrap();
        assert_eq!(serde_json::from_str::<Deck>(&json).unwrap(), deck);
    }

    #[test]
    fn test_probability() {
        let deck = Deck::standard();
        assert!((deck.probability(Card::plus(10)) - 4.0 / 21.0).abs() < 1e-12);
        assert_eq!(deck.probability(Card::plus(15)), 0.0);
        assert_eq!(Deck::new().probability(Card::plus(10)), 0.0);
    }

    #[test]
    fn test_iter_cards_counts_duplicates() {
        let deck = Deck::standard();
        assert_eq!(deck.iter_cards().count(), 21);
        let tens = deck.iter_cards().filter(|c| *c == Card::plus(10)).count();
        assert_eq!(tens, 4);
    }

    #[test]
    fn test_nth_card_walks_multiset() {
        let deck = Deck::from_counts([(Card::plus(10), 2), (Card::minus(20), 1)]);
        assert_eq!(deck.nth_card(0), Some(Card::plus(10)));
        assert_eq!(deck.nth_card(1), Some(Card::plus(10)));
        assert_eq!(deck.nth_card(2), Some(Card::minus(20)));
        assert_eq!(deck.nth_card(3), None);
    }
}
