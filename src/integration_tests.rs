//! End-to-end session tests for the draw engine
//! Covers full sessions, reset, determinism and the value floor

use crate::card::Card;
use crate::game::{
    compute_effect, expected_remaining_impact, reset, Advice, Deck, GameState, Phase, STANDARD_DECK,
};
use proptest::prelude::*;

fn remaining_total(state: &GameState) -> usize {
    state.remaining_counts().values().sum()
}

#[test]
fn test_plus_twenty_from_start() {
    let mut state = GameState::new();
    let record = state.draw_card(Card::plus(20)).unwrap();

    assert_eq!(record.value, 120.0);
    assert_eq!(state.remaining_counts()[&Card::plus(20)], 2);

    // 20 cards left at value 120:
    // +10 x4 = 40, +20 x2 = 40, +40 x2 = 80, +50 x2 = 100
    // x2 x2 = 240, x3 = 240
    // -20 x2 = -40, -30 x2 = -40 (capped at 20), -40 = -20, -50 = -20
    // x0.5 = -20 (capped at 20)
    let expected = (40.0 + 40.0 + 80.0 + 100.0 + 240.0 + 240.0 - 40.0 - 40.0 - 20.0 - 20.0 - 20.0) / 20.0;
    assert!((record.expected_remaining_impact - expected).abs() < 1e-9);
    assert_eq!(record.advice, Advice::Continue);
}

#[test]
fn test_half_multiplier_floors_at_100() {
    let mut state = GameState::new();
    state.draw_card(Card::plus(10)).unwrap();
    assert_eq!(state.value(), 110.0);
    let record = state.draw_card(Card::times(50)).unwrap();
    assert_eq!(record.value, 100.0);
}

#[test]
fn test_minus_fifty_floors_at_100() {
    // 105 is not reachable with the standard deck, so build it from a +5% card
    let deck = Deck::from_counts([(Card::plus(5), 1), (Card::minus(50), 1), (Card::plus(10), 1)]);
    let mut state = GameState::with_config(crate::game::GameConfig { max_draws: 7, deck });
    state.draw_card(Card::plus(5)).unwrap();
    assert_eq!(state.value(), 105.0);
    let record = state.draw_card(Card::minus(50)).unwrap();
    assert_eq!(record.value, 100.0);
}

#[test]
fn test_eighth_draw_rejected() {
    let mut state = GameState::new();
    let sequence = [
        Card::plus(50),
        Card::times(200),
        Card::minus(30),
        Card::times(50),
        Card::plus(40),
        Card::minus(50),
        Card::times(300),
    ];
    for card in sequence {
        state.draw_card(card).unwrap();
    }
    assert_eq!(state.phase(), Phase::Finished);
    assert_eq!(state.draw_count(), 7);

    let before = state.clone();
    assert!(state.draw_card(Card::plus(10)).is_err());
    assert_eq!(state, before);
    assert_eq!(state.history().len(), 7);
}

#[test]
fn test_known_sequence_values() {
    let mut state = GameState::new();
    let expected = [
        (Card::plus(50), 150.0),
        (Card::times(200), 300.0),
        (Card::minus(30), 270.0),
        (Card::times(50), 135.0),
        (Card::plus(40), 175.0),
        (Card::minus(50), 125.0),
        (Card::times(300), 375.0),
    ];
    for (card, value) in expected {
        let record = state.draw_card(card).unwrap();
        assert!((record.value - value).abs() < 1e-9, "{} -> {}", card, record.value);
    }
    assert_eq!(state.outcome(), state.last_record().map(|r| r.advice));
}

#[test]
fn test_reset_after_finished_game() {
    let mut state = GameState::new();
    for _ in 0..4 {
        state.draw_card(Card::plus(10)).unwrap();
    }
    state.draw_card(Card::times(300)).unwrap();
    state.reset();

    assert_eq!(state, reset());
    assert_eq!(state.value(), 100.0);
    assert_eq!(state.remaining_deck(), &Deck::standard());
    assert_eq!(state.phase(), Phase::InPlay);
}

#[test]
fn test_stop_advice_when_value_is_high() {
    // At a high value the x0.5 and minus cards outweigh the rest
    let deck = Deck::from_counts([(Card::plus(10), 1), (Card::times(50), 2)]);
    let impact = expected_remaining_impact(400.0, &deck);
    assert!(impact < 0.0);
    assert_eq!(Advice::from_impact(impact), Advice::Stop);
}

fn standard_card() -> impl Strategy<Value = Card> {
    prop::sample::select(STANDARD_DECK.iter().map(|(card, _)| *card).collect::<Vec<_>>())
}

proptest! {
    /// Property: down-effects never go below 100, up-effects never lower the value
    #[test]
    fn prop_value_floor(value in 100.0f64..2000.0, card in standard_card()) {
        let new_value = compute_effect(value, card);
        prop_assert!(new_value >= 100.0);
        match card {
            Card::Additive(_) => prop_assert!(new_value >= value),
            Card::Multiplicative(m) if !m.is_reducing() => prop_assert!(new_value >= value),
            _ => {}
        }
    }

    /// Property: remaining cards plus draws always equals 21
    #[test]
    fn prop_deck_size_invariant(picks in prop::collection::vec(0usize..21, 0..12)) {
        let mut state = GameState::new();
        for pick in picks {
            let total = state.remaining_deck().total();
            if let Some(card) = state.remaining_deck().nth_card(pick % total.max(1)) {
                let _ = state.draw_card(card);
            }
            prop_assert_eq!(remaining_total(&state) + state.draw_count() as usize, 21);
            prop_assert!(state.draw_count() <= 7);
        }
    }

    /// Property: identical states produce identical records
    #[test]
    fn prop_draw_is_deterministic(picks in prop::collection::vec(0usize..21, 1..8)) {
        let mut a = GameState::new();
        let mut b = GameState::new();
        for pick in picks {
            let total = a.remaining_deck().total();
            let card = a.remaining_deck().nth_card(pick % total).unwrap();
            let ra = a.draw_card(card);
            let rb = b.draw_card(card);
            prop_assert_eq!(ra, rb);
        }
        prop_assert_eq!(a, b);
    }
}
