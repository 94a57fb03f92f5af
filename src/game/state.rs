use crate::card::Card;
use crate::game::deck::Deck;
use crate::game::effects::{self, Advice, BASELINE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Default draw cap for a session
pub const MAX_DRAWS: u32 = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Card {0} is not left in the deck")]
    InvalidCard(Card),
    #[error("Game over: all {max_draws} draws used")]
    GameOver { max_draws: u32 },
}

/// Session phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    InPlay,
    Finished,
}

/// Session setup: starting deck and draw cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub max_draws: u32,
    pub deck: Deck,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            max_draws: MAX_DRAWS,
            deck: Deck::standard(),
        }
    }
}

/// One entry of the draw log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub card: Card,
    pub value: f64,
    pub expected_remaining_impact: f64,
    pub advice: Advice,
}

/// Complete session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    remaining: Deck,
    value: f64,
    draw_count: u32,
    history: Vec<DrawRecord>,
    config: GameConfig,
}

impl GameState {
    /// Fresh session with the standard deck
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        GameState {
            remaining: config.deck.clone(),
            value: BASELINE,
            draw_count: 0,
            history: Vec::new(),
            config,
        }
    }

    /// Draw one instance of `card` and return the record appended to the log.
    ///
    /// On error nothing is changed: no card leaves the deck and no record is
    /// appended.
    pub fn draw_card(&mut self, card: Card) -> Result<DrawRecord, GameError> {
        if self.is_finished() {
            warn!(%card, draws = self.draw_count, "draw rejected, game over");
            return Err(GameError::GameOver {
                max_draws: self.config.max_draws,
            });
        }
        if !self.remaining.remove_one(card) {
            warn!(%card, "draw rejected, card not in deck");
            return Err(GameError::InvalidCard(card));
        }

        let value = effects::compute_effect(self.value, card);
        let impact = effects::expected_remaining_impact(value, &self.remaining);
        let advice = Advice::from_impact(impact);

        let record = DrawRecord {
            card,
            value,
            expected_remaining_impact: impact,
            advice,
        };
        self.value = value;
        self.draw_count += 1;
        self.history.push(record);

        debug!(
            %card,
            value,
            impact,
            %advice,
            draw = self.draw_count,
            "card drawn"
        );

        Ok(record)
    }

    /// Restore the starting snapshot for this session's config
    pub fn reset(&mut self) {
        self.remaining = self.config.deck.clone();
        self.value = BASELINE;
        self.draw_count = 0;
        self.history.clear();
        debug!("session reset");
    }

    /// Remaining count per card kind
    pub fn remaining_counts(&self) -> &BTreeMap<Card, usize> {
        self.remaining.counts()
    }

    /// Signed change `card` would make if drawn now.
    ///
    /// Uses the same marginal rule as the expected-impact heuristic. For a
    /// reducing multiplier other than `x0.5` whose drop exceeds 100 points
    /// this under-reports the loss: `x0.25` at 500 previews -125 while the
    /// draw lands on 125. `draw_card` is authoritative for the value.
    pub fn preview_effect(&self, card: Card) -> f64 {
        effects::compute_marginal(self.value, card)
    }

    /// Chance of `card` being drawn next, in [0, 1]
    pub fn draw_probability(&self, card: Card) -> f64 {
        self.remaining.probability(card)
    }

    pub fn phase(&self) -> Phase {
        if self.draw_count >= self.config.max_draws {
            Phase::Finished
        } else {
            Phase::InPlay
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase() == Phase::Finished
    }

    /// Advice of the last draw once the session is finished
    pub fn outcome(&self) -> Option<Advice> {
        if self.is_finished() {
            self.history.last().map(|r| r.advice)
        } else {
            None
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }

    pub fn draws_left(&self) -> u32 {
        self.config.max_draws.saturating_sub(self.draw_count)
    }

    pub fn history(&self) -> &[DrawRecord] {
        &self.history
    }

    pub fn last_record(&self) -> Option<&DrawRecord> {
        self.history.last()
    }

    pub fn remaining_deck(&self) -> &Deck {
        &self.remaining
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical starting state
pub fn reset() -> GameState {
    GameState::new()
}
