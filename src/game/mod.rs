pub mod deck;
pub mod effects;
pub mod state;

pub use deck::{Deck, STANDARD_DECK};
pub use effects::{compute_effect, compute_marginal, expected_remaining_impact, Advice, BASELINE};
pub use state::{reset, DrawRecord, GameConfig, GameError, GameState, Phase, MAX_DRAWS};
