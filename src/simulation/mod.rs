pub mod deck;
pub mod engine;
pub mod report;

pub use deck::{parse_deck, parse_deck_file, DeckError};
pub use engine::{run_batch, run_game, GameResult, Policy};
pub use report::{ReportError, SimulationReport};
