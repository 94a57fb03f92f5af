pub mod types;

pub use types::{Card, CardParseError, Multiplier};
