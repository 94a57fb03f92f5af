use crate::card::Card;
use crate::game::Deck;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded random number generator for reproducible simulations.
///
/// Only simulation drivers use this; the engine itself is driven entirely by
/// the card the caller picks.
#[derive(Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new GameRng with an optional seed
    /// If seed is None, generates a random seed
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            use rand::thread_rng;
            thread_rng().gen()
        });

        let rng = ChaCha8Rng::seed_from_u64(seed);
        GameRng { rng, seed }
    }

    /// Get the seed used for this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random integer in range [0, max)
    pub fn random_range(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..max)
    }

    /// Pick a card from `deck`, weighted by remaining count
    pub fn pick_card(&mut self, deck: &Deck) -> Option<Card> {
        let total = deck.total();
        if total == 0 {
            return None;
        }
        deck.nth_card(self.random_range(total))
    }
}
