use crate::game::{Advice, DrawRecord, GameConfig, GameState};
use crate::rng::GameRng;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// When a simulated player stops drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Stop as soon as a draw advises Stop
    FollowAdvice,
    /// Always draw up to the cap
    DrawAll,
}

/// Result of a single simulated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub seed: u64,
    pub final_value: f64,
    pub draws: u32,
    /// Advice attached to the last draw (None if nothing was drawn)
    pub last_advice: Option<Advice>,
    pub history: Vec<DrawRecord>,
}

/// Play one session, picking each card at random weighted by remaining count.
///
/// Each draw is traced at debug level; run with `--verbose` or `RUST_LOG` to
/// see them.
pub fn run_game(config: &GameConfig, seed: u64, policy: Policy) -> GameResult {
    let mut rng = GameRng::new(Some(seed));
    let mut state = GameState::with_config(config.clone());

    while !state.is_finished() {
        if policy == Policy::FollowAdvice
            && state.last_record().map(|r| r.advice) == Some(Advice::Stop)
        {
            break;
        }

        let Some(card) = rng.pick_card(state.remaining_deck()) else {
            break;
        };

        match state.draw_card(card) {
            Ok(record) => debug!(
                seed,
                draw = state.draw_count(),
                card = %record.card,
                value = record.value,
                impact = record.expected_remaining_impact,
                advice = %record.advice,
                "simulated draw"
            ),
            Err(e) => {
                warn!(error = %e, "simulated draw rejected");
                break;
            }
        }
    }

    GameResult {
        seed,
        final_value: state.value(),
        draws: state.draw_count(),
        last_advice: state.last_record().map(|r| r.advice),
        history: state.history().to_vec(),
    }
}

/// Play `num_games` sessions.
///
/// With a seed, games run sequentially with seeds `seed + i` so results are
/// reproducible. Without one, games run in parallel from a random base seed.
pub fn run_batch(
    config: &GameConfig,
    num_games: usize,
    seed: Option<u64>,
    policy: Policy,
    progress: Option<&ProgressBar>,
) -> Vec<GameResult> {
    info!(num_games, ?seed, ?policy, "starting batch");

    let play = |game_seed: u64| {
        let result = run_game(config, game_seed, policy);
        if let Some(pb) = progress {
            pb.inc(1);
        }
        result
    };

    let results: Vec<GameResult> = match seed {
        Some(base_seed) => (0..num_games)
            .map(|i| play(base_seed.wrapping_add(i as u64)))
            .collect(),
        None => {
            let base_seed = GameRng::new(None).seed();
            (0..num_games)
                .into_par_iter()
                .map(|i| play(base_seed.wrapping_add(i as u64)))
                .collect()
        }
    };

    info!(games = results.len(), "batch complete");
    results
}
