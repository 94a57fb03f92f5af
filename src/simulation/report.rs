//! Aggregate statistics over a batch of simulated sessions.

use crate::game::Advice;
use crate::simulation::engine::{GameResult, Policy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Width of a final-value histogram bucket, in percentage points
pub const BUCKET_WIDTH: u32 = 50;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub generated_at: String,
    pub policy: Policy,
    pub seed: Option<u64>,
    pub num_games: usize,
    pub mean_final_value: f64,
    pub min_final_value: f64,
    pub max_final_value: f64,
    pub mean_draws: f64,
    /// Share of games whose last draw advised Stop, in [0, 1]
    pub stop_advice_rate: f64,
    /// Bucket lower bound -> number of games
    pub value_distribution: BTreeMap<u32, usize>,
}

impl SimulationReport {
    pub fn from_results(results: &[GameResult], policy: Policy, seed: Option<u64>) -> Self {
        let n = results.len();
        let mut distribution = BTreeMap::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut value_sum = 0.0;
        let mut draw_sum = 0u64;
        let mut stops = 0usize;

        for r in results {
            value_sum += r.final_value;
            draw_sum += r.draws as u64;
            min = min.min(r.final_value);
            max = max.max(r.final_value);
            if r.last_advice == Some(Advice::Stop) {
                stops += 1;
            }
            *distribution.entry(bucket_for(r.final_value)).or_insert(0) += 1;
        }

        let (mean_final_value, mean_draws, stop_advice_rate) = if n > 0 {
            (
                value_sum / n as f64,
                draw_sum as f64 / n as f64,
                stops as f64 / n as f64,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        SimulationReport {
            generated_at: chrono::Local::now().to_rfc3339(),
            policy,
            seed,
            num_games: n,
            mean_final_value,
            min_final_value: if n > 0 { min } else { 0.0 },
            max_final_value: if n > 0 { max } else { 0.0 },
            mean_draws,
            stop_advice_rate,
            value_distribution: distribution,
        }
    }

    /// Write the report as pretty JSON
    pub fn save_json(&self, path: &str) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Lower bound of the histogram bucket holding `value`
pub fn bucket_for(value: f64) -> u32 {
    let points = value.max(0.0).floor() as u32;
    points / BUCKET_WIDTH * BUCKET_WIDTH
}
