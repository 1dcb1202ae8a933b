//! Monte Carlo aggregation over independent runs.
//!
//! Run `i` is seeded with `base_seed + i` and owns its rng, so runs never
//! correlate and can execute on any thread. Results are collected in run
//! order, which keeps parallel and sequential batches identical. Failed runs
//! are reported and excluded from every mean.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{ConfigError, SimulationConfig};
use crate::matching::{DoubleAuctionMatcher, MarketClearing};
use crate::schedule::Crowd;
use crate::simulator::{RunError, SimulationResult, SingleRunSimulator};
use crate::types::mean;

/// A run that did not complete. kept out of the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedRun {
    pub run_index: usize,
    pub seed: u64,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    // mean close of days 1..=n_days across completed runs
    pub mean_path: Vec<f64>,
    // present only in insider mode
    pub mean_loss: Option<f64>,
    pub runs: Vec<SimulationResult>,
    pub failed: Vec<FailedRun>,
}

impl AggregateResult {
    pub fn completed_runs(&self) -> usize {
        self.runs.len()
    }

    pub fn failed_runs(&self) -> usize {
        self.failed.len()
    }

    /// Every completed run's full path, seed price included.
    pub fn paths(&self) -> Vec<&[f64]> {
        self.runs.iter().map(|r| r.path.as_slice()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("All {0} runs failed")]
    AllRunsFailed(usize),
}

pub fn run_seed(base_seed: u64, run_index: usize) -> u64 {
    base_seed.wrapping_add(run_index as u64)
}

#[derive(Debug)]
pub struct MonteCarloAggregator<'a, M: MarketClearing = DoubleAuctionMatcher> {
    config: &'a SimulationConfig,
    crowd: &'a Crowd,
    matcher: M,
}

impl<'a> MonteCarloAggregator<'a, DoubleAuctionMatcher> {
    pub fn new(config: &'a SimulationConfig, crowd: &'a Crowd) -> Self {
        Self::with_matcher(config, crowd, DoubleAuctionMatcher)
    }
}

impl<'a, M: MarketClearing> MonteCarloAggregator<'a, M> {
    pub fn with_matcher(config: &'a SimulationConfig, crowd: &'a Crowd, matcher: M) -> Self {
        Self { config, crowd, matcher }
    }

    pub fn run(&self) -> Result<AggregateResult, AggregateError> {
        self.config.validate()?;
        let n = self.config.n_simulations;

        info!(
            runs = n,
            days = self.config.n_days,
            base_seed = self.config.base_seed,
            insider = self.config.insider.is_some(),
            "starting monte carlo batch"
        );

        let run_one = |run_index: usize| {
            let seed = run_seed(self.config.base_seed, run_index);
            let result = SingleRunSimulator::new(self.config, self.crowd, &self.matcher, seed).and_then(|sim| sim.run());
            RunOutcome {
                run_index,
                seed,
                result,
            }
        };

        let outcomes: Vec<RunOutcome> = if self.config.force_sequential {
            (0..n).map(run_one).collect()
        } else {
            (0..n).into_par_iter().map(run_one).collect()
        };

        let result = AggregateResult::from_outcomes(outcomes)?;

        info!(
            completed = result.completed_runs(),
            failed = result.failed_runs(),
            final_mean = result.mean_path.last().copied().unwrap_or(self.config.seed_price),
            mean_loss = result.mean_loss.unwrap_or(f64::NAN),
            "monte carlo batch finished"
        );

        Ok(result)
    }
}

/// One finished run, successful or not.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_index: usize,
    pub seed: u64,
    pub result: Result<SimulationResult, RunError>,
}

impl AggregateResult {
    /// Reduce finished runs. failures are listed and left out of both means.
    pub fn from_outcomes(outcomes: Vec<RunOutcome>) -> Result<Self, AggregateError> {
        let total = outcomes.len();
        let mut runs = Vec::with_capacity(total);
        let mut failed = Vec::new();

        for RunOutcome { run_index, seed, result } in outcomes {
            match result {
                Ok(run) => runs.push(run),
                Err(e) => {
                    warn!(run_index, seed, error = %e, "run failed, excluded from aggregate");
                    failed.push(FailedRun {
                        run_index,
                        seed,
                        error: e.to_string(),
                    });
                }
            }
        }

        if runs.is_empty() {
            return Err(AggregateError::AllRunsFailed(total));
        }

        let paths: Vec<&[f64]> = runs.iter().map(|r| r.path.as_slice()).collect();
        let mean_path = mean_path(&paths);
        let losses: Vec<f64> = runs.iter().filter_map(|r| r.societal_loss()).collect();
        let mean_loss = mean(&losses);

        Ok(Self {
            mean_path,
            mean_loss,
            runs,
            failed,
        })
    }
}

/// Elementwise mean of full paths, skipping index 0 (the seed price).
/// paths of unequal length are averaged over the shortest.
pub fn mean_path(paths: &[&[f64]]) -> Vec<f64> {
    let Some(len) = paths.iter().map(|p| p.len()).min() else {
        return Vec::new();
    };
    let count = paths.len() as f64;

    (1..len)
        .map(|day| paths.iter().map(|p| p[day]).sum::<f64>() / count)
        .collect()
}
