// 12.0 report.rs: batch summaries for plotting and for the json export.
// picks illustrative paths by how far the final price moved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::monte_carlo::{AggregateResult, FailedRun};

/// Indices of three example runs: highest final price, lowest final price,
/// and the final price closest to the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllustrativePaths {
    pub bullish: usize,
    pub bearish: usize,
    pub stable: usize,
}

impl IllustrativePaths {
    pub fn select(paths: &[&[f64]], seed_price: f64) -> Option<Self> {
        let finals: Vec<(usize, f64)> = paths
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.last().map(|f| (i, *f)))
            .collect();

        let bullish = finals.iter().max_by(|a, b| a.1.total_cmp(&b.1))?.0;
        let bearish = finals.iter().min_by(|a, b| a.1.total_cmp(&b.1))?.0;
        let stable = finals
            .iter()
            .min_by(|a, b| (a.1 - seed_price).abs().total_cmp(&(b.1 - seed_price).abs()))?
            .0;

        Some(Self {
            bullish,
            bearish,
            stable,
        })
    }
}

/// Distribution of final prices across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStats {
    pub runs: usize,
    pub mean_final: f64,
    pub min_final: f64,
    pub max_final: f64,
    pub std_final: f64,
}

impl PathStats {
    pub fn from_paths(paths: &[&[f64]]) -> Option<Self> {
        let finals: Vec<f64> = paths.iter().filter_map(|p| p.last().copied()).collect();
        let mean_final = crate::types::mean(&finals)?;
        let variance = finals.iter().map(|f| (f - mean_final).powi(2)).sum::<f64>() / finals.len() as f64;

        Some(Self {
            runs: finals.len(),
            mean_final,
            min_final: finals.iter().copied().fold(f64::INFINITY, f64::min),
            max_final: finals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std_final: variance.sqrt(),
        })
    }
}

/// Everything a caller needs to plot one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub label: String,
    pub generated_at: DateTime<Utc>,
    pub config: SimulationConfig,
    pub mean_path: Vec<f64>,
    pub mean_loss: Option<f64>,
    pub stats: Option<PathStats>,
    pub illustrative: Option<IllustrativePaths>,
    pub illustrative_paths: Vec<Vec<f64>>,
    pub failed: Vec<FailedRun>,
}

impl BatchReport {
    pub fn new(label: impl Into<String>, config: &SimulationConfig, result: &AggregateResult) -> Self {
        let paths = result.paths();
        let illustrative = IllustrativePaths::select(&paths, config.seed_price);
        let illustrative_paths = illustrative
            .map(|i| {
                [i.bullish, i.bearish, i.stable]
                    .iter()
                    .map(|&idx| paths[idx].to_vec())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            label: label.into(),
            generated_at: Utc::now(),
            config: config.clone(),
            mean_path: result.mean_path.clone(),
            mean_loss: result.mean_loss,
            stats: PathStats::from_paths(&paths),
            illustrative,
            illustrative_paths,
            failed: result.failed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_extremes_and_closest_to_seed() {
        let a = [100.0, 110.0];
        let b = [100.0, 88.0];
        let c = [100.0, 101.0];
        let d = [100.0, 97.5];
        let picked = IllustrativePaths::select(&[&a, &b, &c, &d], 100.0).unwrap();

        assert_eq!(picked.bullish, 0);
        assert_eq!(picked.bearish, 1);
        assert_eq!(picked.stable, 2);
    }

    #[test]
    fn no_paths_no_selection() {
        assert!(IllustrativePaths::select(&[], 100.0).is_none());
        assert!(PathStats::from_paths(&[]).is_none());
    }

    #[test]
    fn final_price_stats() {
        let a = [100.0, 102.0];
        let b = [100.0, 98.0];
        let stats = PathStats::from_paths(&[&a, &b]).unwrap();

        assert_eq!(stats.runs, 2);
        assert_eq!(stats.mean_final, 100.0);
        assert_eq!(stats.min_final, 98.0);
        assert_eq!(stats.max_final, 102.0);
        assert_eq!(stats.std_final, 2.0);
    }
}
