//! Monte Carlo tests
//!
//! Batch aggregation, failure exclusion, and parallel determinism.

use insider_auction::*;

/// Prints one trade at a fixed price whenever both sides are present.
#[derive(Debug, Clone, Copy)]
struct ConstantClearing(f64);

impl MarketClearing for ConstantClearing {
    fn clear(&self, book: &DayBook) -> DayClearing {
        match (book.buyers().first(), book.sellers().last()) {
            (Some(buyer), Some(seller)) => DayClearing::new(vec![Trade {
                buy_order: buyer.id,
                sell_order: seller.id,
                buyer: buyer.participant,
                seller: seller.participant,
                price: self.0,
                quantity: buyer.quantity.min(seller.quantity),
            }]),
            _ => DayClearing::default(),
        }
    }
}

fn batch_config(n_days: usize, n_simulations: usize) -> SimulationConfig {
    let mut config = SimulationConfig::quick();
    config.n_days = n_days;
    config.n_simulations = n_simulations;
    config
}

mod aggregation {
    use super::*;

    #[test]
    fn constant_clearing_gives_constant_mean_path() {
        let crowd = Crowd::default();
        for n in [1, 3, 17] {
            let config = batch_config(12, n);
            let result = MonteCarloAggregator::with_matcher(&config, &crowd, ConstantClearing(87.5))
                .run()
                .unwrap();

            assert_eq!(result.mean_path.len(), 12);
            assert!(result.mean_path.iter().all(|p| *p == 87.5));
            assert_eq!(result.completed_runs(), n);
        }
    }

    #[test]
    fn mean_path_is_elementwise_mean_of_runs() {
        let config = batch_config(10, 6);
        let crowd = Crowd::default();
        let result = MonteCarloAggregator::new(&config, &crowd).run().unwrap();

        for day in 1..=10 {
            let expected = result.runs.iter().map(|r| r.path[day]).sum::<f64>() / 6.0;
            assert!((result.mean_path[day - 1] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn runs_are_independent() {
        let config = batch_config(10, 4);
        let crowd = Crowd::default();
        let result = MonteCarloAggregator::new(&config, &crowd).run().unwrap();

        let seeds: Vec<u64> = result.runs.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![1, 2, 3, 4]);
        assert_ne!(result.runs[0].path, result.runs[1].path);
    }

    #[test]
    fn run_matches_standalone_simulation() {
        let config = batch_config(10, 3);
        let crowd = Crowd::default();
        let result = MonteCarloAggregator::new(&config, &crowd).run().unwrap();

        let standalone = simulate(&config, &crowd, run_seed(config.base_seed, 2)).unwrap();
        assert_eq!(result.runs[2].path, standalone.path);
    }
}

mod parallelism {
    use super::*;

    #[test]
    fn parallel_equals_sequential() {
        let crowd = Crowd::default();
        let mut config = batch_config(20, 24);
        config.insider = Some(InsiderEvent::new(5, Side::Buy, 10.0, 10_000.0, 1));

        let parallel = MonteCarloAggregator::new(&config, &crowd).run().unwrap();
        config.force_sequential = true;
        let sequential = MonteCarloAggregator::new(&config, &crowd).run().unwrap();

        assert_eq!(parallel.mean_path, sequential.mean_path);
        assert_eq!(parallel.mean_loss, sequential.mean_loss);
        for (a, b) in parallel.runs.iter().zip(&sequential.runs) {
            assert_eq!(a.path, b.path);
        }
    }
}

mod failures {
    use super::*;

    fn completed(seed: u64, path: Vec<f64>, loss: Option<f64>) -> RunOutcome {
        let insider = loss.map(|total_loss| InsiderOutcome {
            event_day: EventDayOutcome {
                day: 1,
                side: Side::Buy,
                insider_ids: vec![OrderId(1)],
                forced_price: 105.0,
                actual_close: path[1],
                theoretical_price: 100.0,
                insider_volume: 0.0,
                realized: SideVolumes::default(),
                counterfactual: SideVolumes::default(),
            },
            loss: WelfareLoss {
                post_event_mean: 100.0,
                buyer_loss: total_loss,
                seller_loss: 0.0,
                total_loss,
            },
        });

        RunOutcome {
            run_index: seed as usize,
            seed,
            result: Ok(SimulationResult {
                seed,
                path,
                days: Vec::new(),
                insider,
                events: Vec::new(),
            }),
        }
    }

    fn failed(seed: u64) -> RunOutcome {
        RunOutcome {
            run_index: seed as usize,
            seed,
            result: Err(RunError::Injection(InjectionError::SideTooSmall {
                side: Side::Sell,
                needed: 1,
                available: 0,
            })),
        }
    }

    #[test]
    fn failed_runs_are_excluded_not_zero_filled() {
        let outcomes = vec![
            completed(0, vec![100.0, 102.0, 104.0], Some(30.0)),
            failed(1),
            completed(2, vec![100.0, 98.0, 100.0], Some(-10.0)),
        ];
        let result = AggregateResult::from_outcomes(outcomes).unwrap();

        assert_eq!(result.completed_runs(), 2);
        assert_eq!(result.failed_runs(), 1);
        assert_eq!(result.failed[0].run_index, 1);
        assert_eq!(result.mean_path, vec![100.0, 102.0]);
        assert_eq!(result.mean_loss, Some(10.0));
    }

    #[test]
    fn all_failed_is_an_error() {
        let result = AggregateResult::from_outcomes(vec![failed(0), failed(1)]);
        assert!(matches!(result, Err(AggregateError::AllRunsFailed(2))));
    }

    #[test]
    fn batch_where_every_run_fails() {
        let mut config = batch_config(10, 5);
        config.insider = Some(InsiderEvent::new(4, Side::Sell, 10.0, 10_000.0, 2));
        let crowd = Crowd::new(FixedCrowd(100), ScheduleFn(|_: &ScheduleContext| 1));

        let result = MonteCarloAggregator::new(&config, &crowd).run();
        assert!(matches!(result, Err(AggregateError::AllRunsFailed(5))));
    }

    #[test]
    fn insider_batch_reports_mean_loss() {
        let mut config = batch_config(30, 16);
        config.insider = Some(InsiderEvent::new(10, Side::Buy, 10.0, 10_000.0, 1));
        let crowd = Crowd::default();

        let result = MonteCarloAggregator::new(&config, &crowd).run().unwrap();
        let losses: Vec<f64> = result.runs.iter().filter_map(|r| r.societal_loss()).collect();

        assert_eq!(losses.len(), 16);
        let expected = losses.iter().sum::<f64>() / 16.0;
        assert!((result.mean_loss.unwrap() - expected).abs() < 1e-6);
    }
}

mod reporting {
    use super::*;

    #[test]
    fn batch_report_round_trips_through_json() {
        let config = batch_config(10, 8);
        let crowd = Crowd::default();
        let result = MonteCarloAggregator::new(&config, &crowd).run().unwrap();
        let report = BatchReport::new("baseline", &config, &result);

        assert_eq!(report.illustrative_paths.len(), 3);
        assert_eq!(report.stats.unwrap().runs, 8);

        let json = serde_json::to_string(&report).unwrap();
        let back: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.label, "baseline");
        assert_eq!(back.mean_path.len(), 10);
    }

    #[test]
    fn illustrative_picks_match_final_prices() {
        let config = batch_config(15, 20);
        let crowd = Crowd::default();
        let result = MonteCarloAggregator::new(&config, &crowd).run().unwrap();

        let paths = result.paths();
        let picked = IllustrativePaths::select(&paths, 100.0).unwrap();
        let finals: Vec<f64> = paths.iter().map(|p| *p.last().unwrap()).collect();

        assert!(finals.iter().all(|f| *f <= finals[picked.bullish]));
        assert!(finals.iter().all(|f| *f >= finals[picked.bearish]));
        assert!(finals
            .iter()
            .all(|f| (f - 100.0).abs() >= (finals[picked.stable] - 100.0).abs()));
    }
}
