//! Double-auction insider simulation.
//!
//! Runs a baseline market, then the same market with a buyer insider and with
//! a seller insider, and prints the mean price path and mean societal loss.

use insider_auction::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
auction-sim: daily double-auction Monte Carlo with an insider

USAGE:
  auction-sim [FLAGS]

FLAGS:
  --runs N          Number of simulated paths (default: 1000)
  --days N          Trading days per path (default: 100)
  --seed U64        Base seed; run i uses seed + i (default: 1)
  --notional X      Insider notional for the insider scenarios (default: 10)
  --sequential      Run paths on one thread
  --config PATH     Load the base SimulationConfig from a json file
  --json PATH       Write the three batch reports as json
  --help            Show this help
";

#[derive(Debug, Default)]
struct Args {
    runs: Option<usize>,
    days: Option<usize>,
    seed: Option<u64>,
    notional: Option<f64>,
    sequential: bool,
    config: Option<PathBuf>,
    json: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut out = Args::default();
        let mut it = std::env::args().skip(1);

        while let Some(arg) = it.next() {
            let mut value = |name: &str| it.next().ok_or_else(|| format!("Missing value for {name}"));
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                "--sequential" => out.sequential = true,
                "--runs" => out.runs = Some(value("--runs")?.parse().map_err(|_| "Invalid --runs".to_string())?),
                "--days" => out.days = Some(value("--days")?.parse().map_err(|_| "Invalid --days".to_string())?),
                "--seed" => out.seed = Some(value("--seed")?.parse().map_err(|_| "Invalid --seed".to_string())?),
                "--notional" => {
                    out.notional = Some(value("--notional")?.parse().map_err(|_| "Invalid --notional".to_string())?)
                }
                "--config" => out.config = Some(PathBuf::from(value("--config")?)),
                "--json" => out.json = Some(PathBuf::from(value("--json")?)),
                other => return Err(format!("Unknown flag {other}")),
            }
        }

        Ok(out)
    }

    fn base_config(&self) -> Result<SimulationConfig, String> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
                serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))?
            }
            None => SimulationConfig::baseline(),
        };

        if let Some(runs) = self.runs {
            config.n_simulations = runs;
        }
        if let Some(days) = self.days {
            config.n_days = days;
        }
        if let Some(seed) = self.seed {
            config.base_seed = seed;
        }
        config.force_sequential |= self.sequential;
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let base = match args.base_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    println!("Double Auction Insider Simulation");
    println!("{} paths x {} days, base seed {}\n", base.n_simulations, base.n_days, base.base_seed);

    let notional = args.notional.unwrap_or(10.0);
    let crowd = Crowd::default();

    let mut scenarios = vec![("baseline", base.clone())];
    match base.midpoint_event_day() {
        Some(event_day) => {
            for (label, side) in [("insider_buyer", Side::Buy), ("insider_seller", Side::Sell)] {
                let event = InsiderEvent::new(event_day, side, notional, 10_000.0, 1);
                scenarios.push((label, base.clone().with_insider(event)));
            }
        }
        None => println!("Insider scenarios skipped: {} day(s) leave no post-event window\n", base.n_days),
    }

    let mut reports = Vec::new();
    for (label, config) in scenarios {
        match run_scenario(label, &config, &crowd) {
            Some(report) => reports.push(report),
            None => std::process::exit(1),
        }
    }

    if let Some(path) = args.json {
        let written = serde_json::to_string_pretty(&reports)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("Reports written to {}", path.display()),
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                std::process::exit(1);
            }
        }
    }

    println!("\nAll simulations completed.");
}

fn run_scenario(label: &str, config: &SimulationConfig, crowd: &Crowd) -> Option<BatchReport> {
    println!("Scenario: {label}");
    if let Some(event) = &config.insider {
        println!(
            "  {} insider on day {}: notional {}, richness {}, {} order(s)",
            event.side, event.day, event.notional, event.richness, event.insider_count
        );
    }

    let result = match MonteCarloAggregator::new(config, crowd).run() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("  batch failed: {e}");
            return None;
        }
    };
    let report = BatchReport::new(label, config, &result);

    println!("  Completed runs: {}, failed: {}", result.completed_runs(), result.failed_runs());
    for (day, price) in result.mean_path.iter().enumerate().step_by((config.n_days / 5).max(1)) {
        println!("  Day {:>4}: mean close {:.3}", day + 1, price);
    }
    if let Some(last) = result.mean_path.last() {
        println!("  Day {:>4}: mean close {:.3}", config.n_days, last);
    }
    if let Some(stats) = report.stats {
        println!(
            "  Final price: mean {:.3}, std {:.3}, range [{:.3}, {:.3}]",
            stats.mean_final, stats.std_final, stats.min_final, stats.max_final
        );
    }
    if let Some(picked) = report.illustrative {
        let paths = result.paths();
        let last = |i: usize| paths[i].last().copied().unwrap_or(config.seed_price);
        println!(
            "  Illustrative finals: bullish {:.3}, bearish {:.3}, stable {:.3}",
            last(picked.bullish),
            last(picked.bearish),
            last(picked.stable)
        );
    }
    if let Some(loss) = result.mean_loss {
        println!("  Mean societal loss: {loss:.2}");
    }
    println!();

    Some(report)
}
