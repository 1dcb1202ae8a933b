// insider-auction: daily double-auction price formation and insider welfare loss.
// one good, one closing price per day, many independent paths averaged.
// all computation is deterministic given a seed, with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: OrderId, Side, Participant, Order
//   2.x  generator.rs: randomized daily order flow
//   2.1x book.rs: sorted daily book snapshot
//   2.2x insider.rs: insider injection + counterfactual snapshot
//   3.x  matching.rs: greedy double-auction clearing
//   4.x  schedule.rs: participant counts per day
//   7.x  config.rs: market draws, insider event, batch settings, presets
//   8.x  simulator/: single-run day loop, event day, welfare loss
//   9.x  monte_carlo.rs: parallel independent runs, elementwise means
//   11.x events.rs: per-run event log for audit
//   12.x report.rs: illustrative paths, final-price stats, json report

pub mod book;
pub mod config;
pub mod events;
pub mod generator;
pub mod insider;
pub mod matching;
pub mod monte_carlo;
pub mod report;
pub mod schedule;
pub mod simulator;
pub mod types;

// re exports for convenience
pub use book::*;
pub use config::*;
pub use events::*;
pub use generator::*;
pub use insider::*;
pub use matching::*;
pub use monte_carlo::*;
pub use report::*;
pub use schedule::*;
pub use simulator::*;
pub use types::*;
