// 8.0 simulator/core.rs: one independent price path. owns its rng, path and log.

use super::results::{DayRecord, EventDayOutcome, InsiderOutcome, RunError, SimulationResult};
use super::welfare::societal_loss;
use crate::config::SimulationConfig;
use crate::events::EventLog;
use crate::generator::OrderBookGenerator;
use crate::insider::InsiderInjector;
use crate::matching::{DoubleAuctionMatcher, MarketClearing};
use crate::schedule::Crowd;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/** 8.1: single-run state. nothing here is shared with other runs */
#[derive(Debug)]
pub struct SingleRunSimulator<'a, M: MarketClearing> {
    pub(super) config: &'a SimulationConfig,
    pub(super) crowd: &'a Crowd,
    pub(super) matcher: &'a M,
    pub(super) generator: OrderBookGenerator,
    pub(super) injector: Option<InsiderInjector>,
    pub(super) rng: ChaCha8Rng,
    pub(super) seed: u64,
    pub(super) path: Vec<f64>,
    pub(super) days: Vec<DayRecord>,
    pub(super) event_day: Option<EventDayOutcome>,
    pub(super) log: Option<EventLog>,
}

impl<'a, M: MarketClearing> SingleRunSimulator<'a, M> {
    pub fn new(config: &'a SimulationConfig, crowd: &'a Crowd, matcher: &'a M, seed: u64) -> Result<Self, RunError> {
        config.validate()?;
        let generator = OrderBookGenerator::new(config.market.clone())?;

        let mut path = Vec::with_capacity(config.n_days + 1);
        path.push(config.seed_price);

        Ok(Self {
            config,
            crowd,
            matcher,
            generator,
            injector: config.insider.clone().map(InsiderInjector::new),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            path,
            days: Vec::with_capacity(config.n_days),
            event_day: None,
            log: config.record_events.then(|| EventLog::new(config.max_events)),
        })
    }

    /// Days simulated so far.
    pub fn day(&self) -> usize {
        self.days.len()
    }

    pub fn is_finished(&self) -> bool {
        self.day() >= self.config.n_days
    }

    /// Reference price for the next day: the last close, or the seed price.
    pub fn last_close(&self) -> f64 {
        self.path.last().copied().unwrap_or(self.config.seed_price)
    }

    pub fn path(&self) -> &[f64] {
        &self.path
    }

    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn event_day(&self) -> Option<&EventDayOutcome> {
        self.event_day.as_ref()
    }

    /// Run the remaining days and settle the insider's loss.
    pub fn run(mut self) -> Result<SimulationResult, RunError> {
        while !self.is_finished() {
            self.run_day()?;
        }

        let insider = match &self.injector {
            Some(injector) => {
                let event = injector.event();
                let outcome = self.event_day.take().ok_or(RunError::MissingEventDay(event.day))?;
                let loss = societal_loss(&self.path, &outcome, event, self.config.post_event_window)?;
                Some(InsiderOutcome {
                    event_day: outcome,
                    loss,
                })
            }
            None => None,
        };

        Ok(SimulationResult {
            seed: self.seed,
            path: self.path,
            days: self.days,
            insider,
            events: self.log.map(|log| log.into_events()).unwrap_or_default(),
        })
    }
}

/// Run one path with the double-auction matcher.
pub fn simulate(config: &SimulationConfig, crowd: &Crowd, seed: u64) -> Result<SimulationResult, RunError> {
    SingleRunSimulator::new(config, crowd, &DoubleAuctionMatcher, seed)?.run()
}
