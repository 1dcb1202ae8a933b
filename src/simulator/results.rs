// 8.0.2: result types and errors for single runs.

use crate::config::ConfigError;
use crate::events::Event;
use crate::insider::InjectionError;
use crate::types::{OrderId, Side};
use serde::{Deserialize, Serialize};

/// One cleared day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: usize,
    pub reference_price: f64,
    pub buyers: usize,
    pub sellers: usize,
    pub trades: usize,
    pub volume: f64,
    pub closing_price: f64,
    pub carried_forward: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideVolumes {
    pub buy: f64,
    pub sell: f64,
}

impl SideVolumes {
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::Buy => self.buy,
            Side::Sell => self.sell,
        }
    }
}

/// Bookkeeping from the event day's two clearing passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDayOutcome {
    pub day: usize,
    pub side: Side,
    pub insider_ids: Vec<OrderId>,
    pub forced_price: f64,
    pub actual_close: f64,
    // counterfactual close: what the day would have printed without the insider
    pub theoretical_price: f64,
    /// Insider's own fills. diagnostic only: the loss prices the normal
    /// volume the insider displaced, which is `counterfactual - realized`.
    pub insider_volume: f64,
    // normal participants' fills with the insider present
    pub realized: SideVolumes,
    // fills with the insider removed
    pub counterfactual: SideVolumes,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelfareLoss {
    pub post_event_mean: f64,
    pub buyer_loss: f64,
    pub seller_loss: f64,
    // signed as harm to the non-insider side
    pub total_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderOutcome {
    pub event_day: EventDayOutcome,
    pub loss: WelfareLoss,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub seed: u64,
    // index 0 is the seed price, index d the close of day d
    pub path: Vec<f64>,
    pub days: Vec<DayRecord>,
    pub insider: Option<InsiderOutcome>,
    pub events: Vec<Event>,
}

impl SimulationResult {
    pub fn societal_loss(&self) -> Option<f64> {
        self.insider.as_ref().map(|o| o.loss.total_loss)
    }

    pub fn final_price(&self) -> f64 {
        self.path.last().copied().unwrap_or_default()
    }

    pub fn carried_forward_days(&self) -> usize {
        self.days.iter().filter(|d| d.carried_forward).count()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Injection error: {0}")]
    Injection(#[from] InjectionError),

    #[error("No post-event days after event day {day} (horizon {n_days})")]
    EmptyPostEventWindow { day: usize, n_days: usize },

    #[error("Event day {0} never produced a counterfactual")]
    MissingEventDay(usize),

    #[error("Horizon of {0} days already simulated")]
    HorizonExhausted(usize),
}
