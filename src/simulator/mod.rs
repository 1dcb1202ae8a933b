// 8.0: single-run simulator. drives the day loop: generate, inject on the
// event day, clear, append the close. strictly sequential within a run.

mod core;
mod day;
mod results;
mod welfare;

pub use core::{simulate, SingleRunSimulator};
pub use results::{DayRecord, EventDayOutcome, InsiderOutcome, RunError, SideVolumes, SimulationResult, WelfareLoss};
pub use welfare::societal_loss;
