//! Societal loss from the insider's trade.
//!
//! Per side, the volume the insider displaced (counterfactual minus realized
//! normal volume) is priced at the gap between the counterfactual close and
//! the mean close over the post-event window. The total is signed as harm to
//! the non-insider side, so it flips for a seller insider.

use super::results::{EventDayOutcome, RunError, WelfareLoss};
use crate::config::InsiderEvent;
use crate::types::{mean, Side};

pub fn societal_loss(
    path: &[f64],
    outcome: &EventDayOutcome,
    event: &InsiderEvent,
    window: usize,
) -> Result<WelfareLoss, RunError> {
    let n_days = path.len().saturating_sub(1);
    let start = event.day + 1;
    let end = (event.day + window).min(n_days);

    if start > end {
        return Err(RunError::EmptyPostEventWindow { day: event.day, n_days });
    }

    let post_event_mean = mean(&path[start..=end]).ok_or(RunError::EmptyPostEventWindow { day: event.day, n_days })?;
    let gap = outcome.theoretical_price - post_event_mean;

    let displaced = |side: Side| outcome.counterfactual.get(side) - outcome.realized.get(side);
    let buyer_loss = displaced(Side::Buy) * gap;
    let seller_loss = displaced(Side::Sell) * gap;

    let total = buyer_loss + seller_loss;
    let total_loss = match event.side {
        Side::Buy => total,
        Side::Sell => -total,
    };

    Ok(WelfareLoss {
        post_event_mean,
        buyer_loss,
        seller_loss,
        total_loss,
    })
}
