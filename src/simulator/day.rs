//! One trading day: generate, inject on the event day, clear, append the close.

use super::core::SingleRunSimulator;
use super::results::{DayRecord, EventDayOutcome, RunError, SideVolumes};
use crate::events::{CounterfactualClearedEvent, DayClearedEvent, EventPayload, InsiderInjectedEvent};
use crate::generator::GeneratedOrders;
use crate::matching::{DayClearing, MarketClearing};
use crate::types::{Participant, Side};
use tracing::{debug, info};

impl<'a, M: MarketClearing> SingleRunSimulator<'a, M> {
    /// Simulate the next day and append its close to the path.
    pub fn run_day(&mut self) -> Result<&DayRecord, RunError> {
        if self.is_finished() {
            return Err(RunError::HorizonExhausted(self.config.n_days));
        }

        let day = self.day() + 1;
        let reference_price = self.last_close();
        let event = self.injector.as_ref().map(|i| i.event());
        let (num_buyers, num_sellers) = self.crowd.counts(day, event);

        let orders = self
            .generator
            .generate_orders(&mut self.rng, num_buyers, num_sellers, reference_price);

        let is_event_day = self.injector.as_ref().is_some_and(|i| i.is_event_day(day));
        let clearing = if is_event_day {
            self.clear_event_day(day, reference_price, orders)?
        } else {
            self.matcher.clear(&orders.into_book())
        };

        self.close_day(day, reference_price, num_buyers, num_sellers, &clearing);
        Ok(&self.days[self.days.len() - 1])
    }

    /// Clear the actual book and the insider-free counterfactual, keeping the
    /// volumes the loss needs. returns the actual clearing.
    fn clear_event_day(
        &mut self,
        day: usize,
        reference_price: f64,
        orders: GeneratedOrders,
    ) -> Result<DayClearing, RunError> {
        let injector = self.injector.as_ref().ok_or(RunError::MissingEventDay(day))?;
        let side = injector.event().side;
        let quantity = injector.event().richness;
        let injected = injector.inject(orders, reference_price)?;

        self.emit_event(
            day,
            EventPayload::InsiderInjected(InsiderInjectedEvent {
                side,
                order_ids: injected.insider_ids.clone(),
                price: injected.forced_price,
                quantity,
            }),
        );

        let actual = self.matcher.clear(&injected.actual);
        let counterfactual = self.matcher.clear(&injected.counterfactual);

        // a silent counterfactual day carries the reference like any other
        let theoretical_price = counterfactual.closing_price().unwrap_or(reference_price);
        let outcome = EventDayOutcome {
            day,
            side,
            insider_ids: injected.insider_ids,
            forced_price: injected.forced_price,
            actual_close: actual.closing_price().unwrap_or(reference_price),
            theoretical_price,
            insider_volume: actual.volume_for(side, Participant::Insider),
            realized: normal_volumes(&actual),
            counterfactual: normal_volumes(&counterfactual),
        };

        info!(
            day,
            %side,
            forced_price = outcome.forced_price,
            insider_volume = outcome.insider_volume,
            actual_close = outcome.actual_close,
            theoretical_price,
            "insider event day cleared"
        );

        self.emit_event(
            day,
            EventPayload::CounterfactualCleared(CounterfactualClearedEvent {
                trades: counterfactual.trades.len(),
                volume: counterfactual.volume(),
                theoretical_price,
                carried_forward: counterfactual.is_empty(),
            }),
        );

        self.event_day = Some(outcome);
        Ok(actual)
    }

    fn close_day(
        &mut self,
        day: usize,
        reference_price: f64,
        buyers: usize,
        sellers: usize,
        clearing: &DayClearing,
    ) {
        let (closing_price, carried_forward) = match clearing.closing_price() {
            Some(price) => (price, false),
            None => (reference_price, true),
        };

        debug!(
            day,
            trades = clearing.trades.len(),
            volume = clearing.volume(),
            closing_price,
            carried_forward,
            "day cleared"
        );

        let record = DayRecord {
            day,
            reference_price,
            buyers,
            sellers,
            trades: clearing.trades.len(),
            volume: clearing.volume(),
            closing_price,
            carried_forward,
        };

        self.emit_event(
            day,
            EventPayload::DayCleared(DayClearedEvent {
                reference_price,
                buyers,
                sellers,
                trades: record.trades,
                volume: record.volume,
                closing_price,
                carried_forward,
            }),
        );

        self.path.push(closing_price);
        self.days.push(record);
    }

    fn emit_event(&mut self, day: usize, payload: EventPayload) {
        if let Some(log) = self.log.as_mut() {
            log.push(day, payload);
        }
    }
}

fn normal_volumes(clearing: &DayClearing) -> SideVolumes {
    SideVolumes {
        buy: clearing.volume_for(Side::Buy, Participant::Normal),
        sell: clearing.volume_for(Side::Sell, Participant::Normal),
    }
}
