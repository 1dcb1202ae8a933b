//! Insider injection on the event day.
//!
//! The insider takes over the first `insider_count` orders of its side before
//! the day is sorted, quoting `ref ± notional / 2` for `richness` units. Two
//! immutable snapshots come out: the actual book and the counterfactual book
//! with the insider's capacity removed.

use crate::book::DayBook;
use crate::config::InsiderEvent;
use crate::generator::GeneratedOrders;
use crate::types::{OrderId, Participant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectionError {
    #[error("insider needs {needed} orders on the {side} side, book has {available}")]
    SideTooSmall {
        side: crate::types::Side,
        needed: usize,
        available: usize,
    },
}

/// Both snapshots of the event day plus the ids of the forced orders.
#[derive(Debug, Clone)]
pub struct InjectedDay {
    pub actual: DayBook,
    pub counterfactual: DayBook,
    pub insider_ids: Vec<OrderId>,
    pub forced_price: f64,
}

#[derive(Debug, Clone)]
pub struct InsiderInjector {
    event: InsiderEvent,
}

impl InsiderInjector {
    pub fn new(event: InsiderEvent) -> Self {
        Self { event }
    }

    pub fn event(&self) -> &InsiderEvent {
        &self.event
    }

    pub fn is_event_day(&self, day: usize) -> bool {
        self.event.day == day
    }

    /// Force the insider orders into the drawn flow, then build both snapshots.
    pub fn inject(&self, mut orders: GeneratedOrders, reference_price: f64) -> Result<InjectedDay, InjectionError> {
        let forced_price = self.event.forced_price(reference_price);
        let side = self.event.side;
        let needed = self.event.insider_count;

        let side_orders = orders.side_mut(side);
        if side_orders.len() < needed {
            return Err(InjectionError::SideTooSmall {
                side,
                needed,
                available: side_orders.len(),
            });
        }

        let mut insider_ids = Vec::with_capacity(needed);
        for order in side_orders.iter_mut().take(needed) {
            order.price = forced_price;
            order.quantity = self.event.richness;
            order.participant = Participant::Insider;
            insider_ids.push(order.id);
        }

        let actual = orders.into_book();
        let counterfactual = actual.without(&insider_ids);

        Ok(InjectedDay {
            actual,
            counterfactual,
            insider_ids,
            forced_price,
        })
    }
}
