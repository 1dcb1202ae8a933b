// 11.0: every day of a run can produce events. used for audit trails and for
// replaying why a path moved. the EventPayload enum lists all event types.

use crate::types::{OrderId, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub day: usize,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, day: usize, payload: EventPayload) -> Self {
        Self { id, day, payload }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // Clearing events
    DayCleared(DayClearedEvent),
    CounterfactualCleared(CounterfactualClearedEvent),

    // Insider events
    InsiderInjected(InsiderInjectedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayClearedEvent {
    pub reference_price: f64,
    pub buyers: usize,
    pub sellers: usize,
    pub trades: usize,
    pub volume: f64,
    pub closing_price: f64,
    // no trade printed, previous close carried forward
    pub carried_forward: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsiderInjectedEvent {
    pub side: Side,
    pub order_ids: Vec<OrderId>,
    pub price: f64,
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterfactualClearedEvent {
    pub trades: usize,
    pub volume: f64,
    pub theoretical_price: f64,
    pub carried_forward: bool,
}

/// Bounded in-memory event log. oldest events are drained first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
    next_event_id: u64,
    max_events: usize,
}

impl EventLog {
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            next_event_id: 1,
            max_events,
        }
    }

    pub fn push(&mut self, day: usize, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), day, payload);
        self.next_event_id += 1;
        self.events.push(event);

        if self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(0..drain_count);
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
