//! Participant counts per day.
//!
//! How many buyers and sellers show up is a function of the day index and, on
//! the insider's event day, of the insider's parameters.

use crate::config::InsiderEvent;
use crate::types::Side;

/// Insider parameters visible to a count function on the event day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsiderSlot {
    pub notional: f64,
    pub is_insider_side: bool,
    pub insider_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleContext {
    pub day: usize,
    pub side: Side,
    pub insider: Option<InsiderSlot>,
}

impl ScheduleContext {
    pub fn new(day: usize, side: Side, event: Option<&InsiderEvent>) -> Self {
        let insider = event.filter(|e| e.day == day).map(|e| InsiderSlot {
            notional: e.notional,
            is_insider_side: e.side == side,
            insider_count: e.insider_count,
        });
        Self { day, side, insider }
    }

    /// Insider orders this side must make room for today.
    pub fn insider_slots(&self) -> usize {
        match self.insider {
            Some(slot) if slot.is_insider_side => slot.insider_count,
            _ => 0,
        }
    }
}

pub trait ParticipantSchedule: Send + Sync {
    fn count(&self, ctx: &ScheduleContext) -> usize;
}

/// A fixed crowd of normal traders. on the event day the insider joins the
/// crowd instead of displacing one of its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCrowd(pub usize);

impl ParticipantSchedule for FixedCrowd {
    fn count(&self, ctx: &ScheduleContext) -> usize {
        self.0 + ctx.insider_slots()
    }
}

/// Any closure over the schedule context.
pub struct ScheduleFn<F>(pub F);

impl<F> ParticipantSchedule for ScheduleFn<F>
where
    F: Fn(&ScheduleContext) -> usize + Send + Sync,
{
    fn count(&self, ctx: &ScheduleContext) -> usize {
        (self.0)(ctx)
    }
}

/// Buyer and seller schedules for one market.
pub struct Crowd {
    pub buyers: Box<dyn ParticipantSchedule>,
    pub sellers: Box<dyn ParticipantSchedule>,
}

impl Crowd {
    pub fn new(buyers: impl ParticipantSchedule + 'static, sellers: impl ParticipantSchedule + 'static) -> Self {
        Self {
            buyers: Box::new(buyers),
            sellers: Box::new(sellers),
        }
    }

    pub fn fixed(buyers: usize, sellers: usize) -> Self {
        Self::new(FixedCrowd(buyers), FixedCrowd(sellers))
    }

    pub fn counts(&self, day: usize, event: Option<&InsiderEvent>) -> (usize, usize) {
        let buy_ctx = ScheduleContext::new(day, Side::Buy, event);
        let sell_ctx = ScheduleContext::new(day, Side::Sell, event);
        (self.buyers.count(&buy_ctx), self.sellers.count(&sell_ctx))
    }
}

impl Default for Crowd {
    fn default() -> Self {
        Self::fixed(100, 100)
    }
}

impl std::fmt::Debug for Crowd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crowd").finish_non_exhaustive()
    }
}
