//! One day's order book.
//!
//! A `DayBook` is an immutable snapshot: buyers sorted by descending price
//! (best first), sellers sorted by descending price (best, i.e. lowest, last).
//! The matcher works on its own copy of the quantities.

use crate::types::{Order, OrderId, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayBook {
    buyers: Vec<Order>,
    sellers: Vec<Order>,
}

fn sort_descending(orders: &mut [Order]) {
    // stable, so equal prices keep arrival order
    orders.sort_by(|a, b| b.price.total_cmp(&a.price));
}

impl DayBook {
    pub fn new(mut buyers: Vec<Order>, mut sellers: Vec<Order>) -> Self {
        debug_assert!(buyers.iter().all(|o| o.side == Side::Buy));
        debug_assert!(sellers.iter().all(|o| o.side == Side::Sell));
        sort_descending(&mut buyers);
        sort_descending(&mut sellers);
        Self { buyers, sellers }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Buyers, best (highest price) first.
    pub fn buyers(&self) -> &[Order] {
        &self.buyers
    }

    /// Sellers in descending price; the best (lowest) seller is last.
    pub fn sellers(&self) -> &[Order] {
        &self.sellers
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.buyers.first().map(|o| o.price)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.sellers.last().map(|o| o.price)
    }

    /// Check if the book is crossed (best bid >= best ask)
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    pub fn order_count(&self) -> usize {
        self.buyers.len() + self.sellers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buyers.is_empty() && self.sellers.is_empty()
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.buyers.iter().chain(self.sellers.iter()).find(|o| o.id == id)
    }

    /// Copy of the book without the given orders. positions of the remaining
    /// orders keep their relative priority.
    pub fn without(&self, ids: &[OrderId]) -> Self {
        let keep = |o: &&Order| !ids.contains(&o.id);
        Self {
            buyers: self.buyers.iter().filter(keep).copied().collect(),
            sellers: self.sellers.iter().filter(keep).copied().collect(),
        }
    }

    pub fn total_quantity(&self, side: Side) -> f64 {
        let orders = match side {
            Side::Buy => &self.buyers,
            Side::Sell => &self.sellers,
        };
        orders.iter().map(|o| o.quantity).sum()
    }
}
