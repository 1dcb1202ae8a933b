// 1.0: all the primitives live here. orders, sides, and who placed them.
// prices and quantities are plain f64: the market is simulated, not settled.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an order within one trading day.
/// carried from generation through sorting into the counterfactual, so insider
/// orders are never looked up by price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

// Buy = bids below the reference price. Sell = asks above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn sign(&self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

// 1.1: who placed the order. insider orders are forced on the event day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    Normal,
    Insider,
}

// 1.2: a single priced order. price is fixed once generated; quantity is the
// remaining capacity and shrinks on partial fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub participant: Participant,
    pub price: f64,
    pub quantity: f64,
}

impl Order {
    pub fn new(id: OrderId, side: Side, price: f64, quantity: f64) -> Self {
        Self {
            id,
            side,
            participant: Participant::Normal,
            price,
            quantity,
        }
    }

    pub fn is_insider(&self) -> bool {
        self.participant == Participant::Insider
    }

    pub fn is_filled(&self) -> bool {
        self.quantity <= 0.0
    }

    pub fn fill(&mut self, quantity: f64) {
        debug_assert!(quantity <= self.quantity, "cannot fill more than remaining");
        self.quantity -= quantity;
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
