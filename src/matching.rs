//! Daily double-auction clearing.
//!
//! Greedy priority matching: the current best buyer trades with the current
//! best seller while the bid is at or above the ask. Each trade prints at the
//! arithmetic mean of the two quotes, for `min` of the two remaining
//! quantities. This is not a uniform-price call auction: every trade's price
//! depends on which pair met, so the pairing order is part of the result.

use crate::book::DayBook;
use crate::types::{mean, OrderId, Participant, Side};
use serde::{Deserialize, Serialize};

/// A single execution between one buyer and one seller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub buy_order: OrderId,
    pub sell_order: OrderId,
    pub buyer: Participant,
    pub seller: Participant,
    pub price: f64,
    pub quantity: f64,
}

impl Trade {
    pub fn participant(&self, side: Side) -> Participant {
        match side {
            Side::Buy => self.buyer,
            Side::Sell => self.seller,
        }
    }
}

/// Everything one day's clearing produced, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayClearing {
    pub trades: Vec<Trade>,
}

impl DayClearing {
    pub fn new(trades: Vec<Trade>) -> Self {
        Self { trades }
    }

    /// Trade prices in execution order. may be empty.
    pub fn prices(&self) -> Vec<f64> {
        self.trades.iter().map(|t| t.price).collect()
    }

    /// Unweighted mean of the day's trade prices, `None` on a zero-trade day.
    pub fn closing_price(&self) -> Option<f64> {
        mean(&self.prices())
    }

    pub fn volume(&self) -> f64 {
        self.trades.iter().map(|t| t.quantity).sum()
    }

    /// Volume traded by `participant` orders on `side`.
    pub fn volume_for(&self, side: Side, participant: Participant) -> f64 {
        self.trades
            .iter()
            .filter(|t| t.participant(side) == participant)
            .map(|t| t.quantity)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

/// Clears one day's book. the simulator is generic over this so tests can
/// swap in deterministic clearing.
pub trait MarketClearing: Send + Sync {
    fn clear(&self, book: &DayBook) -> DayClearing;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleAuctionMatcher;

impl MarketClearing for DoubleAuctionMatcher {
    fn clear(&self, book: &DayBook) -> DayClearing {
        // working copies; the snapshot itself is never mutated
        let mut buyers = book.buyers().to_vec();
        let mut sellers = book.sellers().to_vec();

        // buyer cursor walks from the head, seller cursor from the tail
        let mut b = 0;
        let mut s = sellers.len();
        let mut trades = Vec::new();

        while b < buyers.len() && s > 0 {
            let buyer = &mut buyers[b];
            let seller = &mut sellers[s - 1];

            if buyer.is_filled() {
                b += 1;
                continue;
            }
            if seller.is_filled() {
                s -= 1;
                continue;
            }
            if buyer.price < seller.price {
                break;
            }

            let quantity = buyer.quantity.min(seller.quantity);
            trades.push(Trade {
                buy_order: buyer.id,
                sell_order: seller.id,
                buyer: buyer.participant,
                seller: seller.participant,
                price: (buyer.price + seller.price) / 2.0,
                quantity,
            });

            buyer.fill(quantity);
            seller.fill(quantity);

            if buyer.is_filled() {
                b += 1;
            }
            if seller.is_filled() {
                s -= 1;
            }
        }

        DayClearing::new(trades)
    }
}
