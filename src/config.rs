// 7.0 config.rs: all settings in one place. market draws, insider event, batch size.
// 7.1 presets cover the baseline market and a buyer or seller insider.

use serde::{Deserialize, Serialize};

use crate::types::Side;

pub const SEED_PRICE: f64 = 100.0;
pub const POST_EVENT_WINDOW: usize = 30;

// Distribution parameters for one day's randomized order book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    // Smallest spread offset from the reference price (inclusive)
    pub discount_min: u32,
    // Largest spread offset from the reference price (inclusive)
    pub discount_max: u32,
    // Standard deviation of the normal price perturbation
    pub price_noise_std: f64,
    // Smallest order quantity (inclusive)
    pub quantity_min: u32,
    // Largest order quantity (inclusive)
    pub quantity_max: u32,
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            discount_min: 3,
            discount_max: 6,
            price_noise_std: 5.0,
            quantity_min: 100,
            quantity_max: 1000,
        }
    }
}

/** 7.2: the informed trader. fixed for the run, consumed on `day` only */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderEvent {
    // 1-based simulation day on which the insider trades
    pub day: usize,
    pub side: Side,
    // Size of the price-moving news; the insider quotes ref ± notional / 2
    pub notional: f64,
    // Quantity placed by each insider order
    pub richness: f64,
    // Number of orders on the insider side taken over by the insider
    pub insider_count: usize,
}

impl InsiderEvent {
    pub fn new(day: usize, side: Side, notional: f64, richness: f64, insider_count: usize) -> Self {
        Self {
            day,
            side,
            notional,
            richness,
            insider_count,
        }
    }

    /// Forced price: a buyer insider bids above the reference, a seller asks below it.
    pub fn forced_price(&self, reference_price: f64) -> f64 {
        reference_price + self.side.sign() * 0.5 * self.notional
    }
}

// The complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub n_days: usize,
    pub n_simulations: usize,
    // Run i is seeded with base_seed + i
    pub base_seed: u64,
    pub seed_price: f64,
    // Days after the event averaged into the post-event price
    pub post_event_window: usize,
    // Run Monte Carlo trials on one thread
    pub force_sequential: bool,
    // Keep a per-run event log
    pub record_events: bool,
    pub max_events: usize,
    pub market: MarketParams,
    pub insider: Option<InsiderEvent>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_days: 100,
            n_simulations: 1000,
            base_seed: 1,
            seed_price: SEED_PRICE,
            post_event_window: POST_EVENT_WINDOW,
            force_sequential: false,
            record_events: false,
            max_events: 10_000,
            market: MarketParams::default(),
            insider: None,
        }
    }
}

impl SimulationConfig {
    // Plain market, no insider
    pub fn baseline() -> Self {
        Self::default()
    }

    // One large buyer entering on day 50 ahead of good news
    pub fn insider_buyer(notional: f64) -> Self {
        let mut config = Self::default();
        config.insider = Some(InsiderEvent::new(50, Side::Buy, notional, 10_000.0, 1));
        config
    }

    // One large seller entering on day 50 ahead of bad news
    pub fn insider_seller(notional: f64) -> Self {
        let mut config = Self::default();
        config.insider = Some(InsiderEvent::new(50, Side::Sell, notional, 10_000.0, 1));
        config
    }

    // Small batch for demos and tests
    pub fn quick() -> Self {
        let mut config = Self::default();
        config.n_days = 40;
        config.n_simulations = 32;
        config
    }

    pub fn with_insider(mut self, event: InsiderEvent) -> Self {
        self.insider = Some(event);
        self
    }

    /// Mid-horizon event day that still leaves a post-event window.
    /// `None` when the horizon has fewer than two days.
    pub fn midpoint_event_day(&self) -> Option<usize> {
        if self.n_days < 2 {
            return None;
        }
        Some((self.n_days / 2).clamp(1, self.n_days - 1))
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_days == 0 {
            return Err(ConfigError::InvalidHorizon {
                reason: "need at least one trading day".to_string(),
            });
        }

        if self.n_simulations == 0 {
            return Err(ConfigError::InvalidHorizon {
                reason: "need at least one simulation".to_string(),
            });
        }

        if !self.seed_price.is_finite() || self.seed_price <= 0.0 {
            return Err(ConfigError::InvalidMarket {
                reason: "seed price must be positive".to_string(),
            });
        }

        if self.post_event_window == 0 {
            return Err(ConfigError::InvalidHorizon {
                reason: "post event window must be at least one day".to_string(),
            });
        }

        self.market.validate()?;

        if let Some(event) = &self.insider {
            if event.day == 0 || event.day > self.n_days {
                return Err(ConfigError::InvalidInsider {
                    reason: format!("event day {} outside 1..={}", event.day, self.n_days),
                });
            }
            if event.insider_count == 0 {
                return Err(ConfigError::InvalidInsider {
                    reason: "insider count must be positive".to_string(),
                });
            }
            if !event.richness.is_finite() || event.richness <= 0.0 {
                return Err(ConfigError::InvalidInsider {
                    reason: "richness must be positive".to_string(),
                });
            }
            if !event.notional.is_finite() || event.notional < 0.0 {
                return Err(ConfigError::InvalidInsider {
                    reason: "notional must be non-negative".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl MarketParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discount_min > self.discount_max {
            return Err(ConfigError::InvalidMarket {
                reason: "discount min must not exceed max".to_string(),
            });
        }

        if !self.price_noise_std.is_finite() || self.price_noise_std < 0.0 {
            return Err(ConfigError::InvalidMarket {
                reason: "price noise must be a non-negative number".to_string(),
            });
        }

        if self.quantity_min == 0 || self.quantity_min > self.quantity_max {
            return Err(ConfigError::InvalidMarket {
                reason: "quantity range must be positive and ordered".to_string(),
            });
        }

        Ok(())
    }
}

// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid horizon: {reason}")]
    InvalidHorizon { reason: String },

    #[error("invalid market: {reason}")]
    InvalidMarket { reason: String },

    #[error("invalid insider: {reason}")]
    InvalidInsider { reason: String },
}
