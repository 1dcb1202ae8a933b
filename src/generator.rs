// 2.0 generator.rs: randomized daily order flow around the previous close.
// buyers quote below the reference and sellers above it, so the spread is
// structural in expectation while single orders can still cross.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::book::DayBook;
use crate::config::{ConfigError, MarketParams};
use crate::types::{Order, OrderId, Side};

/// Unsorted orders as drawn, in arrival order. the insider injector edits
/// these before they are sorted into a `DayBook`.
#[derive(Debug, Clone, Default)]
pub struct GeneratedOrders {
    pub buyers: Vec<Order>,
    pub sellers: Vec<Order>,
}

impl GeneratedOrders {
    pub fn side_mut(&mut self, side: Side) -> &mut Vec<Order> {
        match side {
            Side::Buy => &mut self.buyers,
            Side::Sell => &mut self.sellers,
        }
    }

    pub fn into_book(self) -> DayBook {
        DayBook::new(self.buyers, self.sellers)
    }
}

#[derive(Debug, Clone)]
pub struct OrderBookGenerator {
    params: MarketParams,
    noise: Normal<f64>,
}

impl OrderBookGenerator {
    pub fn new(params: MarketParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let noise = Normal::new(0.0, params.price_noise_std).map_err(|e| ConfigError::InvalidMarket {
            reason: e.to_string(),
        })?;
        Ok(Self { params, noise })
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    /// Draw the day's orders without sorting them. buyers are drawn first,
    /// then sellers; ids are assigned in that order starting at 1.
    pub fn generate_orders<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        num_buyers: usize,
        num_sellers: usize,
        reference_price: f64,
    ) -> GeneratedOrders {
        let mut next_id = 1u32;
        let mut draw_side = |rng: &mut R, side: Side, count: usize| -> Vec<Order> {
            (0..count)
                .map(|_| {
                    let order = self.draw(rng, OrderId(next_id), side, reference_price);
                    next_id += 1;
                    order
                })
                .collect()
        };

        let buyers = draw_side(&mut *rng, Side::Buy, num_buyers);
        let sellers = draw_side(&mut *rng, Side::Sell, num_sellers);
        GeneratedOrders { buyers, sellers }
    }

    /// Draw and sort a full day's book.
    pub fn generate_book<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        num_buyers: usize,
        num_sellers: usize,
        reference_price: f64,
    ) -> DayBook {
        self.generate_orders(rng, num_buyers, num_sellers, reference_price)
            .into_book()
    }

    // price = ref ∓ U{min..=max} + N(0, σ²), quantity = U{qmin..=qmax}
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R, id: OrderId, side: Side, reference_price: f64) -> Order {
        let discount = rng.gen_range(self.params.discount_min..=self.params.discount_max) as f64;
        let noise = self.noise.sample(rng);
        let price = reference_price - side.sign() * discount + noise;
        let quantity = rng.gen_range(self.params.quantity_min..=self.params.quantity_max) as f64;
        Order::new(id, side, price, quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn counts_and_sides_match_request() {
        let generator = OrderBookGenerator::new(MarketParams::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let orders = generator.generate_orders(&mut rng, 12, 9, 100.0);

        assert_eq!(orders.buyers.len(), 12);
        assert_eq!(orders.sellers.len(), 9);
        assert!(orders.buyers.iter().all(|o| o.side == Side::Buy));
        assert!(orders.sellers.iter().all(|o| o.side == Side::Sell));
    }

    #[test]
    fn ids_are_unique_and_sequential() {
        let generator = OrderBookGenerator::new(MarketParams::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let orders = generator.generate_orders(&mut rng, 3, 2, 100.0);

        let ids: Vec<u32> = orders.buyers.iter().chain(&orders.sellers).map(|o| o.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn quantities_stay_in_range() {
        let generator = OrderBookGenerator::new(MarketParams::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let book = generator.generate_book(&mut rng, 200, 200, 100.0);

        for order in book.buyers().iter().chain(book.sellers()) {
            assert!(order.quantity >= 100.0 && order.quantity <= 1000.0);
            assert_eq!(order.quantity.fract(), 0.0);
        }
    }

    #[test]
    fn noiseless_prices_are_offset_by_discount() {
        let params = MarketParams {
            price_noise_std: 0.0,
            ..MarketParams::default()
        };
        let generator = OrderBookGenerator::new(params).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let book = generator.generate_book(&mut rng, 50, 50, 100.0);

        for order in book.buyers() {
            assert!(order.price >= 94.0 && order.price <= 97.0);
        }
        for order in book.sellers() {
            assert!(order.price >= 103.0 && order.price <= 106.0);
        }
        assert!(!book.is_crossed());
    }

    #[test]
    fn zero_participants_is_allowed() {
        let generator = OrderBookGenerator::new(MarketParams::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let book = generator.generate_book(&mut rng, 0, 10, 100.0);

        assert!(book.buyers().is_empty());
        assert_eq!(book.sellers().len(), 10);
    }

    #[test]
    fn same_seed_same_book() {
        let generator = OrderBookGenerator::new(MarketParams::default()).unwrap();
        let a = generator.generate_book(&mut ChaCha8Rng::seed_from_u64(99), 20, 20, 100.0);
        let b = generator.generate_book(&mut ChaCha8Rng::seed_from_u64(99), 20, 20, 100.0);

        assert_eq!(a.buyers(), b.buyers());
        assert_eq!(a.sellers(), b.sellers());
    }
}
