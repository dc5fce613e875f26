/// Price records produced by the pool tools

use chrono::{ DateTime, Utc };
use solana_sdk::pubkey::Pubkey;

/// One decoded pool price, tagged with where and when it was read
#[derive(Debug, Clone)]
pub struct PoolPrice {
    /// Pool account the price was decoded from
    pub pool_address: Pubkey,
    /// Raw Q64.64 sqrt price as stored on-chain
    pub sqrt_price_x64: u128,
    /// Price of token 0 in token 1 units
    pub price: f64,
    /// Slot of the account snapshot (0 when the source did not report one)
    pub slot: u64,
    /// When this price was decoded
    pub updated_at: DateTime<Utc>,
}

impl PoolPrice {
    pub fn new(pool_address: Pubkey, sqrt_price_x64: u128, price: f64, slot: u64) -> Self {
        Self {
            pool_address,
            sqrt_price_x64,
            price,
            slot,
            updated_at: Utc::now(),
        }
    }

    /// Relative change from a previous price, in percent
    pub fn change_percent_from(&self, previous: &PoolPrice) -> Option<f64> {
        if previous.price == 0.0 {
            return None;
        }
        Some(((self.price - previous.price) / previous.price) * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_percent() {
        let pool = Pubkey::new_unique();
        let old = PoolPrice::new(pool, 1, 100.0, 10);
        let new = PoolPrice::new(pool, 1, 110.0, 11);
        let change = new.change_percent_from(&old).unwrap();
        assert!((change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_change_percent_from_zero_price() {
        let pool = Pubkey::new_unique();
        let old = PoolPrice::new(pool, 0, 0.0, 10);
        let new = PoolPrice::new(pool, 1, 1.0, 11);
        assert!(new.change_percent_from(&old).is_none());
    }
}
