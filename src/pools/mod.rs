//! Pool price decoding
//!
//! Fixed-offset decoders for concentrated-liquidity pool accounts plus the
//! pool constants the price tools default to.

pub mod constants;
pub mod sqrt_price;
pub mod types;

// Re-export main components
pub use constants::*;
pub use sqrt_price::{
    decode_price,
    read_sqrt_price_x64,
    sqrt_price_x64_to_price,
    ClmmPoolSnapshot,
    PoolLayout,
};
pub use types::PoolPrice;
