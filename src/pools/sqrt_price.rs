/// Concentrated-liquidity price decoding
///
/// CLMM pools store the current price as `sqrt(price) * 2^64` (Q64.64) in a
/// 16-byte little-endian field of the pool account. The price of token 0 in
/// units of token 1 is recovered by dividing by 2^64, squaring, and shifting
/// by the decimal difference of the two mints.
///
/// The conversion goes through `f64` before squaring, so very large or very
/// small sqrt prices lose precision compared to on-chain integer math.
use crate::errors::DecodeError;
use solana_sdk::pubkey::Pubkey;

/// 2^64 as a float, the Q64.64 scaling factor
pub const Q64: f64 = 18_446_744_073_709_551_616.0;

/// Width of the sqrt-price field in bytes
pub const SQRT_PRICE_BYTES: usize = 16;

const PUBKEY_BYTES: usize = 32;

/// Byte offsets of the fields we read from a CLMM pool account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLayout {
    pub token_mint_0_offset: usize,
    pub token_mint_1_offset: usize,
    pub token_vault_0_offset: usize,
    pub token_vault_1_offset: usize,
    pub sqrt_price_offset: usize,
}

impl PoolLayout {
    /// Raydium CLMM `PoolState`:
    /// discriminator(8) bump(1) amm_config(32) owner(32) mint_0(32) mint_1(32)
    /// vault_0(32) vault_1(32) observation_key(32) decimals_0(1) decimals_1(1)
    /// tick_spacing(2) liquidity(16) sqrt_price_x64(16)
    pub const RAYDIUM_CLMM: PoolLayout = PoolLayout {
        token_mint_0_offset: 73,
        token_mint_1_offset: 105,
        token_vault_0_offset: 137,
        token_vault_1_offset: 169,
        sqrt_price_offset: 253,
    };

    /// Same layout with a different sqrt-price offset (config override)
    pub fn with_sqrt_price_offset(self, sqrt_price_offset: usize) -> Self {
        Self {
            sqrt_price_offset,
            ..self
        }
    }

    /// Smallest account length that holds every field of this layout
    pub fn min_len(&self) -> usize {
        let pubkey_end = [
            self.token_mint_0_offset,
            self.token_mint_1_offset,
            self.token_vault_0_offset,
            self.token_vault_1_offset,
        ]
        .iter()
        .map(|offset| offset + PUBKEY_BYTES)
        .max()
        .unwrap_or(0);

        pubkey_end.max(self.sqrt_price_offset + SQRT_PRICE_BYTES)
    }

    pub fn decode_price(&self, data: &[u8], decimals_a: u8, decimals_b: u8) -> Result<f64, DecodeError> {
        decode_price(data, self.sqrt_price_offset, decimals_a, decimals_b)
    }
}

/// Read the raw Q64.64 sqrt price stored at `offset`
pub fn read_sqrt_price_x64(data: &[u8], offset: usize) -> Result<u128, DecodeError> {
    let bytes = read_fixed::<SQRT_PRICE_BYTES>(data, offset)?;
    Ok(u128::from_le_bytes(bytes))
}

/// Convert a Q64.64 sqrt price into a human-readable price
///
/// `decimals_a` / `decimals_b` are the mint decimals of token 0 and token 1.
pub fn sqrt_price_x64_to_price(sqrt_price_x64: u128, decimals_a: u8, decimals_b: u8) -> f64 {
    let sqrt_price = (sqrt_price_x64 as f64) / Q64;
    let raw_price = sqrt_price * sqrt_price;
    raw_price * (10_f64).powi((decimals_a as i32) - (decimals_b as i32))
}

/// Decode the price stored at `offset` of a pool account
pub fn decode_price(data: &[u8], offset: usize, decimals_a: u8, decimals_b: u8) -> Result<f64, DecodeError> {
    let sqrt_price_x64 = read_sqrt_price_x64(data, offset)?;
    Ok(sqrt_price_x64_to_price(sqrt_price_x64, decimals_a, decimals_b))
}

/// Mints, vaults and sqrt price of a CLMM pool, read in one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClmmPoolSnapshot {
    pub token_mint_0: Pubkey,
    pub token_mint_1: Pubkey,
    pub token_vault_0: Pubkey,
    pub token_vault_1: Pubkey,
    pub sqrt_price_x64: u128,
}

impl ClmmPoolSnapshot {
    pub fn parse(data: &[u8], layout: &PoolLayout) -> Result<Self, DecodeError> {
        Ok(Self {
            token_mint_0: read_pubkey(data, layout.token_mint_0_offset)?,
            token_mint_1: read_pubkey(data, layout.token_mint_1_offset)?,
            token_vault_0: read_pubkey(data, layout.token_vault_0_offset)?,
            token_vault_1: read_pubkey(data, layout.token_vault_1_offset)?,
            sqrt_price_x64: read_sqrt_price_x64(data, layout.sqrt_price_offset)?,
        })
    }

    pub fn price(&self, decimals_a: u8, decimals_b: u8) -> f64 {
        sqrt_price_x64_to_price(self.sqrt_price_x64, decimals_a, decimals_b)
    }
}

fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey, DecodeError> {
    read_fixed::<PUBKEY_BYTES>(data, offset).map(Pubkey::new_from_array)
}

fn read_fixed<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], DecodeError> {
    let insufficient = || DecodeError::InsufficientData {
        offset,
        needed: N,
        available: data.len(),
    };

    let end = offset.checked_add(N).ok_or_else(insufficient)?;
    data.get(offset..end)
        .and_then(|slice| <[u8; N]>::try_from(slice).ok())
        .ok_or_else(insufficient)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSET: usize = 253;

    fn buffer_with_sqrt_price(offset: usize, value: u128) -> Vec<u8> {
        let mut data = vec![0u8; offset];
        data.extend_from_slice(&value.to_le_bytes());
        data
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = expected.abs().max(1.0) * 1e-12;
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_unit_sqrt_price_with_wsol_usdc_decimals() {
        let data = buffer_with_sqrt_price(OFFSET, 1u128 << 64);
        let price = decode_price(&data, OFFSET, 9, 6).unwrap();
        assert_eq!(price, 1000.0);
    }

    #[test]
    fn test_zero_sqrt_price() {
        let data = buffer_with_sqrt_price(OFFSET, 0);
        assert_eq!(decode_price(&data, OFFSET, 9, 6).unwrap(), 0.0);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let data = vec![0u8; OFFSET + 15];
        let err = decode_price(&data, OFFSET, 9, 6).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InsufficientData {
                offset: OFFSET,
                needed: 16,
                available: OFFSET + 15,
            }
        );
    }

    #[test]
    fn test_offset_overflow_is_rejected() {
        let data = vec![0u8; 32];
        assert!(matches!(
            read_sqrt_price_x64(&data, usize::MAX - 3),
            Err(DecodeError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_exact_length_buffer_is_accepted() {
        let data = buffer_with_sqrt_price(OFFSET, 1u128 << 64);
        assert_eq!(data.len(), OFFSET + SQRT_PRICE_BYTES);
        assert!(decode_price(&data, OFFSET, 6, 6).is_ok());
    }

    #[test]
    fn test_little_endian_byte_order() {
        let mut data = vec![0u8; 16];
        data[0] = 0x01;
        data[15] = 0x80;
        let value = read_sqrt_price_x64(&data, 0).unwrap();
        assert_eq!(value, (1u128 << 127) | 1);
    }

    #[test]
    fn test_matches_float_formula_for_sampled_values() {
        let samples = [
            1u128,
            12_345_678_901_234_567_890u128,
            1u128 << 64,
            (1u128 << 64) * 3 / 2,
            7_786_220_432_961_286_144u128,
            u128::MAX,
        ];

        for value in samples {
            let data = buffer_with_sqrt_price(OFFSET, value);
            let decoded = decode_price(&data, OFFSET, 6, 6).unwrap();
            let expected = ((value as f64) / Q64).powi(2);
            assert_close(decoded, expected);
        }
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let data = buffer_with_sqrt_price(OFFSET, 8_543_210_987_654_321_012u128);
        let first = decode_price(&data, OFFSET, 9, 6).unwrap();
        let second = decode_price(&data, OFFSET, 9, 6).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_swapping_decimals_inverts_scaling() {
        let data = buffer_with_sqrt_price(OFFSET, 9_000_000_000_000_000_000u128);
        let forward = decode_price(&data, OFFSET, 9, 6).unwrap();
        let swapped = decode_price(&data, OFFSET, 6, 9).unwrap();
        assert_close(forward / swapped, 1e6);
    }

    #[test]
    fn test_raydium_layout_offsets_follow_pool_state() {
        let layout = PoolLayout::RAYDIUM_CLMM;
        assert_eq!(layout.token_mint_0_offset, 8 + 1 + 32 + 32);
        assert_eq!(layout.sqrt_price_offset, 169 + 32 + 32 + 1 + 1 + 2 + 16);
        assert_eq!(layout.min_len(), 269);
    }

    #[test]
    fn test_layout_offset_override() {
        let layout = PoolLayout::RAYDIUM_CLMM.with_sqrt_price_offset(0);
        let data = buffer_with_sqrt_price(0, 1u128 << 64);
        assert_eq!(layout.decode_price(&data, 9, 6).unwrap(), 1000.0);
        assert_eq!(layout.token_vault_1_offset, 169);
    }

    #[test]
    fn test_snapshot_reads_all_fields() {
        let layout = PoolLayout::RAYDIUM_CLMM;
        let mut data = vec![0u8; layout.min_len()];
        let mint_0 = Pubkey::new_unique();
        let mint_1 = Pubkey::new_unique();
        let vault_0 = Pubkey::new_unique();
        let vault_1 = Pubkey::new_unique();

        data[73..105].copy_from_slice(mint_0.as_ref());
        data[105..137].copy_from_slice(mint_1.as_ref());
        data[137..169].copy_from_slice(vault_0.as_ref());
        data[169..201].copy_from_slice(vault_1.as_ref());
        data[253..269].copy_from_slice(&(1u128 << 64).to_le_bytes());

        let snapshot = ClmmPoolSnapshot::parse(&data, &layout).unwrap();
        assert_eq!(snapshot.token_mint_0, mint_0);
        assert_eq!(snapshot.token_mint_1, mint_1);
        assert_eq!(snapshot.token_vault_0, vault_0);
        assert_eq!(snapshot.token_vault_1, vault_1);
        assert_eq!(snapshot.price(9, 6), 1000.0);
    }

    #[test]
    fn test_snapshot_short_account() {
        let data = vec![0u8; 200];
        let err = ClmmPoolSnapshot::parse(&data, &PoolLayout::RAYDIUM_CLMM).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InsufficientData {
                offset: 169,
                needed: 32,
                available: 200,
            }
        );
    }
}
