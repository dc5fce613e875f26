/// Pool addresses, program IDs and mint decimals used by the price tools

// Mints
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

pub const SOL_DECIMALS: u8 = 9;
pub const USDC_DECIMALS: u8 = 6;

// Pool program IDs
pub const RAYDIUM_CLMM_PROGRAM_ID: &str = "CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK";

// Raydium CLMM WSOL/USDC pool watched by the price tools
pub const WSOL_USDC_CLMM_POOL: &str = "8sLbNZoA1cfnvMJLPfp98ZLAnFSYCFApfJKMbiXNLwxj";

/// Symbol for the mints the walkthrough pools trade
pub fn known_mint_symbol(mint: &str) -> Option<&'static str> {
    match mint {
        SOL_MINT => Some("SOL"),
        USDC_MINT => Some("USDC"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_mint_symbol() {
        assert_eq!(known_mint_symbol(SOL_MINT), Some("SOL"));
        assert_eq!(known_mint_symbol(USDC_MINT), Some("USDC"));
        assert_eq!(known_mint_symbol(RAYDIUM_CLMM_PROGRAM_ID), None);
    }
}
