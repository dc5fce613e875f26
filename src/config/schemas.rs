use crate::config_struct;
use crate::pools::constants::{SOL_DECIMALS, USDC_DECIMALS, WSOL_USDC_CLMM_POOL};
use crate::pools::PoolLayout;

// ============================================================================
// RPC
// ============================================================================

config_struct! {
    /// RPC endpoint settings
    pub struct RpcConfig {
        /// HTTP JSON-RPC endpoint
        url: String = "https://api.mainnet-beta.solana.com".to_string(),
        /// Websocket endpoint; derived from `url` when empty
        ws_url: String = String::new(),
        /// Commitment passed through to every request ("processed", "confirmed", "finalized")
        commitment: String = "confirmed".to_string(),
        /// Request timeout (seconds)
        timeout_secs: u64 = 30,
    }
}

impl RpcConfig {
    /// Websocket URL for subscriptions
    ///
    /// Uses `ws_url` when set, otherwise swaps the HTTP scheme of `url`
    /// (`https` -> `wss`, `http` -> `ws`).
    pub fn websocket_url(&self) -> String {
        if !self.ws_url.is_empty() {
            return self.ws_url.clone();
        }

        if let Some(rest) = self.url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.url.clone()
        }
    }
}

// ============================================================================
// WALLET
// ============================================================================

config_struct! {
    /// Local signer settings
    pub struct WalletConfig {
        /// JSON file holding the 64 secret key bytes as an array
        keypair_path: String = "wallet.json".to_string(),
    }
}

// ============================================================================
// TRANSFER
// ============================================================================

config_struct! {
    /// Defaults for the transfer demos
    pub struct TransferConfig {
        /// Recipient of the demo transfers
        recipient: String = "buffaAJKmNLao65TDTUGq8oB9HgxkfPLGqPMFQapotJ".to_string(),
        /// Amount per transfer
        lamports: u64 = 1000,
        /// Compute unit price in micro-lamports, 0 leaves it unset
        cu_price_micro_lamports: u64 = 5,
        /// Compute unit limit, 0 leaves it unset
        cu_limit: u32 = 0,
        /// Skip preflight simulation on the node when sending
        skip_preflight: bool = false,
    }
}

// ============================================================================
// POOL
// ============================================================================

config_struct! {
    /// Pool watched by the price tools
    pub struct PoolConfig {
        /// CLMM pool account
        address: String = WSOL_USDC_CLMM_POOL.to_string(),
        /// Byte offset of the Q64.64 sqrt price in the pool account
        sqrt_price_offset: usize = PoolLayout::RAYDIUM_CLMM.sqrt_price_offset,
        /// Decimals of token 0
        decimals_a: u8 = SOL_DECIMALS,
        /// Decimals of token 1
        decimals_b: u8 = USDC_DECIMALS,
    }
}

impl PoolConfig {
    pub fn layout(&self) -> PoolLayout {
        PoolLayout::RAYDIUM_CLMM.with_sqrt_price_offset(self.sqrt_price_offset)
    }
}

// ============================================================================
// LOOKUP TABLE
// ============================================================================

config_struct! {
    /// Address lookup table used by the versioned transaction demo
    pub struct LookupTableConfig {
        /// Existing table address, empty when none has been created yet
        address: String = String::new(),
    }
}

// ============================================================================
// LOGGING
// ============================================================================

config_struct! {
    pub struct LoggingConfig {
        /// Mirror console logs to this file, empty disables file logging
        file_path: String = String::new(),
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sections
    pub struct Config {
        rpc: RpcConfig = RpcConfig::default(),
        wallet: WalletConfig = WalletConfig::default(),
        transfer: TransferConfig = TransferConfig::default(),
        pool: PoolConfig = PoolConfig::default(),
        lookup_table: LookupTableConfig = LookupTableConfig::default(),
        logging: LoggingConfig = LoggingConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_url_from_https() {
        let rpc = RpcConfig::default();
        assert_eq!(rpc.websocket_url(), "wss://api.mainnet-beta.solana.com");
    }

    #[test]
    fn test_websocket_url_from_http() {
        let rpc = RpcConfig {
            url: "http://127.0.0.1:8899".to_string(),
            ..RpcConfig::default()
        };
        assert_eq!(rpc.websocket_url(), "ws://127.0.0.1:8899");
    }

    #[test]
    fn test_explicit_websocket_url_wins() {
        let rpc = RpcConfig {
            ws_url: "ws://127.0.0.1:8900".to_string(),
            ..RpcConfig::default()
        };
        assert_eq!(rpc.websocket_url(), "ws://127.0.0.1:8900");
    }

    #[test]
    fn test_pool_layout_uses_configured_offset() {
        let pool = PoolConfig {
            sqrt_price_offset: 100,
            ..PoolConfig::default()
        };
        assert_eq!(pool.layout().sqrt_price_offset, 100);
        assert_eq!(PoolConfig::default().layout(), PoolLayout::RAYDIUM_CLMM);
    }
}
