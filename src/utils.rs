/// Small conversions shared by the tools
use crate::errors::{PrimerError, PrimerResult};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::str::FromStr;

/// Converts lamports to SOL amount (1 SOL = 1,000,000,000 lamports)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    (lamports as f64) / (LAMPORTS_PER_SOL as f64)
}

pub fn parse_pubkey(value: &str) -> PrimerResult<Pubkey> {
    Pubkey::from_str(value.trim()).map_err(|e| PrimerError::InvalidPubkey {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_signature(value: &str) -> PrimerResult<Signature> {
    Signature::from_str(value.trim())
        .map_err(|e| PrimerError::Transaction(format!("Invalid signature '{}': {}", value, e)))
}

/// Commitment strings are passed through to the SDK parser unchanged
pub fn parse_commitment(value: &str) -> PrimerResult<CommitmentConfig> {
    CommitmentConfig::from_str(value)
        .map_err(|e| PrimerError::Config(format!("Invalid commitment '{}': {}", value, e)))
}

/// Solscan link for a transaction signature
pub fn explorer_tx_url(signature: &Signature) -> String {
    format!("https://solscan.io/tx/{}", signature)
}
