/// Error types shared by the library and the walkthrough tools
///
/// Decoding failures are kept in their own small enum so the price decoder
/// stays independent of the RPC stack. Everything else funnels into
/// `PrimerError`, which binaries usually lift into `anyhow::Error`.
use solana_client::client_error::ClientError;
use thiserror::Error;

/// Failures of the fixed-offset account decoders
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("insufficient account data: need {needed} bytes at offset {offset}, have {available}")]
    InsufficientData {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

#[derive(Debug, Error)]
pub enum PrimerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] ClientError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Invalid public key '{value}': {reason}")]
    InvalidPubkey { value: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PrimerError {
    /// Errors raised before any network call was made
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            PrimerError::Config(_)
                | PrimerError::Wallet(_)
                | PrimerError::Decode(_)
                | PrimerError::InvalidPubkey { .. }
                | PrimerError::Io(_)
                | PrimerError::Serialization(_)
        )
    }
}

pub type PrimerResult<T> = std::result::Result<T, PrimerError>;
