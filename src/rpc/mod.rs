//! RPC client for the walkthrough tools
//!
//! Thin wrapper around the nonblocking `solana_client` RpcClient that binds
//! one endpoint and one commitment level (taken from config), maps SDK errors
//! into `PrimerError` and logs each call under `LogTag::Rpc`. There is no
//! retry or failover: every error is returned to the caller unchanged.

use crate::config::{with_config, RpcConfig};
use crate::errors::{PrimerError, PrimerResult};
use crate::logger::{self, LogTag};
use crate::utils::{lamports_to_sol, parse_commitment};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use solana_account_decoder::UiAccountEncoding;
use solana_account_decoder::parse_token::UiTokenAmount;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient as SolanaRpcClient;
use solana_client::rpc_client::{GetConfirmedSignaturesForAddress2Config, SerializableTransaction};
use solana_client::rpc_config::{
    RpcAccountInfoConfig, RpcProgramAccountsConfig, RpcSendTransactionConfig, RpcTransactionConfig,
};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_client::rpc_request::{RpcRequest, TokenAccountsFilter};
use solana_client::rpc_response::{
    RpcConfirmedTransactionStatusWithSignature, RpcKeyedAccount, RpcSimulateTransactionResult,
    RpcTokenAccountBalance,
};
use solana_sdk::account::Account;
use solana_sdk::address_lookup_table::state::AddressLookupTable;
use solana_sdk::message::AddressLookupTableAccount;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::{EncodedConfirmedTransactionWithStatusMeta, UiTransactionEncoding};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Size of an SPL token account
pub const TOKEN_ACCOUNT_SIZE: u64 = 165;

/// SPL token program, owner of classic token accounts
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Account snapshot together with the slot it was read at
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    pub slot: u64,
    pub account: Account,
}

pub struct PrimerRpcClient {
    client: Arc<SolanaRpcClient>,
    rpc_url: String,
    commitment: CommitmentConfig,
}

impl PrimerRpcClient {
    /// Create a client for `url` with an opaque commitment string
    pub fn new(url: &str, commitment: &str, timeout: Duration) -> PrimerResult<Self> {
        let commitment = parse_commitment(commitment)?;
        let client = SolanaRpcClient::new_with_timeout_and_commitment(url.to_string(), timeout, commitment);

        logger::debug(
            LogTag::Rpc,
            &format!("RPC client for {} (commitment {:?})", url, commitment.commitment),
        );

        Ok(Self {
            client: Arc::new(client),
            rpc_url: url.to_string(),
            commitment,
        })
    }

    pub fn from_rpc_config(rpc: &RpcConfig) -> PrimerResult<Self> {
        Self::new(&rpc.url, &rpc.commitment, Duration::from_secs(rpc.timeout_secs))
    }

    /// Create a client from the global configuration
    pub fn from_config() -> PrimerResult<Self> {
        let rpc = with_config(|cfg| cfg.rpc.clone());
        Self::from_rpc_config(&rpc)
    }

    pub fn url(&self) -> &str {
        &self.rpc_url
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    // =========================================================================
    // CHAIN STATE
    // =========================================================================

    pub async fn get_slot(&self) -> PrimerResult<u64> {
        let start = Instant::now();
        let slot = self.client.get_slot_with_commitment(self.commitment).await?;
        log_call("getSlot", start);
        Ok(slot)
    }

    pub async fn get_first_available_block(&self) -> PrimerResult<u64> {
        let start = Instant::now();
        let slot = self.client.get_first_available_block().await?;
        log_call("getFirstAvailableBlock", start);
        Ok(slot)
    }

    pub async fn get_latest_blockhash(&self) -> PrimerResult<Hash> {
        let start = Instant::now();
        let (blockhash, _last_valid_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?;
        log_call("getLatestBlockhash", start);
        Ok(blockhash)
    }

    // =========================================================================
    // ACCOUNTS
    // =========================================================================

    /// Balance in lamports
    pub async fn get_balance(&self, address: &Pubkey) -> PrimerResult<u64> {
        let start = Instant::now();
        let response = self
            .client
            .get_balance_with_commitment(address, self.commitment)
            .await?;
        log_call("getBalance", start);
        Ok(response.value)
    }

    pub async fn get_balance_sol(&self, address: &Pubkey) -> PrimerResult<f64> {
        Ok(lamports_to_sol(self.get_balance(address).await?))
    }

    /// Account with the slot of the snapshot; missing accounts are an error
    pub async fn get_account(&self, address: &Pubkey) -> PrimerResult<AccountSnapshot> {
        let start = Instant::now();
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await?;
        log_call("getAccountInfo", start);

        match response.value {
            Some(account) => {
                logger::debug(
                    LogTag::Rpc,
                    &format!(
                        "Account {} owner={} lamports={} data={} bytes slot={}",
                        address,
                        account.owner,
                        account.lamports,
                        account.data.len(),
                        response.context.slot
                    ),
                );
                Ok(AccountSnapshot {
                    slot: response.context.slot,
                    account,
                })
            }
            None => Err(PrimerError::AccountNotFound {
                address: address.to_string(),
            }),
        }
    }

    /// Raw account data bytes
    pub async fn get_account_data(&self, address: &Pubkey) -> PrimerResult<Vec<u8>> {
        Ok(self.get_account(address).await?.account.data)
    }

    pub async fn get_token_account_balance(&self, token_account: &Pubkey) -> PrimerResult<UiTokenAmount> {
        let start = Instant::now();
        let amount = self
            .client
            .get_token_account_balance_with_commitment(token_account, self.commitment)
            .await?
            .value;
        log_call("getTokenAccountBalance", start);
        Ok(amount)
    }

    pub async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> PrimerResult<Vec<RpcKeyedAccount>> {
        let start = Instant::now();
        let accounts = self
            .client
            .get_token_accounts_by_owner_with_commitment(
                owner,
                TokenAccountsFilter::Mint(*mint),
                self.commitment,
            )
            .await?
            .value;
        log_call("getTokenAccountsByOwner", start);
        Ok(accounts)
    }

    /// The 20 largest holders of a mint
    pub async fn get_token_largest_accounts(&self, mint: &Pubkey) -> PrimerResult<Vec<RpcTokenAccountBalance>> {
        let start = Instant::now();
        let accounts = self
            .client
            .get_token_largest_accounts_with_commitment(mint, self.commitment)
            .await?
            .value;
        log_call("getTokenLargestAccounts", start);
        Ok(accounts)
    }

    pub async fn get_token_supply(&self, mint: &Pubkey) -> PrimerResult<UiTokenAmount> {
        let start = Instant::now();
        let supply = self
            .client
            .get_token_supply_with_commitment(mint, self.commitment)
            .await?
            .value;
        log_call("getTokenSupply", start);
        Ok(supply)
    }

    /// Every SPL token account holding `mint`
    ///
    /// Uses the `dataSize` + `memcmp` filters so the node does the matching.
    /// Heavy on public endpoints.
    pub async fn get_token_accounts_for_mint(&self, mint: &Pubkey) -> PrimerResult<Vec<(Pubkey, Account)>> {
        let program_id = Pubkey::from_str(SPL_TOKEN_PROGRAM_ID).map_err(|e| PrimerError::InvalidPubkey {
            value: SPL_TOKEN_PROGRAM_ID.to_string(),
            reason: e.to_string(),
        })?;

        let config = RpcProgramAccountsConfig {
            filters: Some(token_accounts_for_mint_filters(mint)),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        let start = Instant::now();
        let accounts = self
            .client
            .get_program_accounts_with_config(&program_id, config)
            .await?;
        log_call("getProgramAccounts", start);
        Ok(accounts)
    }

    /// Fetch and decode an address lookup table
    pub async fn get_address_lookup_table(&self, table: &Pubkey) -> PrimerResult<AddressLookupTableAccount> {
        let snapshot = self.get_account(table).await?;
        lookup_table_account_from_data(*table, &snapshot.account.data)
    }

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    pub async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> PrimerResult<Vec<RpcConfirmedTransactionStatusWithSignature>> {
        let config = GetConfirmedSignaturesForAddress2Config {
            limit: Some(limit),
            commitment: Some(self.commitment),
            ..GetConfirmedSignaturesForAddress2Config::default()
        };

        let start = Instant::now();
        let signatures = self
            .client
            .get_signatures_for_address_with_config(address, config)
            .await?;
        log_call("getSignaturesForAddress", start);
        Ok(signatures)
    }

    /// Parsed transaction, legacy or v0
    pub async fn get_transaction(&self, signature: &Signature) -> PrimerResult<EncodedConfirmedTransactionWithStatusMeta> {
        let start = Instant::now();
        let transaction = self
            .client
            .get_transaction_with_config(signature, transaction_config(self.commitment))
            .await?;
        log_call("getTransaction", start);
        Ok(transaction)
    }

    pub async fn simulate_transaction(
        &self,
        transaction: &impl SerializableTransaction,
    ) -> PrimerResult<RpcSimulateTransactionResult> {
        let start = Instant::now();
        let result = self.client.simulate_transaction(transaction).await?.value;
        log_call("simulateTransaction", start);

        if let Some(err) = &result.err {
            logger::warning(LogTag::Rpc, &format!("Simulation failed: {}", err));
        }
        Ok(result)
    }

    /// Send and wait for the configured commitment
    pub async fn send_and_confirm_transaction(
        &self,
        transaction: &impl SerializableTransaction,
        skip_preflight: bool,
    ) -> PrimerResult<Signature> {
        let start = Instant::now();
        let signature = self
            .client
            .send_and_confirm_transaction_with_spinner_and_config(
                transaction,
                self.commitment,
                send_config(skip_preflight, self.commitment),
            )
            .await?;
        log_call("sendAndConfirmTransaction", start);
        Ok(signature)
    }

    /// Send without waiting for confirmation
    pub async fn send_transaction(
        &self,
        transaction: &impl SerializableTransaction,
        skip_preflight: bool,
    ) -> PrimerResult<Signature> {
        let start = Instant::now();
        let signature = self
            .client
            .send_transaction_with_config(transaction, send_config(skip_preflight, self.commitment))
            .await?;
        log_call("sendTransaction", start);
        Ok(signature)
    }

    /// Send already-serialized wire bytes
    pub async fn send_raw_transaction(&self, wire_transaction: &[u8], skip_preflight: bool) -> PrimerResult<Signature> {
        let encoded = general_purpose::STANDARD.encode(wire_transaction);
        self.send_encoded_transaction(&encoded, skip_preflight).await
    }

    /// Send a base64-encoded wire transaction
    pub async fn send_encoded_transaction(&self, encoded: &str, skip_preflight: bool) -> PrimerResult<Signature> {
        let start = Instant::now();
        let signature: String = self
            .client
            .send(RpcRequest::SendTransaction, send_encoded_params(encoded, skip_preflight, self.commitment))
            .await?;
        log_call("sendTransaction(base64)", start);

        Signature::from_str(&signature)
            .map_err(|e| PrimerError::Transaction(format!("Node returned invalid signature '{}': {}", signature, e)))
    }
}

/// Filters matching SPL token accounts of one mint (mint sits at offset 0)
pub fn token_accounts_for_mint_filters(mint: &Pubkey) -> Vec<RpcFilterType> {
    vec![
        RpcFilterType::DataSize(TOKEN_ACCOUNT_SIZE),
        RpcFilterType::Memcmp(Memcmp::new_base58_encoded(0, mint.as_ref())),
    ]
}

/// Transaction fetch config accepting v0 transactions
pub fn transaction_config(commitment: CommitmentConfig) -> RpcTransactionConfig {
    RpcTransactionConfig {
        encoding: Some(UiTransactionEncoding::JsonParsed),
        commitment: Some(commitment),
        max_supported_transaction_version: Some(0),
    }
}

/// Send options shared by the confirmed and fire-and-forget paths
pub fn send_config(skip_preflight: bool, commitment: CommitmentConfig) -> RpcSendTransactionConfig {
    RpcSendTransactionConfig {
        skip_preflight,
        preflight_commitment: Some(commitment.commitment),
        ..RpcSendTransactionConfig::default()
    }
}

/// Params of a `sendTransaction` call carrying a base64 wire transaction
pub fn send_encoded_params(encoded: &str, skip_preflight: bool, commitment: CommitmentConfig) -> serde_json::Value {
    json!([
        encoded,
        {
            "encoding": "base64",
            "skipPreflight": skip_preflight,
            "preflightCommitment": commitment.commitment.to_string(),
        }
    ])
}

/// Decode lookup table account data into the form message compilation uses
pub fn lookup_table_account_from_data(key: Pubkey, data: &[u8]) -> PrimerResult<AddressLookupTableAccount> {
    let table = AddressLookupTable::deserialize(data)
        .map_err(|e| PrimerError::Transaction(format!("Invalid lookup table {}: {}", key, e)))?;

    Ok(AddressLookupTableAccount {
        key,
        addresses: table.addresses.to_vec(),
    })
}

fn log_call(method: &str, start: Instant) {
    logger::debug(
        LogTag::Rpc,
        &format!("{} completed in {}ms", method, start.elapsed().as_millis()),
    );
}

/// Short description of an SDK error for log lines
pub fn describe_client_error(error: &ClientError) -> String {
    match error.get_transaction_error() {
        Some(tx_error) => format!("transaction error: {}", tx_error),
        None => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::commitment_config::CommitmentLevel;

    /// Lookup table account bytes: 56-byte bincode meta followed by addresses
    fn lookup_table_data(addresses: &[Pubkey]) -> Vec<u8> {
        let mut data = vec![0u8; 56];
        data[0..4].copy_from_slice(&1u32.to_le_bytes()); // ProgramState::LookupTable
        data[4..12].copy_from_slice(&u64::MAX.to_le_bytes()); // deactivation_slot
        for address in addresses {
            data.extend_from_slice(address.as_ref());
        }
        data
    }

    #[test]
    fn test_client_rejects_unknown_commitment() {
        let result = PrimerRpcClient::new("http://127.0.0.1:8899", "eventually", Duration::from_secs(1));
        assert!(matches!(result, Err(PrimerError::Config(_))));
    }

    #[test]
    fn test_client_keeps_url_and_commitment() {
        let client = PrimerRpcClient::new("http://127.0.0.1:8899", "finalized", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:8899");
        assert_eq!(client.commitment(), CommitmentConfig::finalized());
    }

    #[test]
    fn test_token_account_filters() {
        let mint = Pubkey::new_unique();
        let filters = token_accounts_for_mint_filters(&mint);
        assert_eq!(filters.len(), 2);
        assert!(matches!(filters[0], RpcFilterType::DataSize(165)));
        match &filters[1] {
            RpcFilterType::Memcmp(memcmp) => {
                assert_eq!(memcmp.offset(), 0);
                assert!(memcmp.bytes_match(mint.as_ref()));
            }
            other => panic!("unexpected filter {:?}", other),
        }
    }

    #[test]
    fn test_transaction_config_accepts_v0() {
        let config = transaction_config(CommitmentConfig::confirmed());
        assert_eq!(config.max_supported_transaction_version, Some(0));
        assert_eq!(config.commitment, Some(CommitmentConfig::confirmed()));
    }

    #[test]
    fn test_send_encoded_params() {
        let params = send_encoded_params("AQID", true, CommitmentConfig::confirmed());
        assert_eq!(params[0], "AQID");
        assert_eq!(params[1]["encoding"], "base64");
        assert_eq!(params[1]["skipPreflight"], true);
        assert_eq!(params[1]["preflightCommitment"], "confirmed");
    }

    #[test]
    fn test_send_config_carries_skip_preflight() {
        let config = send_config(true, CommitmentConfig::finalized());
        assert!(config.skip_preflight);
        assert_eq!(config.preflight_commitment, Some(CommitmentLevel::Finalized));

        assert!(!send_config(false, CommitmentConfig::confirmed()).skip_preflight);
    }

    #[test]
    fn test_lookup_table_from_account_data() {
        let key = Pubkey::new_unique();
        let addresses = vec![Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique()];

        let table = lookup_table_account_from_data(key, &lookup_table_data(&addresses)).unwrap();
        assert_eq!(table.key, key);
        assert_eq!(table.addresses, addresses);
    }

    #[test]
    fn test_lookup_table_rejects_garbage() {
        let key = Pubkey::new_unique();
        let err = lookup_table_account_from_data(key, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, PrimerError::Transaction(_)));
    }
}
