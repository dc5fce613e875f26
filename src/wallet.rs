/// Keypair generation, export and import
///
/// Wallet files use the Solana CLI format: a JSON array of the 64 secret key
/// bytes (32-byte seed followed by the 32-byte public key).
use crate::config::with_config;
use crate::errors::{PrimerError, PrimerResult};
use crate::logger::{self, LogTag};
use base64::{engine::general_purpose, Engine as _};
use solana_sdk::signature::{Keypair, Signer};
use std::path::Path;

/// Length of an ed25519 keypair in bytes
pub const KEYPAIR_LENGTH: usize = 64;

/// Create a fresh random keypair
pub fn generate_keypair() -> Keypair {
    let keypair = Keypair::new();
    logger::debug(LogTag::Wallet, &format!("Generated keypair {}", keypair.pubkey()));
    keypair
}

pub fn secret_key_base64(keypair: &Keypair) -> String {
    general_purpose::STANDARD.encode(keypair.to_bytes())
}

/// Base58 secret key, the format wallets such as Phantom import
pub fn secret_key_base58(keypair: &Keypair) -> String {
    bs58::encode(keypair.to_bytes()).into_string()
}

/// JSON array text for a keypair, e.g. `[12,200,...]`
pub fn keypair_to_json(keypair: &Keypair) -> PrimerResult<String> {
    Ok(serde_json::to_string(&keypair.to_bytes().to_vec())?)
}

pub fn save_keypair_json(keypair: &Keypair, path: &str) -> PrimerResult<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, keypair_to_json(keypair)?)?;
    logger::info(LogTag::Wallet, &format!("Saved keypair {} to {}", keypair.pubkey(), path));
    Ok(())
}

pub fn load_keypair_json(path: &str) -> PrimerResult<Keypair> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| PrimerError::Wallet(format!("Failed to read wallet file '{}': {}", path, e)))?;

    let bytes: Vec<u8> = serde_json::from_str(&contents)
        .map_err(|e| PrimerError::Wallet(format!("Failed to parse wallet file '{}': {}", path, e)))?;

    let keypair = keypair_from_bytes(&bytes)?;
    logger::debug(LogTag::Wallet, &format!("Loaded keypair {} from {}", keypair.pubkey(), path));
    Ok(keypair)
}

pub fn keypair_from_bytes(bytes: &[u8]) -> PrimerResult<Keypair> {
    if bytes.len() != KEYPAIR_LENGTH {
        return Err(PrimerError::Wallet(format!(
            "Invalid private key length: expected {} bytes, got {}",
            KEYPAIR_LENGTH,
            bytes.len()
        )));
    }

    Keypair::try_from(bytes)
        .map_err(|e| PrimerError::Wallet(format!("Failed to create keypair: {}", e)))
}

pub fn keypair_from_base58(private_key: &str) -> PrimerResult<Keypair> {
    let decoded = bs58::decode(private_key.trim())
        .into_vec()
        .map_err(|e| PrimerError::Wallet(format!("Failed to decode base58 private key: {}", e)))?;

    keypair_from_bytes(&decoded)
}

/// Signer configured under `[wallet] keypair_path`
pub fn load_configured_keypair() -> PrimerResult<Keypair> {
    let path = with_config(|cfg| cfg.wallet.keypair_path.clone());
    load_keypair_json(&path)
}
