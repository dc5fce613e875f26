//! Transaction building for the transfer and versioned transaction tools
//!
//! Legacy transactions compile the account list into the message itself; v0
//! messages may resolve accounts through address lookup tables instead.
//! Everything here is pure: blockhashes and lookup tables are fetched by the
//! caller through `PrimerRpcClient`.

pub mod lookup_table;

pub use lookup_table::{
    create_lookup_table_instruction, extend_lookup_table_instruction, transfer_table_addresses,
};

use crate::config::TransferConfig;
use crate::errors::{PrimerError, PrimerResult};
use crate::logger::{self, LogTag};
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    hash::Hash,
    instruction::Instruction,
    message::{v0::Message as MessageV0, AddressLookupTableAccount, Message, VersionedMessage},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
    transaction::{Transaction, VersionedTransaction},
};

/// Optional compute budget instructions prepended to a transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComputeBudget {
    pub unit_price_micro_lamports: Option<u64>,
    pub unit_limit: Option<u32>,
}

impl ComputeBudget {
    /// Zero values in config mean "leave unset"
    pub fn from_config(transfer: &TransferConfig) -> Self {
        Self {
            unit_price_micro_lamports: Some(transfer.cu_price_micro_lamports).filter(|p| *p > 0),
            unit_limit: Some(transfer.cu_limit).filter(|l| *l > 0),
        }
    }

    pub fn instructions(&self) -> Vec<Instruction> {
        let mut instructions = Vec::with_capacity(2);
        if let Some(limit) = self.unit_limit {
            instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(limit));
        }
        if let Some(price) = self.unit_price_micro_lamports {
            instructions.push(ComputeBudgetInstruction::set_compute_unit_price(price));
        }
        instructions
    }
}

/// Compute budget instructions followed by a system transfer
pub fn transfer_instructions(from: &Pubkey, to: &Pubkey, lamports: u64, budget: &ComputeBudget) -> Vec<Instruction> {
    let mut instructions = budget.instructions();
    instructions.push(system_instruction::transfer(from, to, lamports));
    instructions
}

/// Signed legacy transaction, fee paid by `payer`
pub fn build_legacy_transaction(instructions: &[Instruction], payer: &Keypair, recent_blockhash: Hash) -> Transaction {
    let message = Message::new_with_blockhash(instructions, Some(&payer.pubkey()), &recent_blockhash);
    let mut transaction = Transaction::new_unsigned(message);
    transaction.sign(&[payer], recent_blockhash);

    logger::debug(
        LogTag::Transaction,
        &format!(
            "Built legacy transaction with {} instructions, {} accounts",
            instructions.len(),
            transaction.message.account_keys.len()
        ),
    );
    transaction
}

/// Signed v0 transaction; accounts found in `lookup_tables` are referenced by index
pub fn build_v0_transaction(
    instructions: &[Instruction],
    payer: &Keypair,
    lookup_tables: &[AddressLookupTableAccount],
    recent_blockhash: Hash,
) -> PrimerResult<VersionedTransaction> {
    let message = MessageV0::try_compile(&payer.pubkey(), instructions, lookup_tables, recent_blockhash)
        .map_err(|e| PrimerError::Transaction(format!("Failed to compile v0 message: {}", e)))?;

    logger::debug(
        LogTag::Transaction,
        &format!(
            "Compiled v0 message: {} static accounts, {} table lookups",
            message.account_keys.len(),
            message.address_table_lookups.len()
        ),
    );

    VersionedTransaction::try_new(VersionedMessage::V0(message), &[payer])
        .map_err(|e| PrimerError::Transaction(format!("Failed to sign v0 transaction: {}", e)))
}

/// Wire bytes of a signed transaction
pub fn serialize_transaction<T: Serialize>(transaction: &T) -> PrimerResult<Vec<u8>> {
    bincode::serialize(transaction)
        .map_err(|e| PrimerError::Transaction(format!("Failed to serialize transaction: {}", e)))
}

/// Base64 wire form accepted by `sendTransaction`
pub fn encode_transaction_base64<T: Serialize>(transaction: &T) -> PrimerResult<String> {
    Ok(general_purpose::STANDARD.encode(serialize_transaction(transaction)?))
}
