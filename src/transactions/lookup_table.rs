/// Address lookup table program instructions
use crate::logger::{self, LogTag};
use solana_sdk::address_lookup_table::instruction::{create_lookup_table, extend_lookup_table};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

/// Instruction creating a table owned by `authority`, plus the table address
///
/// The address is derived from `authority` and `recent_slot`, which must be
/// a recent slot the cluster still knows about.
pub fn create_lookup_table_instruction(authority: &Pubkey, payer: &Pubkey, recent_slot: u64) -> (Instruction, Pubkey) {
    let (instruction, table) = create_lookup_table(*authority, *payer, recent_slot);
    logger::debug(
        LogTag::Transaction,
        &format!("Lookup table {} derived from slot {}", table, recent_slot),
    );
    (instruction, table)
}

/// Instruction appending `addresses` to an existing table
pub fn extend_lookup_table_instruction(
    table: &Pubkey,
    authority: &Pubkey,
    payer: &Pubkey,
    addresses: Vec<Pubkey>,
) -> Instruction {
    extend_lookup_table(*table, *authority, Some(*payer), addresses)
}

/// Accounts a plain transfer touches: payer, recipient and the system program
pub fn transfer_table_addresses(payer: &Pubkey, recipient: &Pubkey) -> Vec<Pubkey> {
    vec![*payer, *recipient, system_program::id()]
}
