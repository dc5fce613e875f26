/// Versioned Transaction Tool
///
/// Sends v0 transfers (optionally resolving the recipient through an address
/// lookup table), creates and extends lookup tables, and fetches parsed v0
/// transactions. Every transaction is simulated first and then sent without
/// waiting, unless `--confirm` is given.
///
/// Usage:
///   cargo run --bin tool_v0 -- transfer [--lookup-table <ADDRESS>] [--simulate-only] [--confirm]
///   cargo run --bin tool_v0 -- create-alt [--save-config]
///   cargo run --bin tool_v0 -- extend-alt --lookup-table <ADDRESS> [--address <PUBKEY>...]
///   cargo run --bin tool_v0 -- parse-tx --signature <SIGNATURE>

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use solana_primer::config::{get_config_clone, resolve_config_path, save_config, with_config};
use solana_primer::logger::{self, LogTag};
use solana_primer::rpc::PrimerRpcClient;
use solana_primer::tools::{report_simulation, startup, with_global_args};
use solana_primer::transactions::{
    build_v0_transaction, create_lookup_table_instruction, extend_lookup_table_instruction,
    transfer_instructions, transfer_table_addresses, ComputeBudget,
};
use solana_primer::utils::{explorer_tx_url, parse_pubkey, parse_signature};
use solana_primer::wallet::load_configured_keypair;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::VersionedTransaction;

fn lookup_table_arg() -> Arg {
    Arg::new("lookup-table")
        .long("lookup-table")
        .value_name("ADDRESS")
        .help("Lookup table (default: [lookup_table] address)")
}

/// Options shared by the subcommands that send a transaction
fn send_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("simulate-only")
                .long("simulate-only")
                .help("Stop after simulation")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("confirm")
                .long("confirm")
                .help("Wait for the configured commitment after sending")
                .action(ArgAction::SetTrue),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = with_global_args(
        Command::new("Versioned Transaction Tool")
            .version("1.0")
            .about("v0 transactions and address lookup tables")
            .subcommand_required(true)
            .subcommand(send_args(
                Command::new("transfer")
                    .about("Send a v0 transfer to the configured recipient")
                    .arg(lookup_table_arg()),
            ))
            .subcommand(send_args(
                Command::new("create-alt")
                    .about("Create a lookup table owned by the wallet")
                    .arg(
                        Arg::new("save-config")
                            .long("save-config")
                            .help("Write the new table address into the config file")
                            .action(ArgAction::SetTrue),
                    ),
            ))
            .subcommand(send_args(
                Command::new("extend-alt")
                    .about("Append addresses to a lookup table")
                    .arg(lookup_table_arg())
                    .arg(
                        Arg::new("address")
                            .long("address")
                            .value_name("PUBKEY")
                            .help("Address to add (default: payer, recipient and the system program)")
                            .action(ArgAction::Append),
                    ),
            ))
            .subcommand(
                Command::new("parse-tx")
                    .about("Fetch a transaction with v0 support")
                    .arg(
                        Arg::new("signature")
                            .short('s')
                            .long("signature")
                            .value_name("SIGNATURE")
                            .required(true),
                    ),
            ),
    )
    .get_matches();

    startup("tool_v0")?;
    let client = PrimerRpcClient::from_config()?;

    match matches.subcommand() {
        Some(("transfer", sub)) => transfer(&client, sub).await,
        Some(("create-alt", sub)) => create_alt(&client, sub).await,
        Some(("extend-alt", sub)) => extend_alt(&client, sub).await,
        Some(("parse-tx", sub)) => {
            let signature = parse_signature(
                sub.get_one::<String>("signature")
                    .context("--signature is required")?,
            )?;
            let transaction = client.get_transaction(&signature).await?;
            println!("{}", serde_json::to_string_pretty(&transaction)?);
            println!("{} {:?}", "Version:".bold(), transaction.transaction.version);
            Ok(())
        }
        _ => unreachable!("subcommand_required"),
    }
}

fn lookup_table_address(matches: &ArgMatches) -> Result<Option<Pubkey>> {
    let value = matches
        .get_one::<String>("lookup-table")
        .cloned()
        .unwrap_or_else(|| with_config(|cfg| cfg.lookup_table.address.clone()));

    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(parse_pubkey(&value)?))
}

async fn transfer(client: &PrimerRpcClient, matches: &ArgMatches) -> Result<()> {
    let transfer = get_config_clone().transfer;
    let payer = load_configured_keypair()?;
    let recipient = parse_pubkey(&transfer.recipient)?;

    let lookup_tables = match lookup_table_address(matches)? {
        Some(table) => {
            let account = client.get_address_lookup_table(&table).await?;
            logger::info(
                LogTag::Transaction,
                &format!("Using lookup table {} with {} addresses", table, account.addresses.len()),
            );
            vec![account]
        }
        None => Vec::new(),
    };

    let instructions = transfer_instructions(
        &payer.pubkey(),
        &recipient,
        transfer.lamports,
        &ComputeBudget::from_config(&transfer),
    );
    let blockhash = client.get_latest_blockhash().await?;
    let transaction = build_v0_transaction(&instructions, &payer, &lookup_tables, blockhash)?;

    simulate_and_send(client, &transaction, matches).await
}

async fn create_alt(client: &PrimerRpcClient, matches: &ArgMatches) -> Result<()> {
    let payer = load_configured_keypair()?;
    let recent_slot = client.get_slot().await?;
    let (instruction, table) = create_lookup_table_instruction(&payer.pubkey(), &payer.pubkey(), recent_slot);
    println!("{} {}", "Lookup table:".bold(), table.to_string().green());

    let transaction = build_without_tables(client, &payer, vec![instruction]).await?;
    simulate_and_send(client, &transaction, matches).await?;

    if matches.get_flag("simulate-only") {
        return Ok(());
    }
    if matches.get_flag("save-config") {
        let path = resolve_config_path();
        let mut config = get_config_clone();
        config.lookup_table.address = table.to_string();
        save_config(&config, &path)?;
        println!("Saved [lookup_table] address to {}", path);
    } else {
        println!("Set [lookup_table] address in the config file to reuse it.");
    }
    Ok(())
}

async fn extend_alt(client: &PrimerRpcClient, matches: &ArgMatches) -> Result<()> {
    let table = lookup_table_address(matches)?
        .context("no lookup table given and none configured")?;
    let payer = load_configured_keypair()?;

    let addresses = match matches.get_many::<String>("address") {
        Some(values) => values
            .map(|value| parse_pubkey(value))
            .collect::<Result<Vec<_>, _>>()?,
        None => {
            let recipient = parse_pubkey(&with_config(|cfg| cfg.transfer.recipient.clone()))?;
            transfer_table_addresses(&payer.pubkey(), &recipient)
        }
    };

    logger::info(
        LogTag::Transaction,
        &format!("Extending {} with {} addresses", table, addresses.len()),
    );
    let instruction = extend_lookup_table_instruction(&table, &payer.pubkey(), &payer.pubkey(), addresses);
    let transaction = build_without_tables(client, &payer, vec![instruction]).await?;
    simulate_and_send(client, &transaction, matches).await
}

/// Lookup table program calls go out as v0 transactions without tables
async fn build_without_tables(
    client: &PrimerRpcClient,
    payer: &Keypair,
    instructions: Vec<Instruction>,
) -> Result<VersionedTransaction> {
    let blockhash = client.get_latest_blockhash().await?;
    Ok(build_v0_transaction(&instructions, payer, &[], blockhash)?)
}

async fn simulate_and_send(
    client: &PrimerRpcClient,
    transaction: &VersionedTransaction,
    matches: &ArgMatches,
) -> Result<()> {
    report_simulation(&client.simulate_transaction(transaction).await?)?;
    if matches.get_flag("simulate-only") {
        return Ok(());
    }

    let skip_preflight = with_config(|cfg| cfg.transfer.skip_preflight);
    let signature = if matches.get_flag("confirm") {
        client.send_and_confirm_transaction(transaction, skip_preflight).await?
    } else {
        client.send_transaction(transaction, skip_preflight).await?
    };
    print_signature(&signature);
    Ok(())
}

fn print_signature(signature: &Signature) {
    println!("{} {}", "Signature:".bold(), signature.to_string().green());
    println!("{}", explorer_tx_url(signature));
}
