/// Transfer Tool
///
/// Builds a legacy SOL transfer from the configured wallet, simulates it and
/// sends it in one of three ways:
///   confirm - send and wait for the configured commitment
///   raw     - send the bincode wire bytes
///   encoded - send the base64 form of the wire bytes
///
/// Usage:
///   cargo run --bin tool_transfer -- [--to <PUBKEY>] [--lamports 1000] [--cu-price 5]
///                                    [--cu-limit 200000] [--mode confirm|raw|encoded] [--simulate-only]

use anyhow::{bail, Result};
use clap::{Arg, ArgAction, Command};
use colored::Colorize;
use solana_primer::config::{get_config_clone, with_config};
use solana_primer::logger::{self, LogTag};
use solana_primer::rpc::{describe_client_error, PrimerRpcClient};
use solana_primer::tools::{report_simulation, startup, with_global_args};
use solana_primer::transactions::{
    build_legacy_transaction, encode_transaction_base64, serialize_transaction, transfer_instructions,
    ComputeBudget,
};
use solana_primer::errors::PrimerError;
use solana_primer::utils::{explorer_tx_url, parse_pubkey};
use solana_primer::wallet::load_configured_keypair;
use solana_sdk::signature::Signer;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = with_global_args(
        Command::new("Transfer Tool")
            .version("1.0")
            .about("Simulate and send a legacy SOL transfer")
            .arg(
                Arg::new("to")
                    .long("to")
                    .value_name("PUBKEY")
                    .help("Recipient (default: [transfer] recipient)"),
            )
            .arg(
                Arg::new("lamports")
                    .long("lamports")
                    .value_parser(clap::value_parser!(u64))
                    .help("Amount (default: [transfer] lamports)"),
            )
            .arg(
                Arg::new("cu-price")
                    .long("cu-price")
                    .value_parser(clap::value_parser!(u64))
                    .help("Compute unit price in micro-lamports, 0 to omit"),
            )
            .arg(
                Arg::new("cu-limit")
                    .long("cu-limit")
                    .value_parser(clap::value_parser!(u32))
                    .help("Compute unit limit, 0 to omit"),
            )
            .arg(
                Arg::new("mode")
                    .long("mode")
                    .value_parser(["confirm", "raw", "encoded"])
                    .help("How to send; every mode honors [transfer] skip_preflight")
                    .default_value("confirm"),
            )
            .arg(
                Arg::new("simulate-only")
                    .long("simulate-only")
                    .help("Stop after simulation")
                    .action(ArgAction::SetTrue),
            ),
    )
    .get_matches();

    startup("tool_transfer")?;

    let mut transfer = get_config_clone().transfer;
    if let Some(price) = matches.get_one::<u64>("cu-price") {
        transfer.cu_price_micro_lamports = *price;
    }
    if let Some(limit) = matches.get_one::<u32>("cu-limit") {
        transfer.cu_limit = *limit;
    }
    let recipient = parse_pubkey(
        matches
            .get_one::<String>("to")
            .map(String::as_str)
            .unwrap_or(&transfer.recipient),
    )?;
    let lamports = matches.get_one::<u64>("lamports").copied().unwrap_or(transfer.lamports);
    let budget = ComputeBudget::from_config(&transfer);

    let payer = load_configured_keypair()?;
    let client = PrimerRpcClient::from_config()?;

    logger::info(
        LogTag::Transaction,
        &format!(
            "Transfer {} lamports {} -> {} (cu price {:?}, cu limit {:?})",
            lamports,
            payer.pubkey(),
            recipient,
            budget.unit_price_micro_lamports,
            budget.unit_limit
        ),
    );

    let instructions = transfer_instructions(&payer.pubkey(), &recipient, lamports, &budget);
    let blockhash = client.get_latest_blockhash().await?;
    let transaction = build_legacy_transaction(&instructions, &payer, blockhash);

    report_simulation(&client.simulate_transaction(&transaction).await?)?;

    if matches.get_flag("simulate-only") {
        return Ok(());
    }

    let skip_preflight = with_config(|cfg| cfg.transfer.skip_preflight);
    let mode = matches
        .get_one::<String>("mode")
        .map(String::as_str)
        .unwrap_or("confirm");

    let sent = match mode {
        "raw" => {
            let wire = serialize_transaction(&transaction)?;
            logger::debug(LogTag::Transaction, &format!("Wire transaction is {} bytes", wire.len()));
            client.send_raw_transaction(&wire, skip_preflight).await
        }
        "encoded" => {
            let encoded = encode_transaction_base64(&transaction)?;
            client.send_encoded_transaction(&encoded, skip_preflight).await
        }
        _ => client.send_and_confirm_transaction(&transaction, skip_preflight).await,
    };

    let signature = match sent {
        Ok(signature) => signature,
        Err(PrimerError::Rpc(e)) => {
            logger::error(LogTag::Transaction, &format!("Send failed: {}", describe_client_error(&e)));
            bail!("transfer was not sent");
        }
        Err(e) => return Err(e.into()),
    };

    println!("{} {}", "Signature:".bold(), signature.to_string().green());
    println!("{}", explorer_tx_url(&signature));
    Ok(())
}
