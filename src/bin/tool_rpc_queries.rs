/// RPC Queries Tool
///
/// One subcommand per JSON-RPC query, each printing the node's answer.
///
/// Usage:
///   cargo run --bin tool_rpc_queries -- slot
///   cargo run --bin tool_rpc_queries -- balance --address <PUBKEY>
///   cargo run --bin tool_rpc_queries -- signatures --address <PUBKEY> --limit 5
///   cargo run --bin tool_rpc_queries -- program-accounts --mint <MINT>

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use colored::Colorize;
use serde::Serialize;
use solana_primer::config::with_config;
use solana_primer::pools::{USDC_MINT, WSOL_USDC_CLMM_POOL};
use solana_primer::rpc::PrimerRpcClient;
use solana_primer::tools::{startup, with_global_args};
use solana_primer::utils::{explorer_tx_url, lamports_to_sol, parse_pubkey, parse_signature};
use solana_primer::wallet::load_configured_keypair;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;

/// Program accounts printed by `program-accounts`
const PROGRAM_ACCOUNTS_SHOWN: usize = 3;

fn address_arg(default: &'static str) -> Arg {
    Arg::new("address")
        .short('a')
        .long("address")
        .value_name("PUBKEY")
        .default_value(default)
}

fn mint_arg() -> Arg {
    Arg::new("mint")
        .short('m')
        .long("mint")
        .value_name("MINT")
        .help("Token mint")
        .default_value(USDC_MINT)
}

fn build_command() -> Command {
    with_global_args(
        Command::new("RPC Queries Tool")
            .version("1.0")
            .about("Run individual Solana JSON-RPC queries")
            .subcommand_required(true)
            .subcommand(Command::new("slot").about("Current slot"))
            .subcommand(
                Command::new("balance")
                    .about("SOL balance of an address")
                    .arg(address_arg("CXPeim1wQMkcTvEHx9QdhgKREYYJD8bnaCCqPRwJ1to1")),
            )
            .subcommand(
                Command::new("token-balance")
                    .about("Balance of an SPL token account")
                    .arg(
                        Arg::new("account")
                            .long("account")
                            .value_name("TOKEN_ACCOUNT")
                            .required(true),
                    ),
            )
            .subcommand(Command::new("first-block").about("Oldest block the node still has"))
            .subcommand(Command::new("blockhash").about("Latest blockhash"))
            .subcommand(
                Command::new("account")
                    .about("Raw account info")
                    .arg(address_arg(WSOL_USDC_CLMM_POOL)),
            )
            .subcommand(
                Command::new("transaction")
                    .about("Parsed transaction (legacy or v0)")
                    .arg(
                        Arg::new("signature")
                            .short('s')
                            .long("signature")
                            .value_name("SIGNATURE")
                            .required(true),
                    ),
            )
            .subcommand(
                Command::new("signatures")
                    .about("Recent signatures involving an address")
                    .arg(address_arg(WSOL_USDC_CLMM_POOL))
                    .arg(
                        Arg::new("limit")
                            .short('l')
                            .long("limit")
                            .value_parser(clap::value_parser!(usize))
                            .default_value("10"),
                    ),
            )
            .subcommand(
                Command::new("token-accounts")
                    .about("Token accounts of an owner for one mint")
                    .arg(
                        Arg::new("owner")
                            .long("owner")
                            .value_name("PUBKEY")
                            .help("Owner (default: the configured wallet)"),
                    )
                    .arg(mint_arg()),
            )
            .subcommand(
                Command::new("largest-accounts")
                    .about("Largest holders of a mint")
                    .arg(mint_arg()),
            )
            .subcommand(Command::new("supply").about("Total supply of a mint").arg(mint_arg()))
            .subcommand(
                Command::new("program-accounts")
                    .about("SPL token accounts of a mint (dataSize + memcmp filters)")
                    .arg(mint_arg()),
            ),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_command().get_matches();
    startup("tool_rpc_queries")?;

    let client = PrimerRpcClient::from_config()?;

    match matches.subcommand() {
        Some(("slot", _)) => {
            println!("{} {}", "Slot:".bold(), client.get_slot().await?);
        }
        Some(("balance", sub)) => {
            let address = pubkey_arg(sub, "address")?;
            let lamports = client.get_balance(&address).await?;
            println!("{} {} lamports ({:.9} SOL)", "Balance:".bold(), lamports, lamports_to_sol(lamports));
        }
        Some(("token-balance", sub)) => {
            let account = pubkey_arg(sub, "account")?;
            print_json("Token balance", &client.get_token_account_balance(&account).await?)?;
        }
        Some(("first-block", _)) => {
            println!("{} {}", "First available block:".bold(), client.get_first_available_block().await?);
        }
        Some(("blockhash", _)) => {
            println!("{} {}", "Latest blockhash:".bold(), client.get_latest_blockhash().await?);
        }
        Some(("account", sub)) => {
            let address = pubkey_arg(sub, "address")?;
            let snapshot = client.get_account(&address).await?;
            println!("{} {}", "Address:".bold(), address);
            println!("{} {}", "Slot:".bold(), snapshot.slot);
            println!("{} {}", "Owner:".bold(), snapshot.account.owner);
            println!("{} {}", "Lamports:".bold(), snapshot.account.lamports);
            println!("{} {}", "Executable:".bold(), snapshot.account.executable);
            println!("{} {} bytes", "Data:".bold(), snapshot.account.data.len());
        }
        Some(("transaction", sub)) => {
            let signature = parse_signature(required(sub, "signature")?)?;
            print_json("Transaction", &client.get_transaction(&signature).await?)?;
            println!("{}", explorer_tx_url(&signature));
        }
        Some(("signatures", sub)) => {
            let address = pubkey_arg(sub, "address")?;
            let limit = sub.get_one::<usize>("limit").copied().unwrap_or(10);
            for status in client.get_signatures_for_address(&address, limit).await? {
                let state = if status.err.is_some() { "failed".red() } else { "ok".green() };
                println!("{} slot={} {}", status.signature, status.slot, state);
            }
        }
        Some(("token-accounts", sub)) => {
            let owner = match sub.get_one::<String>("owner") {
                Some(owner) => parse_pubkey(owner)?,
                None => load_configured_keypair()?.pubkey(),
            };
            let mint = pubkey_arg(sub, "mint")?;
            print_json("Token accounts", &client.get_token_accounts_by_owner(&owner, &mint).await?)?;
        }
        Some(("largest-accounts", sub)) => {
            let mint = pubkey_arg(sub, "mint")?;
            print_json("Largest accounts", &client.get_token_largest_accounts(&mint).await?)?;
        }
        Some(("supply", sub)) => {
            let mint = pubkey_arg(sub, "mint")?;
            print_json("Supply", &client.get_token_supply(&mint).await?)?;
        }
        Some(("program-accounts", sub)) => {
            let mint = pubkey_arg(sub, "mint")?;
            let accounts = client.get_token_accounts_for_mint(&mint).await?;
            println!("{} {} token accounts for {}", "Found".bold(), accounts.len(), mint);
            for (address, account) in accounts.iter().take(PROGRAM_ACCOUNTS_SHOWN) {
                println!("  {} ({} bytes, {} lamports)", address, account.data.len(), account.lamports);
            }
        }
        _ => unreachable!("subcommand_required"),
    }

    let rpc_url = with_config(|cfg| cfg.rpc.url.clone());
    println!("{}", format!("(via {})", rpc_url).dimmed());
    Ok(())
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("missing --{}", id))
}

fn pubkey_arg(matches: &ArgMatches, id: &str) -> Result<Pubkey> {
    Ok(parse_pubkey(required(matches, id)?)?)
}

fn print_json<T: Serialize>(label: &str, value: &T) -> Result<()> {
    println!("{}", format!("=== {} ===", label).bold());
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
