/// Pool Price Tool
///
/// Fetches a concentrated-liquidity pool account once and decodes the price
/// from its Q64.64 sqrt price field.
///
/// Usage: cargo run --bin tool_pool_price -- [--pool <POOL_ADDRESS>] [--offset 253]
///                                           [--decimals-a 9] [--decimals-b 6] [--details]

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use colored::Colorize;
use solana_primer::config::get_config_clone;
use solana_primer::logger::{self, LogTag};
use solana_primer::pools::{
    known_mint_symbol, read_sqrt_price_x64, ClmmPoolSnapshot, PoolLayout, PoolPrice, RAYDIUM_CLMM_PROGRAM_ID,
};
use solana_primer::rpc::PrimerRpcClient;
use solana_primer::tools::{startup, with_global_args};
use solana_primer::utils::parse_pubkey;
use solana_sdk::pubkey::Pubkey;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = with_global_args(
        Command::new("Pool Price Tool")
            .version("1.0")
            .about("Decode a CLMM pool price from raw account data")
            .arg(
                Arg::new("pool")
                    .short('p')
                    .long("pool")
                    .value_name("POOL_ADDRESS")
                    .help("Pool account (default: [pool] address)"),
            )
            .arg(
                Arg::new("offset")
                    .long("offset")
                    .value_parser(clap::value_parser!(usize))
                    .help("Byte offset of the sqrt price field"),
            )
            .arg(Arg::new("decimals-a").long("decimals-a").value_parser(clap::value_parser!(u8)))
            .arg(Arg::new("decimals-b").long("decimals-b").value_parser(clap::value_parser!(u8)))
            .arg(
                Arg::new("details")
                    .short('d')
                    .long("details")
                    .help("Also print the pool mints and vaults")
                    .action(ArgAction::SetTrue),
            ),
    )
    .get_matches();

    startup("tool_pool_price")?;

    let mut pool = get_config_clone().pool;
    if let Some(address) = matches.get_one::<String>("pool") {
        pool.address = address.clone();
    }
    if let Some(offset) = matches.get_one::<usize>("offset") {
        pool.sqrt_price_offset = *offset;
    }
    if let Some(decimals) = matches.get_one::<u8>("decimals-a") {
        pool.decimals_a = *decimals;
    }
    if let Some(decimals) = matches.get_one::<u8>("decimals-b") {
        pool.decimals_b = *decimals;
    }

    let address = parse_pubkey(&pool.address)?;
    let layout = pool.layout();
    let client = PrimerRpcClient::from_config()?;

    let snapshot = client.get_account(&address).await?;
    let data = &snapshot.account.data;
    logger::info(
        LogTag::Pool,
        &format!("Pool {} data length: {} bytes (slot {})", address, data.len(), snapshot.slot),
    );
    if snapshot.account.owner.to_string() != RAYDIUM_CLMM_PROGRAM_ID {
        logger::warning(
            LogTag::Pool,
            &format!("Pool is owned by {}, not the Raydium CLMM program; offsets may not apply", snapshot.account.owner),
        );
    }

    let sqrt_price_x64 = read_sqrt_price_x64(data, layout.sqrt_price_offset)?;
    let price = layout.decode_price(data, pool.decimals_a, pool.decimals_b)?;
    let record = PoolPrice::new(address, sqrt_price_x64, price, snapshot.slot);

    println!("\n{}", "=== POOL PRICE ===".bold());
    println!("Pool Address: {}", record.pool_address);
    println!("Slot: {}", record.slot);
    println!("Raw sqrt price (Q64.64): {}", record.sqrt_price_x64);
    println!("Price: {}", format!("{:.6}", record.price).green());

    if matches.get_flag("details") {
        print_details(data, &layout)?;
    }
    Ok(())
}

fn print_details(data: &[u8], layout: &PoolLayout) -> Result<()> {
    let parsed = ClmmPoolSnapshot::parse(data, layout)?;
    println!("\n{}", "=== POOL ACCOUNTS ===".bold());
    println!("Token mint 0: {}", mint_line(&parsed.token_mint_0));
    println!("Token mint 1: {}", mint_line(&parsed.token_mint_1));
    println!("Token vault 0: {}", parsed.token_vault_0);
    println!("Token vault 1: {}", parsed.token_vault_1);
    Ok(())
}

fn mint_line(mint: &Pubkey) -> String {
    let mint = mint.to_string();
    match known_mint_symbol(&mint) {
        Some(symbol) => format!("{} ({})", mint, symbol),
        None => mint,
    }
}
