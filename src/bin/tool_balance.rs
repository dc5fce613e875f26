/// Balance Tool
///
/// Prints the SOL balance of an address.
///
/// Usage: cargo run --bin tool_balance -- [--address <PUBKEY>]

use anyhow::Result;
use clap::{Arg, Command};
use colored::Colorize;
use solana_primer::logger::{self, LogTag};
use solana_primer::rpc::PrimerRpcClient;
use solana_primer::tools::{startup, with_global_args};
use solana_primer::utils::parse_pubkey;

const DEFAULT_ADDRESS: &str = "CXPeim1wQMkcTvEHx9QdhgKREYYJD8bnaCCqPRwJ1to1";

#[tokio::main]
async fn main() -> Result<()> {
    let matches = with_global_args(
        Command::new("Balance Tool")
            .version("1.0")
            .about("Show the SOL balance of an address")
            .arg(
                Arg::new("address")
                    .short('a')
                    .long("address")
                    .value_name("PUBKEY")
                    .help("Address to query")
                    .default_value(DEFAULT_ADDRESS),
            ),
    )
    .get_matches();

    startup("tool_balance")?;

    let address = parse_pubkey(
        matches
            .get_one::<String>("address")
            .map(String::as_str)
            .unwrap_or(DEFAULT_ADDRESS),
    )?;

    let client = PrimerRpcClient::from_config()?;
    logger::info(LogTag::Rpc, &format!("Querying balance of {} via {}", address, client.url()));

    let sol = client.get_balance_sol(&address).await?;
    println!("{} {}", "Address:".bold(), address);
    println!("{} {} SOL", "Balance:".bold(), format!("{:.9}", sol).green());

    Ok(())
}
