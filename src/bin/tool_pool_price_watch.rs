/// Pool Price Watch Tool
///
/// Subscribes to a pool account over the websocket endpoint and prints the
/// decoded price on every change, starting from the current account state.
/// Ctrl-C unsubscribes and exits.
///
/// Usage: cargo run --bin tool_pool_price_watch -- [--pool <POOL_ADDRESS>]

use anyhow::Result;
use clap::{Arg, Command};
use colored::Colorize;
use solana_primer::config::get_config_clone;
use solana_primer::logger::{self, LogTag};
use solana_primer::pools::{read_sqrt_price_x64, sqrt_price_x64_to_price, PoolPrice};
use solana_primer::rpc::PrimerRpcClient;
use solana_primer::subscription::AccountSubscription;
use solana_primer::tools::{startup, with_global_args};
use solana_primer::utils::parse_pubkey;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = with_global_args(
        Command::new("Pool Price Watch Tool")
            .version("1.0")
            .about("Stream CLMM pool prices from account notifications")
            .arg(
                Arg::new("pool")
                    .short('p')
                    .long("pool")
                    .value_name("POOL_ADDRESS")
                    .help("Pool account (default: [pool] address)"),
            ),
    )
    .get_matches();

    startup("tool_pool_price_watch")?;

    let config = get_config_clone();
    let mut pool = config.pool;
    if let Some(address) = matches.get_one::<String>("pool") {
        pool.address = address.clone();
    }
    let address = parse_pubkey(&pool.address)?;
    let layout = pool.layout();

    // Baseline for the change column; the one-shot read carries no slot.
    let client = PrimerRpcClient::from_rpc_config(&config.rpc)?;
    let data = client.get_account_data(&address).await?;
    let mut previous = match read_sqrt_price_x64(&data, layout.sqrt_price_offset) {
        Ok(sqrt_price_x64) => {
            let price = sqrt_price_x64_to_price(sqrt_price_x64, pool.decimals_a, pool.decimals_b);
            println!("Current price: {}", format!("{:.6}", price).green());
            Some(PoolPrice::new(address, sqrt_price_x64, price, 0))
        }
        Err(e) => {
            logger::warning(LogTag::Pool, &format!("Initial read: {}", e));
            None
        }
    };

    let mut subscription =
        AccountSubscription::subscribe(&config.rpc.websocket_url(), &address, &config.rpc.commitment).await?;
    println!("Watching {} (Ctrl-C to stop)", address.to_string().bold());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                logger::info(LogTag::Subscription, "Interrupted, unsubscribing");
                break;
            }
            update = subscription.next() => {
                let update = match update {
                    Some(Ok(update)) => update,
                    Some(Err(e)) => {
                        logger::warning(LogTag::Subscription, &format!("Bad notification: {}", e));
                        continue;
                    }
                    None => {
                        logger::warning(LogTag::Subscription, "Subscription stream ended");
                        break;
                    }
                };

                // Notifications are independent; a short account only skips this one.
                let record = match read_sqrt_price_x64(&update.data, layout.sqrt_price_offset) {
                    Ok(sqrt_price_x64) => {
                        let price = sqrt_price_x64_to_price(sqrt_price_x64, pool.decimals_a, pool.decimals_b);
                        PoolPrice::new(address, sqrt_price_x64, price, update.slot)
                    }
                    Err(e) => {
                        logger::error(LogTag::Pool, &format!("Slot {}: {}", update.slot, e));
                        continue;
                    }
                };

                println!("Slot: {} at {}", record.slot, record.updated_at.format("%H:%M:%S%.3f"));
                println!("Raw sqrt price (Q64.64): {}", record.sqrt_price_x64);
                match previous.as_ref().and_then(|p| record.change_percent_from(p)) {
                    Some(change) => println!("Price: {} ({:+.4}%)", format!("{:.6}", record.price).green(), change),
                    None => println!("Price: {}", format!("{:.6}", record.price).green()),
                }
                println!("{}", "-".repeat(40).dimmed());
                previous = Some(record);
            }
        }
    }

    subscription.unsubscribe().await?;
    logger::flush();
    Ok(())
}
