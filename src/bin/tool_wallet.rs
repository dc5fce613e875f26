/// Wallet Tool
///
/// Generates a new keypair or imports a base58 private key, and writes it as
/// a JSON byte array usable by the other tools and the Solana CLI.
///
/// Usage:
///   cargo run --bin tool_wallet -- generate [--output wallet.json]
///   cargo run --bin tool_wallet -- import --private-key <BASE58> [--output wallet.json]
///   cargo run --bin tool_wallet -- show [--keypair wallet.json]

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use solana_primer::config::with_config;
use solana_primer::logger::{self, LogTag};
use solana_primer::tools::{startup, with_global_args};
use solana_primer::wallet::{
    generate_keypair, keypair_from_base58, keypair_to_json, load_keypair_json, save_keypair_json,
    secret_key_base58, secret_key_base64,
};
use solana_sdk::signature::{Keypair, Signer};

fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("PATH")
        .help("Where to write the keypair (default: configured keypair_path)")
}

fn main() -> Result<()> {
    let matches = with_global_args(
        Command::new("Wallet Tool")
            .version("1.0")
            .about("Generate, import and inspect Solana keypairs")
            .subcommand_required(true)
            .subcommand(
                Command::new("generate")
                    .about("Create a new random keypair")
                    .arg(output_arg())
                    .arg(
                        Arg::new("show-secret")
                            .long("show-secret")
                            .help("Print the secret key in base58, base64 and JSON")
                            .action(ArgAction::SetTrue),
                    ),
            )
            .subcommand(
                Command::new("import")
                    .about("Import a base58 private key (Phantom export format)")
                    .arg(
                        Arg::new("private-key")
                            .long("private-key")
                            .value_name("BASE58")
                            .help("64-byte secret key in base58")
                            .required(true),
                    )
                    .arg(output_arg()),
            )
            .subcommand(
                Command::new("show")
                    .about("Print the public key of a keypair file")
                    .arg(
                        Arg::new("keypair")
                            .short('k')
                            .long("keypair")
                            .value_name("PATH")
                            .help("Keypair file (default: configured keypair_path)"),
                    ),
            ),
    )
    .get_matches();

    startup("tool_wallet")?;

    match matches.subcommand() {
        Some(("generate", sub)) => {
            let keypair = generate_keypair();
            save(&keypair, sub)?;
            if sub.get_flag("show-secret") {
                print_secret(&keypair)?;
            }
        }
        Some(("import", sub)) => {
            let private_key = sub
                .get_one::<String>("private-key")
                .context("--private-key is required")?;
            let keypair = keypair_from_base58(private_key)?;
            save(&keypair, sub)?;
        }
        Some(("show", sub)) => {
            let path = path_or_configured(sub, "keypair");
            let keypair = load_keypair_json(&path)?;
            println!("{} {}", "Public key:".bold(), keypair.pubkey().to_string().green());
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}

fn path_or_configured(matches: &ArgMatches, id: &str) -> String {
    matches
        .get_one::<String>(id)
        .cloned()
        .unwrap_or_else(|| with_config(|cfg| cfg.wallet.keypair_path.clone()))
}

fn save(keypair: &Keypair, matches: &ArgMatches) -> Result<()> {
    let path = path_or_configured(matches, "output");
    save_keypair_json(keypair, &path).with_context(|| format!("writing {}", path))?;

    println!("{} {}", "Public key:".bold(), keypair.pubkey().to_string().green());
    println!("{} {}", "Saved to:".bold(), path);
    logger::info(LogTag::Wallet, &format!("Keypair {} written", keypair.pubkey()));
    Ok(())
}

fn print_secret(keypair: &Keypair) -> Result<()> {
    println!("\n{}", "=== SECRET KEY (keep private) ===".yellow().bold());
    println!("base58: {}", secret_key_base58(keypair));
    println!("base64: {}", secret_key_base64(keypair));
    println!("json:   {}", keypair_to_json(keypair)?);
    Ok(())
}
