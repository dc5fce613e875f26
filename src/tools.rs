/// Startup shared by the `tool_*` binaries
use crate::arguments::DEBUG_MODULES;
use crate::config::{load_config, with_config};
use crate::errors::{PrimerError, PrimerResult};
use crate::logger::{self, LogTag};
use clap::{Arg, ArgAction, Command};
use colored::Colorize;
use solana_client::rpc_response::RpcSimulateTransactionResult;

/// Register the switches read through `arguments` so clap accepts them
pub fn with_global_args(mut command: Command) -> Command {
    command = command
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Config file (default data/config.toml)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show verbose logs")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Only show warnings and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        );

    for module in DEBUG_MODULES {
        let id = format!("debug-{}", module);
        command = command.arg(
            Arg::new(id.clone())
                .long(id)
                .help(format!("Debug logs for {}", module))
                .action(ArgAction::SetTrue)
                .global(true),
        );
    }
    command
}

/// Initialize logging and load the config file
pub fn startup(tool: &str) -> PrimerResult<()> {
    logger::init();
    load_config()?;

    let log_file = with_config(|cfg| cfg.logging.file_path.clone());
    if !log_file.is_empty() {
        logger::init_file_logging(&log_file);
    }

    let rpc_url = with_config(|cfg| cfg.rpc.url.clone());
    logger::debug(LogTag::System, &format!("{} starting against {}", tool, rpc_url));
    Ok(())
}

/// Print a simulation result; a failed simulation is returned as an error
pub fn report_simulation(simulation: &RpcSimulateTransactionResult) -> PrimerResult<()> {
    println!("{}", "=== SIMULATION ===".bold());
    println!("Compute units: {:?}", simulation.units_consumed);
    for line in simulation.logs.iter().flatten() {
        println!("  {}", line.dimmed());
    }

    if let Some(err) = &simulation.err {
        return Err(PrimerError::Transaction(format!("Simulation failed: {:?}", err)));
    }
    println!("{}", "Simulation succeeded".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args_are_accepted() {
        let command = with_global_args(Command::new("tool").subcommand(Command::new("run")));
        let matches = command
            .try_get_matches_from(["tool", "run", "--debug-rpc", "--config", "x.toml", "-v"])
            .unwrap();

        let (_, sub) = matches.subcommand().unwrap();
        assert!(sub.get_flag("debug-rpc"));
        assert!(sub.get_flag("verbose"));
        assert_eq!(sub.get_one::<String>("config").map(String::as_str), Some("x.toml"));
    }

    #[test]
    fn test_every_debug_module_has_a_flag() {
        let matches = with_global_args(Command::new("tool"))
            .try_get_matches_from(["tool", "--debug-system", "--debug-subscription"])
            .unwrap();

        assert!(matches.get_flag("debug-system"));
        assert!(matches.get_flag("debug-subscription"));
        assert!(!matches.get_flag("debug-pool"));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let command = with_global_args(Command::new("tool"));
        assert!(command.try_get_matches_from(["tool", "--debug-everything"]).is_err());
    }
}
