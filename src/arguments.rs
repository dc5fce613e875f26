/// Centralized argument handling for the walkthrough tools
///
/// Each tool parses its own options with clap; this module only keeps the raw
/// command line around so the logger and config loader can look for global
/// switches (`--debug-<module>`, `--verbose`, `--quiet`, `--config <path>`)
/// without threading them through every call.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Debug flags understood by the logger, without the `--debug-` prefix
pub const DEBUG_MODULES: &[&str] = &[
    "system",
    "rpc",
    "wallet",
    "transaction",
    "pool",
    "subscription",
    "config",
];

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args()
        .iter()
        .any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        if let Some(value) = arg.strip_prefix(flag).and_then(|rest| rest.strip_prefix('=')) {
            return Some(value.to_string());
        }
    }
    None
}

/// Verbose output for every module
pub fn is_verbose_enabled() -> bool {
    has_arg("--verbose") || has_arg("-v")
}

/// Only warnings and errors
pub fn is_quiet_enabled() -> bool {
    has_arg("--quiet")
}

/// Config file override passed as `--config <path>`
pub fn get_config_path_arg() -> Option<String> {
    get_arg_value("--config")
}

/// Names of all debug modules switched on for this run
pub fn get_enabled_debug_modes() -> Vec<&'static str> {
    let args = get_cmd_args();
    DEBUG_MODULES
        .iter()
        .copied()
        .filter(|module| {
            let flag = format!("--debug-{}", module);
            args.iter().any(|a| *a == flag)
        })
        .collect()
}

/// Serializes tests that rewrite the global argument list
#[cfg(test)]
pub(crate) static TEST_ARGS_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[cfg(test)]
mod tests {
    use super::*;

    fn with_args<F: FnOnce()>(args: &[&str], f: F) {
        let _guard = TEST_ARGS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_cmd_args(args.iter().map(|s| s.to_string()).collect());
        f();
    }

    #[test]
    fn test_set_and_get_args() {
        with_args(&["tool_balance", "--debug-rpc", "--address", "abc"], || {
            assert_eq!(get_cmd_args(), vec!["tool_balance", "--debug-rpc", "--address", "abc"]);
        });
    }

    #[test]
    fn test_has_arg() {
        with_args(&["tool_balance", "--debug-rpc"], || {
            assert!(has_arg("--debug-rpc"));
            assert!(!has_arg("--debug-pool"));
        });
    }

    #[test]
    fn test_get_arg_value() {
        with_args(&["tool_pool_price", "--config", "custom.toml"], || {
            assert_eq!(get_arg_value("--config"), Some("custom.toml".to_string()));
            assert_eq!(get_config_path_arg(), Some("custom.toml".to_string()));
            assert_eq!(get_arg_value("--pool"), None);
        });
    }

    #[test]
    fn test_get_arg_value_with_equals() {
        with_args(&["tool_pool_price", "--config=other.toml"], || {
            assert_eq!(get_config_path_arg(), Some("other.toml".to_string()));
        });
    }

    #[test]
    fn test_trailing_flag_has_no_value() {
        with_args(&["tool_pool_price", "--config"], || {
            assert_eq!(get_config_path_arg(), None);
        });
    }

    #[test]
    fn test_debug_flags() {
        with_args(&["tool_v0", "--debug-transaction", "--debug-subscription", "--verbose"], || {
            assert!(is_verbose_enabled());
            assert!(!is_quiet_enabled());

            let enabled = get_enabled_debug_modes();
            assert_eq!(enabled, vec!["transaction", "subscription"]);
        });
    }

    #[test]
    fn test_system_debug_flag() {
        with_args(&["tool_balance", "--debug-system", "--debug-rpc"], || {
            assert_eq!(get_enabled_debug_modes(), vec!["system", "rpc"]);
        });
    }

    #[test]
    fn test_no_debug_flags() {
        with_args(&["tool_wallet"], || {
            assert!(get_enabled_debug_modes().is_empty());
        });
    }
}
