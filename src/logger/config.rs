/// Runtime logger configuration
///
/// Built from the command line once at startup and consulted on every log
/// call. Tests and tools may replace it wholesale.
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::{get_enabled_debug_modes, is_quiet_enabled, is_verbose_enabled};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Highest level that is printed
    pub min_level: LogLevel,
    /// Tags with debug output enabled (debug keys)
    pub debug_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Debug,
            debug_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> = Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Snapshot of the current configuration
pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Rebuild the configuration from the global command line
pub fn init_from_args() {
    let min_level = if is_quiet_enabled() {
        LogLevel::Warning
    } else if is_verbose_enabled() {
        LogLevel::Verbose
    } else {
        LogLevel::Debug
    };

    let debug_tags = get_enabled_debug_modes()
        .into_iter()
        .map(|module| module.to_string())
        .collect();

    set_logger_config(LoggerConfig {
        min_level,
        debug_tags,
    });
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    config.min_level == LogLevel::Verbose || config.debug_tags.contains(&tag.to_debug_key())
}

#[cfg(test)]
pub(crate) static TEST_LOGGER_LOCK: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::{set_cmd_args, TEST_ARGS_LOCK};

    #[test]
    fn test_init_from_args_collects_debug_tags() {
        let _args = TEST_ARGS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let _logger = TEST_LOGGER_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        set_cmd_args(vec!["tool_pool_price".to_string(), "--debug-pool".to_string()]);
        init_from_args();

        let config = get_logger_config();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(is_debug_enabled_for_tag(&LogTag::Pool));
        assert!(!is_debug_enabled_for_tag(&LogTag::Rpc));
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        let _args = TEST_ARGS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let _logger = TEST_LOGGER_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        set_cmd_args(
            vec!["tool_balance".to_string(), "--quiet".to_string(), "--verbose".to_string()]
        );
        init_from_args();

        assert_eq!(get_logger_config().min_level, LogLevel::Warning);
    }

    #[test]
    fn test_verbose_enables_every_debug_tag() {
        let _logger = TEST_LOGGER_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        set_logger_config(LoggerConfig {
            min_level: LogLevel::Verbose,
            ..LoggerConfig::default()
        });
        assert!(is_debug_enabled_for_tag(&LogTag::Subscription));

        set_logger_config(LoggerConfig::default());
        assert!(!is_debug_enabled_for_tag(&LogTag::Subscription));
    }
}
