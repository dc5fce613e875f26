/// Core logging implementation with automatic filtering

use super::config::{get_logger_config, is_debug_enabled_for_tag};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Levels above the configured minimum are dropped
/// 3. Debug level requires --debug-<module> for that tag (or --verbose)
/// 4. Verbose level requires --verbose
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let config = get_logger_config();

    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug && !is_debug_enabled_for_tag(tag) {
        return false;
    }

    if level == LogLevel::Verbose && config.min_level != LogLevel::Verbose {
        return false;
    }

    true
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level.as_str(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::{set_logger_config, LoggerConfig, TEST_LOGGER_LOCK};
    use std::collections::HashSet;

    fn config_with(min_level: LogLevel, debug: &[&str]) -> LoggerConfig {
        LoggerConfig {
            min_level,
            debug_tags: debug.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
        }
    }

    #[test]
    fn test_errors_always_pass() {
        let _lock = TEST_LOGGER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_logger_config(config_with(LogLevel::Warning, &[]));

        assert!(should_log(&LogTag::Rpc, LogLevel::Error));
        assert!(should_log(&LogTag::Pool, LogLevel::Warning));
        assert!(!should_log(&LogTag::Pool, LogLevel::Info));

        set_logger_config(LoggerConfig::default());
    }

    #[test]
    fn test_debug_is_gated_per_tag() {
        let _lock = TEST_LOGGER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_logger_config(config_with(LogLevel::Debug, &["rpc"]));

        assert!(should_log(&LogTag::Rpc, LogLevel::Debug));
        assert!(!should_log(&LogTag::Wallet, LogLevel::Debug));
        assert!(should_log(&LogTag::Wallet, LogLevel::Info));
        assert!(!should_log(&LogTag::Rpc, LogLevel::Verbose));

        set_logger_config(LoggerConfig::default());
    }

    #[test]
    fn test_verbose_shows_everything() {
        let _lock = TEST_LOGGER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_logger_config(config_with(LogLevel::Verbose, &[]));

        assert!(should_log(&LogTag::Subscription, LogLevel::Debug));
        assert!(should_log(&LogTag::Subscription, LogLevel::Verbose));

        set_logger_config(LoggerConfig::default());
    }
}
