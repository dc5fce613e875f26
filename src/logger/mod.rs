//! Structured console logging for the walkthrough tools
//!
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via `--debug-<module>` flags
//! - Colored console output, optionally mirrored to a log file
//!
//! ## Usage
//!
//! ```rust
//! use solana_primer::logger::{self, LogTag};
//!
//! logger::init();
//! logger::info(LogTag::Rpc, "Connected to https://api.mainnet-beta.solana.com");
//! logger::debug(LogTag::Pool, "sqrt_price_x64=..."); // Only with --debug-pool
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{
    get_logger_config, init_from_args, is_debug_enabled_for_tag, set_logger_config, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger from the command line
///
/// Call once at startup, before any logging occurs. Scans the arguments for
/// `--debug-<module>`, `--verbose` and `--quiet`.
pub fn init() {
    config::init_from_args();
}

/// Mirror every log line into `path` (appending)
///
/// Failures to open the file are reported on the console and otherwise
/// ignored; console logging keeps working.
pub fn init_file_logging(path: &str) {
    if let Err(e) = file::init_file_logging(path) {
        error(
            LogTag::System,
            &format!("Failed to open log file '{}': {}", path, e),
        );
    }
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, only shown with the tag's `--debug-<module>` flag
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, only shown with `--verbose`
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush pending log file writes
pub fn flush() {
    file::flush_file_logging();
}
