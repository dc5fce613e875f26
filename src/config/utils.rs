/// Configuration utilities - loading, saving and access helpers
use super::schemas::Config;
use crate::arguments::get_config_path_arg;
use crate::errors::{PrimerError, PrimerResult};
use crate::logger::{self, LogTag};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

/// Global configuration instance
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Path to load from: `--config <path>` or the default location
pub fn resolve_config_path() -> String {
    get_config_path_arg().unwrap_or_else(|| CONFIG_FILE_PATH.to_string())
}

/// Load configuration and initialize the global CONFIG
///
/// Uses `--config <path>` when given. A missing file is not an error: the
/// defaults from the schema definitions are used instead.
pub fn load_config() -> PrimerResult<()> {
    load_config_from_path(&resolve_config_path())
}

/// Load configuration from a specific file path
pub fn load_config_from_path(path: &str) -> PrimerResult<()> {
    let config = read_config_file(path)?;

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| PrimerError::Config("Config already initialized".to_string()))?;

    logger::debug(LogTag::Config, &format!("Configuration loaded from '{}'", path));
    Ok(())
}

/// Parse a config file, falling back to defaults when it does not exist
pub fn read_config_file(path: &str) -> PrimerResult<Config> {
    if !Path::new(path).exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| PrimerError::Config(format!("Failed to read config file '{}': {}", path, e)))?;

    parse_config(&contents)
        .map_err(|e| PrimerError::Config(format!("Failed to parse config file '{}': {}", path, e)))
}

/// Parse TOML text into a Config, filling missing keys with defaults
pub fn parse_config(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(contents)
}

/// Execute a function with read access to the configuration
///
/// Falls back to defaults when load_config() was never called.
///
/// ```
/// use solana_primer::config::with_config;
///
/// let lamports = with_config(|cfg| cfg.transfer.lamports);
/// assert!(lamports > 0);
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    let config_lock = CONFIG.get_or_init(|| RwLock::new(Config::default()));

    match config_lock.read() {
        Ok(config) => f(&*config),
        Err(poisoned) => f(&*poisoned.into_inner()),
    }
}

/// Get a clone of the entire configuration
///
/// Useful when values are needed across await points.
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

/// Write `config` to `path` as TOML, creating parent directories
pub fn save_config(config: &Config, path: &str) -> PrimerResult<()> {
    let config_str = toml::to_string_pretty(config)
        .map_err(|e| PrimerError::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, config_str)
        .map_err(|e| PrimerError::Config(format!("Failed to write config file '{}': {}", path, e)))?;

    logger::debug(LogTag::Config, &format!("Configuration saved to '{}'", path));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rpc.commitment, "confirmed");
        assert_eq!(config.transfer.lamports, 1000);
        assert_eq!(config.pool.sqrt_price_offset, 253);
        assert_eq!(config.pool.decimals_a, 9);
        assert_eq!(config.pool.decimals_b, 6);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[rpc]"));
        assert!(toml_str.contains("[pool]"));
        assert!(toml_str.contains("sqrt_price_offset = 253"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            [rpc]
            url = "http://127.0.0.1:8899"

            [pool]
            decimals_b = 9
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc.url, "http://127.0.0.1:8899");
        assert_eq!(config.rpc.commitment, "confirmed");
        assert_eq!(config.pool.decimals_b, 9);
        assert_eq!(config.pool.sqrt_price_offset, 253);
        assert_eq!(config.transfer, Default::default());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config = parse_config(include_str!("../../data/config.example.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(parse_config("[pool]\nsqrt_price_offset = \"far\"").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = read_config_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_read_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[transfer]\nlamports = 42\n").unwrap();

        let config = read_config_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.transfer.lamports, 42);
        assert_eq!(config.transfer.cu_price_micro_lamports, 5);
    }

    #[test]
    fn test_save_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.lookup_table.address = "2qqXrZZSG9naivqMyWHHUDRFVNh3YthsTbN5EPU8Poo5".to_string();
        save_config(&config, path).unwrap();

        assert_eq!(read_config_file(path).unwrap(), config);
    }
}
