//! Configuration system
//!
//! A single TOML file (default `data/config.toml`, override with
//! `--config <path>`) holds the RPC endpoint, wallet location and the
//! defaults used by each walkthrough tool. Missing files and missing keys
//! fall back to the defaults declared in `schemas`.

#[macro_use]
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::*;
