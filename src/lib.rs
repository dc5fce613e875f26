pub mod arguments;
pub mod config;
pub mod errors; // Structured error handling
pub mod logger;
pub mod pools; // Pool account decoding
pub mod rpc;
pub mod subscription; // Account change websocket streams
pub mod tools; // Shared startup for the tool binaries
pub mod transactions;
pub mod utils;
pub mod wallet; // Keypair generation and import
