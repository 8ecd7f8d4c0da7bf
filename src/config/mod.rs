/// Database configuration and connection management
pub mod database;

/// Initial envelope definitions loaded from config.toml
pub mod envelopes;
