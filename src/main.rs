//! Bootstrap binary: prepares the database an envelope board runs against.
//!
//! Initializes logging, loads `.env`, connects to the configured store,
//! creates the schema, and seeds any envelopes declared in `config.toml`.
//! The board's UI layers consume the library crate directly; there is no
//! command surface here.

use dotenvy::dotenv;
use envelope_board::config;
use envelope_board::core::envelope::seed_initial_envelopes;
use envelope_board::errors::Result;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and make sure the schema exists
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;

    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ensured."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 4. Seed initial envelopes when a config.toml is present
    if Path::new("config.toml").exists() {
        let board_config = config::envelopes::load_default_config()
            .inspect_err(|e| error!("Failed to load config.toml: {e}"))?;
        let user_id = std::env::var("BOARD_USER_ID").unwrap_or_else(|_| "local".to_string());

        seed_initial_envelopes(&db, &user_id, &board_config.envelopes)
            .await
            .inspect(|()| info!("Initial envelopes seeded."))
            .inspect_err(|e| error!("Failed to seed envelopes: {e}"))?;
    } else {
        info!("No config.toml found; skipping envelope seeding.");
    }

    info!("Envelope board database is ready.");
    Ok(())
}
