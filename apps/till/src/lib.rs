//! # Duka Till Library
//!
//! The application layer of Duka POS: shared till state, per-cashier
//! sessions, the command surface the UI collaborator calls, and a console
//! driver for running the till in a terminal.
//!
//! ## Module Organization
//! ```text
//! duka_till/
//! ├── lib.rs          ◄─── You are here (startup & logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── till.rs     ◄─── Shared store, config, renderer
//! │   ├── session.rs  ◄─── One cashier, one cart
//! │   └── config.rs   ◄─── TOML + environment configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Catalog and inventory commands
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── sale.rs     ◄─── Checkout and receipts
//! │   └── report.rs   ◄─── Sales history, revenue, CSV
//! ├── console.rs      ◄─── Line-oriented terminal driver
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod console;
pub mod error;
pub mod state;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{Till, TillConfig};

/// Runs the console till.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: info, debug for duka crates; RUST_LOG overrides          │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • DUKA_CONFIG or the platform config dir (config.toml)              │
/// │     • DUKA_* environment overrides                                      │
/// │                                                                         │
/// │  3. Build the Till ───────────────────────────────────────────────────► │
/// │     • Empty store with the configured stock policy                      │
/// │     • Demo catalog when seed_demo is set                                │
/// │     • Receipt renderer for the configured shop                          │
/// │                                                                         │
/// │  4. Open a Session and Run the Console ───────────────────────────────► │
/// │     • stdin commands, stdout replies, until EOF or `quit`               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Duka POS till");

    let config = TillConfig::load(None)?;
    info!(
        store_name = %config.store.name,
        receipt_dir = ?config.receipt_output_dir(),
        "Configuration loaded"
    );

    let till = Till::new(config)?;
    let session = till.open_session();

    console::run_console(&session, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    info!("Till closed");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=duka_store=trace` - Show trace for one crate only
/// - Default: INFO, DEBUG for the `duka_*` crates
///
/// Logs go to stderr so they never interleave with console replies.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,duka=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
