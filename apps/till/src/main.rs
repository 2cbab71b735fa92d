//! # Duka Till Entry Point
//!
//! Console till for Duka POS. The actual setup is in lib.rs so the UI
//! collaborator can reuse it.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (file, then environment)
//! 3. Build the till (store, renderer, optional demo catalog)
//! 4. Open a session and read commands from stdin

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match duka_till::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("duka-till: {}", e);
            ExitCode::FAILURE
        }
    }
}
