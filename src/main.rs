// file: src/main.rs
// version: 2.1.0
// guid: 93b6d7f9-6536-42c6-8734-999471caf5a3

//! Fabric Node Registrar - Main entry point

use fabric_node_registrar::{
    cli::{args::Cli, commands::register_command},
    logging::logger,
};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    // Initialize logging
    logger::init_logger(cli.verbose, cli.quiet)?;

    tokio::select! {
        result = register_command(cli) => {
            let report = result?;
            info!(
                "Run finished: {} registered, {} failed",
                report.registered,
                report.failures.len()
            );
            Ok(())
        }
        _ = signal::ctrl_c() => {
            warn!("Interrupted; the controller session may still be open");
            std::process::exit(130); // Standard exit code for Ctrl+C
        }
    }
}
