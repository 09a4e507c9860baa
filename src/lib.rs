// file: src/lib.rs
// version: 3.0.0
// guid: 62c341ea-05d3-4f3c-ac40-ea887c6dc8c4

//! # Fabric Node Registrar
//!
//! Bulk-registers fabric nodes into an APIC controller from a CSV file:
//! read the nodes, log in, register each node (a failed node does not stop
//! the others), then log out.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod nodes;
pub mod registrar;

pub use error::{RegistrarError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
