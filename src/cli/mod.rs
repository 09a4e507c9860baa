// file: src/cli/mod.rs
// version: 2.0.0
// guid: 5ad6abe7-dc2d-45b7-83a5-8e40f43a515f

//! Command line interface for the fabric node registrar

pub mod args;
pub mod commands;
pub mod prompts;

pub use args::Cli;
pub use commands::*;
