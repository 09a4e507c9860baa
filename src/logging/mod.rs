// file: src/logging/mod.rs
// version: 1.1.0
// guid: 5117452f-cc6d-4540-a3ff-f376816f2795

//! Logging system for the fabric node registrar

pub mod logger;

pub use logger::init_logger;
