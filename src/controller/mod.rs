// file: src/controller/mod.rs
// version: 1.0.0
// guid: d58508a9-c148-4a51-9cde-502496cb4f88

//! Controller REST API: session handling and node registration

pub mod client;
pub mod models;
pub mod registration;
pub mod session;

pub use client::ControllerClient;
pub use session::{LogoutOutcome, SessionTokens};
