// file: src/registrar/mod.rs
// version: 1.0.0
// guid: 95fbdc7b-a056-4a3d-b0b8-d652341cffbb

//! Registration run orchestrator
//!
//! Drives one run through `ReadingNodes → LoggingIn → Registering(i) →
//! LoggedOut`. Failures while reading nodes or logging in end the run before
//! any registration or logout call. A failed node never stops the loop, and
//! logout always runs once login succeeded.

use crate::config::RegistrarConfig;
use crate::controller::{ControllerClient, LogoutOutcome};
use crate::nodes::{read_nodes, NodeRecord};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Phase of a registration run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    ReadingNodes,
    LoggingIn,
    /// Registering the node at this index
    Registering(usize),
    LoggedOut,
}

/// A node the controller refused or that could not be reached
#[derive(Debug, Clone)]
pub struct NodeFailure {
    pub node: NodeRecord,
    pub message: String,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub attempted: usize,
    pub registered: usize,
    /// Cumulative request time of the successful registrations
    pub elapsed: Duration,
    pub failures: Vec<NodeFailure>,
    pub logout: LogoutOutcome,
}

impl RunReport {
    fn new() -> Self {
        Self {
            attempted: 0,
            registered: 0,
            elapsed: Duration::ZERO,
            failures: Vec::new(),
            logout: LogoutOutcome::Ambiguous("logout not attempted".to_string()),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Registered {}/{} nodes in {:.2} seconds",
            self.registered,
            self.attempted,
            self.elapsed.as_secs_f64()
        )
    }

    pub fn all_registered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs one bulk registration against a controller
pub struct Registrar {
    config: RegistrarConfig,
    state: RunState,
}

impl Registrar {
    pub fn new(config: RegistrarConfig) -> Self {
        Self {
            config,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Execute the run
    ///
    /// Returns an error only for fatal failures (invalid configuration,
    /// unreadable nodes file, failed login). Per-node failures and an
    /// unconfirmed logout are part of the returned report.
    pub async fn run(&mut self) -> Result<RunReport> {
        self.config.validate()?;

        self.transition(RunState::ReadingNodes);
        let filter = self.config.site_filter();
        let nodes = read_nodes(&self.config.nodes_file, filter.as_ref())?;
        info!(
            "Loaded {} node(s) from {}",
            nodes.len(),
            self.config.nodes_file.display()
        );

        self.transition(RunState::LoggingIn);
        let client = ControllerClient::new(&self.config.address, self.config.accept_invalid_certs)?;
        println!("\nAccessing {}...", client.address());
        let tokens = client
            .login(&self.config.username, &self.config.password)
            .await?;
        println!("Accessed {} successfully", client.address());

        let mut report = RunReport::new();
        for (index, node) in nodes.iter().enumerate() {
            self.transition(RunState::Registering(index));
            report.attempted += 1;

            let spinner = registering_spinner(node);
            let result = client.register(&tokens, node).await;
            spinner.finish_and_clear();

            match result {
                Ok(elapsed) => {
                    report.registered += 1;
                    report.elapsed += elapsed;
                    println!(
                        "{}",
                        format!(
                            "Registered {} with ID {} and S/N {}",
                            node.name, node.node_id, node.serial
                        )
                        .green()
                    );
                }
                Err(e) => {
                    warn!("Registration of {} failed: {}", node.name, e);
                    println!("{}", format!("{}: {}", node.name, e).red());
                    report.failures.push(NodeFailure {
                        node: node.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        println!("{}\n", report.summary());

        report.logout = client.logout(&tokens, &self.config.username).await;
        self.transition(RunState::LoggedOut);

        match &report.logout {
            LogoutOutcome::Confirmed => println!("Closed {} session", client.address()),
            LogoutOutcome::Ambiguous(reason) => {
                warn!("Logout of {} not confirmed: {}", client.address(), reason);
                println!(
                    "{}",
                    "Registered nodes but might have not been logged out! Clear the session from the UI"
                        .yellow()
                );
            }
        }

        Ok(report)
    }
}

fn registering_spinner(node: &NodeRecord) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Registering {}...", node.name));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
