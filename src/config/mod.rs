// file: src/config/mod.rs
// version: 2.0.0
// guid: 9f48653b-9388-45cb-bcd6-dc7fb178bdd4

//! Run configuration for the fabric node registrar
//!
//! Holds the values resolved from command line flags, environment variables
//! and interactive prompts, and validates them before anything touches the
//! network.

use crate::error::RegistrarError;
use crate::nodes::{SiteEntry, SiteFilter};
use std::path::PathBuf;

/// Nodes file used when none is given
pub const DEFAULT_NODES_FILE: &str = "Fabric-Nodes.csv";
/// Controller used when none is given (Cisco's public always-on sandbox)
pub const DEFAULT_CONTROLLER: &str = "sandboxapicdc.cisco.com";
/// Username used when none is given
pub const DEFAULT_USERNAME: &str = "admin";

/// Everything a registration run needs
#[derive(Clone)]
pub struct RegistrarConfig {
    /// CSV file with the node definitions
    pub nodes_file: PathBuf,
    /// Controller address (host, host:port or URL)
    pub address: String,
    pub username: String,
    pub password: String,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Selected site when running against a multi-site file
    pub site: Option<SiteEntry>,
}

impl RegistrarConfig {
    pub fn new(
        nodes_file: impl Into<PathBuf>,
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            nodes_file: nodes_file.into(),
            address: address.into(),
            username: username.into(),
            password: password.into(),
            accept_invalid_certs: false,
            site: None,
        }
    }

    pub fn with_insecure(mut self, accept_invalid_certs: bool) -> Self {
        self.accept_invalid_certs = accept_invalid_certs;
        self
    }

    /// Restrict the run to one site; its controller address replaces `address`
    pub fn with_site(mut self, site: SiteEntry) -> Self {
        if !site.address.is_empty() {
            self.address = site.address.clone();
        }
        self.site = Some(site);
        self
    }

    /// Row filter matching the selected site, if any
    pub fn site_filter(&self) -> Option<SiteFilter> {
        self.site.as_ref().map(SiteFilter::from)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.nodes_file.as_os_str().is_empty() {
            return Err(RegistrarError::validation("Nodes file cannot be empty"));
        }

        if self.address.trim().is_empty() {
            return Err(RegistrarError::validation(
                "Controller address cannot be empty",
            ));
        }

        if self.username.trim().is_empty() {
            return Err(RegistrarError::validation("Username cannot be empty"));
        }

        if self.password.is_empty() {
            return Err(RegistrarError::validation("Password cannot be empty"));
        }

        if let Some(site) = &self.site {
            if site.name.trim().is_empty() {
                return Err(RegistrarError::validation("Site name cannot be empty"));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for RegistrarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrarConfig")
            .field("nodes_file", &self.nodes_file)
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("site", &self.site)
            .finish()
    }
}
