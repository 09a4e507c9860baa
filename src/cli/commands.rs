// file: src/cli/commands.rs
// version: 2.1.0
// guid: bf222f92-bb78-478b-b5e1-142e8f29239b

//! Command implementation for the CLI

use super::args::{Cli, PASSWORD_ENV};
use super::prompts;
use crate::{
    config::{RegistrarConfig, DEFAULT_CONTROLLER, DEFAULT_NODES_FILE, DEFAULT_USERNAME},
    error::RegistrarError,
    nodes::{read_sites, SiteEntry},
    registrar::{Registrar, RunReport},
    Result,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolve the run configuration from flags, environment and prompts
pub fn resolve_config(cli: &Cli) -> Result<RegistrarConfig> {
    let interactive = !cli.non_interactive;

    let nodes_file = match &cli.file {
        Some(file) => file.clone(),
        None if interactive => {
            PathBuf::from(prompts::text_with_default("Nodes CSV file:", DEFAULT_NODES_FILE)?)
        }
        None => PathBuf::from(DEFAULT_NODES_FILE),
    };

    let site = if cli.is_multi_site() {
        Some(resolve_site(cli, &nodes_file, interactive)?)
    } else {
        None
    };

    let address = match (&cli.address, &site) {
        (_, Some(site)) if !site.address.is_empty() => site.address.clone(),
        (Some(address), _) => address.clone(),
        (None, _) if interactive => {
            prompts::text_with_default("APIC IP Address:", DEFAULT_CONTROLLER)?
        }
        (None, _) => DEFAULT_CONTROLLER.to_string(),
    };

    let username = match &cli.username {
        Some(username) => username.clone(),
        None if interactive => prompts::text_with_default("Username:", DEFAULT_USERNAME)?,
        None => DEFAULT_USERNAME.to_string(),
    };

    let password = match &cli.password {
        Some(password) => password.clone(),
        None if interactive => prompts::password("Password:")?,
        None => {
            return Err(RegistrarError::config(format!(
                "No password given; set {} for non-interactive runs",
                PASSWORD_ENV
            )))
        }
    };

    let mut config =
        RegistrarConfig::new(nodes_file, address, username, password).with_insecure(cli.insecure);
    if let Some(site) = site {
        config = config.with_site(site);
    }

    config.validate()?;
    Ok(config)
}

/// Pick the site to register from a multi-site nodes file
fn resolve_site(cli: &Cli, nodes_file: &Path, interactive: bool) -> Result<SiteEntry> {
    let sites = read_sites(nodes_file)?;
    if sites.is_empty() {
        return Err(RegistrarError::NoSitesAvailable(
            nodes_file.display().to_string(),
        ));
    }

    match &cli.site {
        Some(name) => find_site(&sites, name, narrowing_address(cli)).ok_or_else(|| {
            RegistrarError::config(format!(
                "Site {} not found in {}",
                name,
                nodes_file.display()
            ))
        }),
        None if interactive => prompts::select_site(&sites),
        None => Err(RegistrarError::config(
            "No site given; use --site for non-interactive multi-site runs",
        )),
    }
}

/// Only an address typed on the command line narrows the site choice;
/// one inherited from `FABRIC_APIC` is overridden by the site's own address.
fn narrowing_address(cli: &Cli) -> Option<&str> {
    cli.address
        .as_deref()
        .filter(|_| cli.address_from_command_line)
}

/// First site named `name`, narrowed by controller address when one is given
pub fn find_site(sites: &[SiteEntry], name: &str, address: Option<&str>) -> Option<SiteEntry> {
    sites
        .iter()
        .filter(|site| site.name == name)
        .find(|site| address.map_or(true, |a| site.address == a))
        .cloned()
}

/// Resolve the configuration and run the registration
pub async fn register_command(cli: Cli) -> Result<RunReport> {
    let config = resolve_config(&cli)?;
    info!(
        "Registering nodes from {} on {}",
        config.nodes_file.display(),
        config.address
    );

    let mut registrar = Registrar::new(config);
    registrar.run().await
}
