// file: src/cli/args.rs
// version: 2.1.0
// guid: 0a7f485c-c9ce-4888-9d0c-933ed773d965

//! Command line argument definitions
//!
//! Every value is optional. Anything not given here or through the
//! environment is asked for interactively. The password has no flag; it is
//! read from `FABRIC_PASSWORD` or prompted for.

use clap::{parser::ValueSource, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

pub const PASSWORD_ENV: &str = "FABRIC_PASSWORD";

fn password_from_env() -> Option<String> {
    std::env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty())
}

#[derive(Parser, Debug)]
#[command(name = "fabric-node-registrar")]
#[command(about = "Bulk-register fabric nodes into an APIC controller from a CSV file")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[arg(short, long, env = "FABRIC_NODES_FILE", help = "Nodes CSV file")]
    pub file: Option<PathBuf>,

    #[arg(
        short,
        long,
        env = "FABRIC_APIC",
        help = "Controller address; with --site it also picks among sites sharing a name"
    )]
    pub address: Option<String>,

    /// Set when `address` came from `--address` rather than `FABRIC_APIC`
    #[arg(skip)]
    pub address_from_command_line: bool,

    #[arg(short, long, env = "FABRIC_USERNAME", help = "Controller username")]
    pub username: Option<String>,

    #[arg(skip = password_from_env())]
    pub password: Option<String>,

    #[arg(long, help = "Nodes file lists several sites; pick one before registering")]
    pub multi_site: bool,

    #[arg(long, env = "FABRIC_SITE", help = "Site to register (implies --multi-site)")]
    pub site: Option<String>,

    #[arg(long, env = "FABRIC_INSECURE", help = "Do not verify the controller's TLS certificate")]
    pub insecure: bool,

    #[arg(long, help = "Fail instead of prompting for missing values")]
    pub non_interactive: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Parse the process arguments, exiting with clap's usage error on failure
    pub fn parse_args() -> Self {
        Self::try_parse_args_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse `args`, noting which values were given on the command line
    pub fn try_parse_args_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut cli = Self::from_arg_matches(&matches)?;
        cli.address_from_command_line =
            matches.value_source("address") == Some(ValueSource::CommandLine);
        Ok(cli)
    }

    /// Whether the run targets one site of a multi-site file
    pub fn is_multi_site(&self) -> bool {
        self.multi_site || self.site.is_some()
    }
}
