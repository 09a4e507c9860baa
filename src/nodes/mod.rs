// file: src/nodes/mod.rs
// version: 1.0.0
// guid: 94c9781a-d582-4653-bb84-0b7b0d7eb7b3

//! Fabric node definitions and the CSV reader that loads them

pub mod reader;
pub mod record;

pub use reader::{read_nodes, read_sites};
pub use record::{NodeRecord, SiteEntry, SiteFilter};
