// file: src/nodes/reader.rs
// version: 1.0.0
// guid: ca1420e5-cd1a-4ac2-a14c-c37a026ef0b9

//! CSV reader for fabric node definitions
//!
//! Columns are resolved by header name, so the order of columns in the file
//! does not matter. Missing columns and blank cells read as empty strings.

use super::record::{NodeRecord, SiteEntry, SiteFilter};
use crate::error::RegistrarError;
use crate::Result;
use csv::StringRecord;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::debug;

pub const NODE_TYPE_COLUMN: &str = "Node Type";
pub const ROLE_COLUMN: &str = "Node Role";
pub const POD_ID_COLUMN: &str = "POD ID";
pub const SERIAL_COLUMN: &str = "Serial Number";
pub const NAME_COLUMN: &str = "Node Name";
pub const NODE_ID_COLUMN: &str = "Node ID";
pub const SITE_COLUMN: &str = "Site";
pub const ADDRESS_COLUMN: &str = "APIC IP";

/// Header positions of the known columns
#[derive(Debug, Default)]
struct ColumnIndex {
    node_type: Option<usize>,
    role: Option<usize>,
    pod_id: Option<usize>,
    serial: Option<usize>,
    name: Option<usize>,
    node_id: Option<usize>,
    site: Option<usize>,
    address: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut index = ColumnIndex::default();
        for (position, header) in headers.iter().enumerate() {
            let slot = match header.trim_start_matches('\u{feff}').trim() {
                NODE_TYPE_COLUMN => &mut index.node_type,
                ROLE_COLUMN => &mut index.role,
                POD_ID_COLUMN => &mut index.pod_id,
                SERIAL_COLUMN => &mut index.serial,
                NAME_COLUMN => &mut index.name,
                NODE_ID_COLUMN => &mut index.node_id,
                SITE_COLUMN => &mut index.site,
                ADDRESS_COLUMN => &mut index.address,
                _ => continue,
            };
            // First matching header wins
            if slot.is_none() {
                *slot = Some(position);
            }
        }
        index
    }

    fn missing_required(&self) -> Vec<&'static str> {
        [
            (self.node_type, NODE_TYPE_COLUMN),
            (self.role, ROLE_COLUMN),
            (self.pod_id, POD_ID_COLUMN),
            (self.serial, SERIAL_COLUMN),
            (self.name, NAME_COLUMN),
            (self.node_id, NODE_ID_COLUMN),
        ]
        .into_iter()
        .filter(|(position, _)| position.is_none())
        .map(|(_, name)| name)
        .collect()
    }
}

fn cell(row: &StringRecord, position: Option<usize>) -> String {
    position
        .and_then(|i| row.get(i))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn optional_cell(row: &StringRecord, position: Option<usize>) -> Option<String> {
    position.map(|i| row.get(i).map(|value| value.trim().to_string()).unwrap_or_default())
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RegistrarError::FileNotFound(path.display().to_string())
        } else {
            RegistrarError::Io(e)
        }
    })?;

    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

/// Read node records from a CSV file
///
/// Rows whose serial number was already seen are dropped, keeping the first
/// occurrence. With a `filter`, rows outside the selected site are skipped
/// before deduplication.
pub fn read_nodes<P: AsRef<Path>>(path: P, filter: Option<&SiteFilter>) -> Result<Vec<NodeRecord>> {
    let path = path.as_ref();
    let mut reader = open_csv(path)?;
    let columns = ColumnIndex::from_headers(reader.headers()?);

    let missing = columns.missing_required();
    if !missing.is_empty() {
        tracing::warn!(
            "{} is missing column(s): {}",
            path.display(),
            missing.join(", ")
        );
    }

    let mut nodes = Vec::new();
    let mut seen_serials = HashSet::new();

    for row in reader.records() {
        let row = row?;

        let site = optional_cell(&row, columns.site);
        let address = optional_cell(&row, columns.address);
        if let Some(filter) = filter {
            if !filter.matches(site.as_deref(), address.as_deref()) {
                continue;
            }
        }

        let serial = cell(&row, columns.serial);
        if !seen_serials.insert(serial.clone()) {
            debug!("Skipping duplicate serial number {:?}", serial);
            continue;
        }

        nodes.push(NodeRecord {
            node_type: cell(&row, columns.node_type),
            role: cell(&row, columns.role),
            pod_id: cell(&row, columns.pod_id),
            serial,
            name: cell(&row, columns.name),
            node_id: cell(&row, columns.node_id),
            site,
            address,
        });
    }

    debug!("Read {} node(s) from {}", nodes.len(), path.display());
    Ok(nodes)
}

/// Read the distinct sites listed in a multi-site CSV file
///
/// Returns an empty list when the file has no `Site` column.
pub fn read_sites<P: AsRef<Path>>(path: P) -> Result<Vec<SiteEntry>> {
    let path = path.as_ref();
    let mut reader = open_csv(path)?;
    let columns = ColumnIndex::from_headers(reader.headers()?);

    if columns.site.is_none() {
        return Ok(Vec::new());
    }

    let mut sites = Vec::new();
    let mut seen = HashSet::new();

    for row in reader.records() {
        let row = row?;
        let entry = SiteEntry {
            name: cell(&row, columns.site),
            address: cell(&row, columns.address),
        };
        if entry.name.is_empty() {
            continue;
        }
        if seen.insert(entry.clone()) {
            sites.push(entry);
        }
    }

    Ok(sites)
}
