// file: src/nodes/record.rs
// version: 1.1.0
// guid: 57d005b5-6227-48a8-be96-02e7565e1451

//! Node and site records read from the nodes CSV

/// A fabric node to register, as read from one CSV row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRecord {
    /// Node type (e.g., unspecified, remote-leaf-wan)
    pub node_type: String,
    /// Node role (leaf or spine)
    pub role: String,
    /// Pod the node lives in
    pub pod_id: String,
    /// Serial number, unique within a run
    pub serial: String,
    /// Node name
    pub name: String,
    /// Node ID
    pub node_id: String,
    /// Site name, present when the file has a `Site` column
    pub site: Option<String>,
    /// Controller address, present when the file has an `APIC IP` column
    pub address: Option<String>,
}

impl NodeRecord {
    /// Pod used in the physical endpoint DN, falling back to pod 1
    pub fn pod_or_default(&self) -> &str {
        if self.pod_id.is_empty() {
            "1"
        } else {
            &self.pod_id
        }
    }

    /// Distinguished name of the node's physical endpoint
    pub fn topology_dn(&self) -> String {
        format!("topology/pod-{}/{}", self.pod_or_default(), self.name)
    }
}

/// A site and the controller that manages it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteEntry {
    pub name: String,
    pub address: String,
}

impl std::fmt::Display for SiteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.address.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.address)
        }
    }
}

/// Restricts a read to the rows of one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFilter {
    pub site: String,
    /// When set, the row's `APIC IP` must match as well
    pub address: Option<String>,
}

impl SiteFilter {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Check whether a row's site and address pass this filter
    pub fn matches(&self, site: Option<&str>, address: Option<&str>) -> bool {
        if site != Some(self.site.as_str()) {
            return false;
        }
        match &self.address {
            Some(wanted) => address == Some(wanted.as_str()),
            None => true,
        }
    }
}

impl From<&SiteEntry> for SiteFilter {
    fn from(entry: &SiteEntry) -> Self {
        let filter = SiteFilter::new(entry.name.clone());
        if entry.address.is_empty() {
            filter
        } else {
            filter.with_address(entry.address.clone())
        }
    }
}
