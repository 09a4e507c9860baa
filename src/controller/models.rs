// file: src/controller/models.rs
// version: 1.0.0
// guid: 7e2da31c-3c1c-46db-8807-6362d890a79d

//! Request payloads and response helpers for the controller REST API

use crate::nodes::NodeRecord;
use serde::Serialize;
use serde_json::Value;

/// `aaaUser` login/logout payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AaaUserRequest<'a> {
    pub aaa_user: Attributes<AaaUserAttributes<'a>>,
}

#[derive(Debug, Serialize)]
pub struct AaaUserAttributes<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pwd: Option<&'a str>,
}

impl<'a> AaaUserRequest<'a> {
    pub fn login(name: &'a str, pwd: &'a str) -> Self {
        Self {
            aaa_user: Attributes::new(AaaUserAttributes {
                name,
                pwd: Some(pwd),
            }),
        }
    }

    pub fn logout(name: &'a str) -> Self {
        Self {
            aaa_user: Attributes::new(AaaUserAttributes { name, pwd: None }),
        }
    }
}

/// Wrapper matching the controller's `{"attributes": {...}}` object shape
#[derive(Debug, Serialize)]
pub struct Attributes<T> {
    pub attributes: T,
}

impl<T> Attributes<T> {
    pub fn new(attributes: T) -> Self {
        Self { attributes }
    }
}

/// Node identity policy plus the physical endpoint it maps to
#[derive(Debug, Serialize)]
pub struct NodeRegistrationRequest<'a> {
    #[serde(rename = "fabricNodeIdentP")]
    pub identity: Attributes<NodeIdentityAttributes<'a>>,
    #[serde(rename = "fabricNodePEp")]
    pub endpoint: Attributes<PhysicalEndpointAttributes>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeIdentityAttributes<'a> {
    pub node_id: &'a str,
    pub node_type: &'a str,
    pub role: &'a str,
    pub name: &'a str,
    pub serial: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PhysicalEndpointAttributes {
    #[serde(rename = "tDn")]
    pub t_dn: String,
}

impl<'a> From<&'a NodeRecord> for NodeRegistrationRequest<'a> {
    fn from(node: &'a NodeRecord) -> Self {
        Self {
            identity: Attributes::new(NodeIdentityAttributes {
                node_id: &node.node_id,
                node_type: &node.node_type,
                role: &node.role,
                name: &node.name,
                serial: &node.serial,
            }),
            endpoint: Attributes::new(PhysicalEndpointAttributes {
                t_dn: node.topology_dn(),
            }),
        }
    }
}

/// Anti-CSRF token from a login response body
pub fn login_url_token(body: &Value) -> Option<&str> {
    body.pointer("/imdata/0/aaaLogin/attributes/urlToken")
        .and_then(Value::as_str)
}

/// Human-readable error text from a controller error body
pub fn error_text(body: &Value) -> Option<&str> {
    body.pointer("/imdata/0/error/attributes/text")
        .and_then(Value::as_str)
}

/// Error text from a raw response body, falling back to the body itself
pub fn error_text_from_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_text)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
