// file: src/controller/client.rs
// version: 1.0.0
// guid: f5451b75-dd78-4e44-aade-4d5f1f465214

//! HTTP client bound to a single controller

use crate::error::RegistrarError;
use crate::Result;
use reqwest::Client;
use tracing::warn;
use url::Url;

pub const LOGIN_PATH: &str = "/api/aaaLogin.json";
pub const LOGOUT_PATH: &str = "/api/aaaLogout.json";
pub const NODE_IDENTITY_PATH: &str = "/api/mo/uni/controller/nodeidentpol.json";

/// REST client for one controller
///
/// Requests are sent one at a time; the client holds no session state of its
/// own, callers pass the [`SessionTokens`](super::SessionTokens) explicitly.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    pub(crate) http: Client,
    address: String,
    base_url: Url,
}

impl ControllerClient {
    /// Create a client for `address`
    ///
    /// A bare host (or `host:port`) is reached over HTTPS. An address that
    /// already names a scheme is used as given.
    pub fn new(address: &str, accept_invalid_certs: bool) -> Result<Self> {
        let base_url = base_url(address)?;

        if accept_invalid_certs {
            warn!(
                "TLS certificate verification is disabled for {}",
                base_url.host_str().unwrap_or(address)
            );
        }

        let http = Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            address: address.trim().to_string(),
            base_url,
        })
    }

    /// Controller address as entered by the user
    pub fn address(&self) -> &str {
        &self.address
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

fn base_url(address: &str) -> Result<Url> {
    let address = address.trim().trim_end_matches('/');
    if address.is_empty() {
        return Err(RegistrarError::validation("Controller address cannot be empty"));
    }

    let url = if address.contains("://") {
        Url::parse(address)?
    } else {
        Url::parse(&format!("https://{}", address))?
    };

    if url.host_str().is_none() {
        return Err(RegistrarError::validation(format!(
            "Controller address has no host: {}",
            address
        )));
    }
    Ok(url)
}
