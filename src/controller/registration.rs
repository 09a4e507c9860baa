// file: src/controller/registration.rs
// version: 1.0.0
// guid: 6fe9d6aa-2cc8-4d65-8345-7cdcbf37359c

//! Node identity registration

use super::client::{ControllerClient, NODE_IDENTITY_PATH};
use super::models::{error_text_from_body, NodeRegistrationRequest};
use super::session::SessionTokens;
use crate::error::RegistrarError;
use crate::nodes::NodeRecord;
use crate::Result;
use std::time::{Duration, Instant};
use tracing::debug;

impl ControllerClient {
    /// Register one node, returning the time the request took
    ///
    /// Failures carry the controller's own error text when it sent one.
    pub async fn register(&self, tokens: &SessionTokens, node: &NodeRecord) -> Result<Duration> {
        let url = self.endpoint(NODE_IDENTITY_PATH)?;
        debug!("POST {} for {}", url, node.name);

        let request = tokens.apply(self.http.post(url).json(&NodeRegistrationRequest::from(node)));

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| RegistrarError::registration(e.to_string()))?;
        let elapsed = started.elapsed();

        let status = response.status();
        if status.is_success() {
            return Ok(elapsed);
        }

        let body = response.text().await.unwrap_or_default();
        let text = error_text_from_body(&body);
        Err(RegistrarError::registration(if text.is_empty() {
            status.to_string()
        } else {
            text
        }))
    }
}
