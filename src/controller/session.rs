// file: src/controller/session.rs
// version: 1.0.0
// guid: d44c72fc-4700-462d-a26d-0c8c756eae79

//! Login and logout against the controller's AAA endpoints

use super::client::{ControllerClient, LOGIN_PATH, LOGOUT_PATH};
use super::models::{error_text_from_body, login_url_token, AaaUserRequest};
use crate::error::RegistrarError;
use crate::Result;
use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::{debug, info};

/// Header carrying the anti-CSRF challenge on authenticated calls
pub const CHALLENGE_HEADER: &str = "APIC-challenge";

/// Marker the controller puts in `Set-Cookie` when a session is closed
const DELETED_MARKER: &str = "deleted";

/// Session cookie and anti-CSRF challenge issued at login
#[derive(Clone, PartialEq, Eq)]
pub struct SessionTokens {
    cookie: String,
    challenge: String,
}

impl SessionTokens {
    pub fn new(cookie: impl Into<String>, challenge: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            challenge: challenge.into(),
        }
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn challenge(&self) -> &str {
        &self.challenge
    }

    /// Attach the session headers to a request
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(COOKIE, &self.cookie)
            .header(CHALLENGE_HEADER, &self.challenge)
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("cookie", &"<redacted>")
            .field("challenge", &"<redacted>")
            .finish()
    }
}

/// Result of closing a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The controller confirmed the session cookie was deleted
    Confirmed,
    /// The session may still be open on the controller
    Ambiguous(String),
}

impl LogoutOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, LogoutOutcome::Confirmed)
    }
}

/// `name=value` pairs of every `Set-Cookie` header, joined for a `Cookie` header
fn session_cookie(headers: &HeaderMap) -> String {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

fn set_cookie_text(headers: &HeaderMap) -> String {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ControllerClient {
    /// Log in and obtain the session tokens
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionTokens> {
        let url = self.endpoint(LOGIN_PATH)?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .query(&[("gui-token-request", "yes")])
            .json(&AaaUserRequest::login(username, password))
            .send()
            .await
            .map_err(|e| RegistrarError::auth(self.address(), e.to_string()))?;

        let status = response.status();
        let cookie = session_cookie(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| RegistrarError::auth(self.address(), e.to_string()))?;

        if !status.is_success() {
            return Err(RegistrarError::auth(
                self.address(),
                format!("{}: {}", status, error_text_from_body(&body)),
            ));
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            RegistrarError::auth(self.address(), format!("unreadable login response: {}", e))
        })?;
        let challenge = login_url_token(&json).ok_or_else(|| {
            RegistrarError::auth(self.address(), "login response carried no urlToken")
        })?;
        if cookie.is_empty() {
            return Err(RegistrarError::auth(
                self.address(),
                "login response carried no session cookie",
            ));
        }

        info!("Logged in to {} as {}", self.address(), username);
        Ok(SessionTokens::new(cookie, challenge))
    }

    /// Log out, reporting whether the controller confirmed the session closed
    ///
    /// Never fails: transport and HTTP errors come back as
    /// [`LogoutOutcome::Ambiguous`].
    pub async fn logout(&self, tokens: &SessionTokens, username: &str) -> LogoutOutcome {
        let url = match self.endpoint(LOGOUT_PATH) {
            Ok(url) => url,
            Err(e) => return LogoutOutcome::Ambiguous(e.to_string()),
        };
        debug!("POST {}", url);

        let request = tokens.apply(self.http.post(url).json(&AaaUserRequest::logout(username)));
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return LogoutOutcome::Ambiguous(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return LogoutOutcome::Ambiguous(format!("logout returned {}", status));
        }

        let set_cookie = set_cookie_text(response.headers());
        if set_cookie.contains(DELETED_MARKER) {
            info!("Logged out of {}", self.address());
            LogoutOutcome::Confirmed
        } else {
            LogoutOutcome::Ambiguous("session cookie was not deleted".to_string())
        }
    }
}
