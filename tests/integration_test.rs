// file: tests/integration_test.rs
// version: 2.1.0
// guid: 6f9f2ff0-ff24-4d5b-a828-aa8cb6986597

//! Integration tests for the fabric node registrar against a mock controller

use fabric_node_registrar::{
    config::RegistrarConfig,
    controller::{ControllerClient, LogoutOutcome, SessionTokens},
    nodes::{read_nodes, SiteEntry},
    registrar::{Registrar, RunState},
    RegistrarError,
};
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const NODES: &str = "\
Node Type,Node Role,POD ID,Serial Number,Node Name,Node ID
unspecified,leaf,1,SN-1,leaf-101,101
unspecified,leaf,1,SN-2,leaf-102,102
unspecified,spine,,SN-3,spine-201,201
unspecified,spine,1,SN-1,spine-202,202
";

const COOKIE: &str = "APIC-cookie=session-abc";
const CHALLENGE: &str = "challenge-xyz";

// Nothing listens on port 1, so connecting fails before any HTTP exchange
const UNREACHABLE: &str = "http://127.0.0.1:1";

fn write_nodes(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("Fabric-Nodes.csv");
    std::fs::write(&path, content).unwrap();
    path
}

fn mock_login(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/aaaLogin.json")
            .query_param("gui-token-request", "yes")
            .body_includes(r#""name":"admin""#)
            .body_includes(r#""pwd":"secret""#);
        then.status(200)
            .header("content-type", "application/json")
            .header("set-cookie", "APIC-cookie=session-abc; path=/; HttpOnly; Secure")
            .json_body(json!({
                "totalCount": "1",
                "imdata": [{"aaaLogin": {"attributes": {"urlToken": CHALLENGE, "userName": "admin"}}}]
            }));
    })
}

fn mock_register_ok<'a>(server: &'a MockServer, serial: &str) -> Mock<'a> {
    let serial = format!(r#""serial":"{}""#, serial);
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/mo/uni/controller/nodeidentpol.json")
            .header("cookie", COOKIE)
            .header("apic-challenge", CHALLENGE)
            .body_includes(serial);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"totalCount": "0", "imdata": []}));
    })
}

fn mock_register_rejected<'a>(server: &'a MockServer, serial: &str, text: &str) -> Mock<'a> {
    let serial = format!(r#""serial":"{}""#, serial);
    let text = text.to_string();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/mo/uni/controller/nodeidentpol.json")
            .body_includes(serial);
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({
                "totalCount": "1",
                "imdata": [{"error": {"attributes": {"code": "103", "text": text}}}]
            }));
    })
}

fn mock_logout<'a>(server: &'a MockServer, set_cookie: &str) -> Mock<'a> {
    let set_cookie = set_cookie.to_string();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/aaaLogout.json")
            .header("cookie", COOKIE)
            .body_includes(r#""name":"admin""#);
        then.status(200)
            .header("content-type", "application/json")
            .header("set-cookie", set_cookie)
            .json_body(json!({"totalCount": "0", "imdata": []}));
    })
}

fn mock_logout_status(server: &MockServer, status: u16) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/api/aaaLogout.json");
        then.status(status)
            .header("set-cookie", "APIC-cookie=deleted; path=/")
            .body("Internal Server Error");
    })
}

fn config(server: &MockServer, nodes_file: PathBuf) -> RegistrarConfig {
    RegistrarConfig::new(nodes_file, server.base_url(), "admin", "secret")
}

#[tokio::test]
async fn test_login_returns_session_tokens() {
    let server = MockServer::start();
    let login = mock_login(&server);

    let client = ControllerClient::new(&server.base_url(), false).unwrap();
    let tokens = client.login("admin", "secret").await.unwrap();

    login.assert();
    assert_eq!(tokens.cookie(), COOKIE);
    assert_eq!(tokens.challenge(), CHALLENGE);
}

#[tokio::test]
async fn test_login_rejected_carries_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/aaaLogin.json");
        then.status(401).json_body(json!({
            "imdata": [{"error": {"attributes": {"code": "401", "text": "FAILED local authentication"}}}]
        }));
    });

    let client = ControllerClient::new(&server.base_url(), false).unwrap();
    let err = client.login("admin", "wrong").await.unwrap_err();

    match err {
        RegistrarError::AuthError { message, .. } => {
            assert!(message.contains("401"));
            assert!(message.contains("FAILED local authentication"));
        }
        other => panic!("expected AuthError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_register_reports_controller_error_text() {
    let server = MockServer::start();
    mock_register_rejected(&server, "SN-2", "Node ID 102 is already registered");

    let dir = TempDir::new().unwrap();
    let nodes = read_nodes(write_nodes(&dir, NODES), None).unwrap();
    let client = ControllerClient::new(&server.base_url(), false).unwrap();
    let tokens = SessionTokens::new(COOKIE, CHALLENGE);

    let err = client.register(&tokens, &nodes[1]).await.unwrap_err();
    assert!(matches!(err, RegistrarError::RegistrationError(ref text) if text == "Node ID 102 is already registered"));
}

#[tokio::test]
async fn test_register_sends_default_pod() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/mo/uni/controller/nodeidentpol.json")
            .body_includes(r#""tDn":"topology/pod-1/spine-201""#);
        then.status(200).json_body(json!({"imdata": []}));
    });

    let dir = TempDir::new().unwrap();
    let nodes = read_nodes(write_nodes(&dir, NODES), None).unwrap();
    let client = ControllerClient::new(&server.base_url(), false).unwrap();

    client
        .register(&SessionTokens::new(COOKIE, CHALLENGE), &nodes[2])
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_run_registers_all_nodes() {
    let server = MockServer::start();
    let login = mock_login(&server);
    let first = mock_register_ok(&server, "SN-1");
    let second = mock_register_ok(&server, "SN-2");
    let third = mock_register_ok(&server, "SN-3");
    let logout = mock_logout(&server, "APIC-cookie=deleted; path=/; expires=Thu, 01 Jan 1970 00:00:01 GMT");

    let dir = TempDir::new().unwrap();
    let mut registrar = Registrar::new(config(&server, write_nodes(&dir, NODES)));
    let report = registrar.run().await.unwrap();

    login.assert();
    // SN-1 appears twice in the file but is registered once
    first.assert_calls(1);
    second.assert_calls(1);
    third.assert_calls(1);
    logout.assert();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.registered, 3);
    assert!(report.all_registered());
    assert_eq!(report.logout, LogoutOutcome::Confirmed);
    assert_eq!(registrar.state(), RunState::LoggedOut);
}

#[tokio::test]
async fn test_run_continues_past_failed_node() {
    let server = MockServer::start();
    mock_login(&server);
    let first = mock_register_ok(&server, "SN-1");
    let rejected = mock_register_rejected(&server, "SN-2", "Serial number already in use");
    let third = mock_register_ok(&server, "SN-3");
    let logout = mock_logout(&server, "APIC-cookie=deleted; path=/");

    let dir = TempDir::new().unwrap();
    let report = Registrar::new(config(&server, write_nodes(&dir, NODES)))
        .run()
        .await
        .unwrap();

    first.assert_calls(1);
    rejected.assert_calls(1);
    third.assert_calls(1);
    logout.assert();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.registered, 2);
    assert!(report.summary().starts_with("Registered 2/3 nodes in "));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].node.serial, "SN-2");
    assert_eq!(report.failures[0].message, "Serial number already in use");
    assert!(report.logout.is_confirmed());
}

#[tokio::test]
async fn test_run_warns_on_ambiguous_logout() {
    let server = MockServer::start();
    mock_login(&server);
    mock_register_ok(&server, "SN-1");
    mock_register_rejected(&server, "SN-2", "Node ID 102 is already registered");
    mock_register_ok(&server, "SN-3");
    let logout = mock_logout(&server, "APIC-cookie=session-abc; path=/");

    let dir = TempDir::new().unwrap();
    let report = Registrar::new(config(&server, write_nodes(&dir, NODES)))
        .run()
        .await
        .unwrap();

    logout.assert();
    assert_eq!(report.registered, 2);
    assert_eq!(report.attempted, 3);
    assert!(matches!(report.logout, LogoutOutcome::Ambiguous(_)));
}

#[tokio::test]
async fn test_missing_file_never_logs_in() {
    let server = MockServer::start();
    let login = mock_login(&server);

    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.csv");
    let err = Registrar::new(config(&server, missing))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, RegistrarError::FileNotFound(_)));
    login.assert_calls(0);
}

#[tokio::test]
async fn test_failed_login_skips_registration_and_logout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/aaaLogin.json");
        then.status(401).body("Unauthorized");
    });
    let register = mock_register_ok(&server, "SN-1");
    let logout = mock_logout(&server, "APIC-cookie=deleted");

    let dir = TempDir::new().unwrap();
    let mut registrar = Registrar::new(config(&server, write_nodes(&dir, NODES)));
    let err = registrar.run().await.unwrap_err();

    assert!(matches!(err, RegistrarError::AuthError { .. }));
    assert_eq!(registrar.state(), RunState::LoggingIn);
    register.assert_calls(0);
    logout.assert_calls(0);
}

#[tokio::test]
async fn test_empty_file_still_logs_out() {
    let server = MockServer::start();
    mock_login(&server);
    let logout = mock_logout(&server, "APIC-cookie=deleted");

    let dir = TempDir::new().unwrap();
    let path = write_nodes(
        &dir,
        "Node Type,Node Role,POD ID,Serial Number,Node Name,Node ID\n",
    );
    let report = Registrar::new(config(&server, path)).run().await.unwrap();

    logout.assert();
    assert_eq!(report.attempted, 0);
    assert_eq!(report.summary(), "Registered 0/0 nodes in 0.00 seconds");
}

#[tokio::test]
async fn test_site_run_only_registers_selected_site() {
    let server = MockServer::start();
    mock_login(&server);
    let dc1 = mock_register_ok(&server, "SN-A");
    let dc2 = mock_register_ok(&server, "SN-B");
    mock_logout(&server, "APIC-cookie=deleted");

    let dir = TempDir::new().unwrap();
    let address = server.base_url();
    let content = format!(
        "Site,APIC IP,Node Type,Node Role,POD ID,Serial Number,Node Name,Node ID\n\
         DC1,{address},unspecified,leaf,1,SN-A,leaf-101,101\n\
         DC2,10.0.1.1,unspecified,leaf,1,SN-B,leaf-101,101\n"
    );
    let path = write_nodes(&dir, &content);

    let site = SiteEntry {
        name: "DC1".to_string(),
        address,
    };
    let config = RegistrarConfig::new(path, "unused.invalid", "admin", "secret").with_site(site);
    let report = Registrar::new(config).run().await.unwrap();

    assert_eq!(report.registered, 1);
    dc1.assert_calls(1);
    dc2.assert_calls(0);
}

#[tokio::test]
async fn test_login_unreachable_is_auth_error() {
    let client = ControllerClient::new(UNREACHABLE, false).unwrap();
    let err = client.login("admin", "secret").await.unwrap_err();

    match err {
        RegistrarError::AuthError { address, message } => {
            assert_eq!(address, UNREACHABLE);
            assert!(!message.is_empty());
        }
        other => panic!("expected AuthError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_register_unreachable_is_registration_error() {
    let dir = TempDir::new().unwrap();
    let nodes = read_nodes(write_nodes(&dir, NODES), None).unwrap();
    let client = ControllerClient::new(UNREACHABLE, false).unwrap();

    let err = client
        .register(&SessionTokens::new(COOKIE, CHALLENGE), &nodes[0])
        .await
        .unwrap_err();
    assert!(matches!(err, RegistrarError::RegistrationError(ref text) if !text.is_empty()));
}

#[tokio::test]
async fn test_logout_unreachable_is_ambiguous() {
    let client = ControllerClient::new(UNREACHABLE, false).unwrap();
    let outcome = client
        .logout(&SessionTokens::new(COOKIE, CHALLENGE), "admin")
        .await;

    assert!(matches!(outcome, LogoutOutcome::Ambiguous(_)));
}

#[tokio::test]
async fn test_logout_server_error_is_ambiguous() {
    let server = MockServer::start();
    let logout = mock_logout_status(&server, 500);

    let client = ControllerClient::new(&server.base_url(), false).unwrap();
    let outcome = client
        .logout(&SessionTokens::new(COOKIE, CHALLENGE), "admin")
        .await;

    logout.assert();
    match outcome {
        LogoutOutcome::Ambiguous(reason) => assert!(reason.contains("500")),
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

/// Read one request (head and `Content-Length` body) off the socket
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Controller stub that answers login, registration and logout over plain
/// HTTP/1.1 but closes the connection without a response when a registration
/// body carries `drop_serial`. Returns the base URL and every request seen.
async fn spawn_dropping_controller(drop_serial: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let request = read_request(&mut socket).await;
            log.lock().unwrap().push(request.clone());

            let request_line = request.lines().next().unwrap_or_default().to_string();
            let (set_cookie, body) = if request_line.contains("/api/aaaLogin.json") {
                (
                    "APIC-cookie=session-abc; path=/",
                    json!({"imdata": [{"aaaLogin": {"attributes": {"urlToken": CHALLENGE}}}]})
                        .to_string(),
                )
            } else if request_line.contains("/api/aaaLogout.json") {
                ("APIC-cookie=deleted; path=/", json!({"imdata": []}).to_string())
            } else if request.contains(drop_serial) {
                drop(socket);
                continue;
            } else {
                ("", json!({"imdata": []}).to_string())
            };

            let mut response = String::from("HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n");
            if !set_cookie.is_empty() {
                response.push_str(&format!("Set-Cookie: {}\r\n", set_cookie));
            }
            response.push_str(&format!(
                "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            ));
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (base_url, seen)
}

#[tokio::test]
async fn test_run_continues_past_dropped_connection() {
    let (base_url, seen) = spawn_dropping_controller(r#""serial":"SN-2""#).await;

    let dir = TempDir::new().unwrap();
    let config = RegistrarConfig::new(write_nodes(&dir, NODES), base_url, "admin", "secret");
    let mut registrar = Registrar::new(config);
    let report = registrar.run().await.unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.registered, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].node.serial, "SN-2");
    assert!(!report.failures[0].message.is_empty());
    assert_eq!(report.logout, LogoutOutcome::Confirmed);
    assert_eq!(registrar.state(), RunState::LoggedOut);

    let seen = seen.lock().unwrap();
    let registrations: Vec<_> = seen
        .iter()
        .filter(|request| request.contains("/api/mo/uni/controller/nodeidentpol.json"))
        .collect();
    assert!(registrations.iter().any(|r| r.contains(r#""serial":"SN-3""#)));
    assert!(registrations.len() >= 3);
    assert!(seen.last().unwrap().contains("/api/aaaLogout.json"));
}
