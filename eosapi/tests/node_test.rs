#![allow(clippy::unwrap_used)]
// Integration tests for `Node` over HTTP using wiremock.

use std::time::Duration;

use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{basic_auth, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eosapi::show::{ShowHostname, ShowVersion};
use eosapi::{ConnectionError, Encoding, Error, ErrorKind, Node, NodeBuilder, TransportKind};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Node) {
    let server = MockServer::start().await;
    let node = builder(&server).build().unwrap();
    (server, node)
}

fn builder(server: &MockServer) -> NodeBuilder {
    let addr = server.address();
    NodeBuilder::new(addr.ip().to_string())
        .transport(TransportKind::Http)
        .port(addr.port())
        .username("admin")
        .password("pw")
}

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result
    }))
}

fn cmds(cmds: Value) -> Value {
    json!({"params": {"cmds": cmds}})
}

const RUNNING: &str = "\
! Command: show running-config all
! device: leaf1 (vEOS-lab, EOS-4.30.1F)
!
hostname leaf1
interface Ethernet1
   description uplink
   no shutdown
vlan 10
   name servers
end
";

// ── Wire format ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_enable_wire_body() {
    let (server, mut node) = setup().await;

    Mock::given(method("POST"))
        .and(path("/command-api"))
        .and(basic_auth("admin", "pw"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "runCmds",
            "params": {
                "version": 1,
                "cmds": ["enable", "show version"],
                "format": "json"
            }
        })))
        .respond_with(rpc_result(json!([
            {},
            {"version": "4.30.1F", "modelName": "vEOS-lab"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let responses = node.enable(["show version"]).await.unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].command, "show version");
    assert_eq!(responses[0].result["modelName"], json!("vEOS-lab"));
}

#[tokio::test]
async fn test_enable_password_sent_as_input() {
    let server = MockServer::start().await;
    let mut node = builder(&server).enable_password("en-pw").build().unwrap();

    Mock::given(method("POST"))
        .and(body_partial_json(cmds(json!([
            {"cmd": "enable", "input": "en-pw"},
            "show clock"
        ]))))
        .respond_with(rpc_result(json!([{}, {"output": "Mon Jan 1\n"}])))
        .expect(1)
        .mount(&server)
        .await;

    let responses = node.enable_with(["show clock"], Encoding::Text).await.unwrap();
    assert_eq!(responses[0].output(), Some("Mon Jan 1\n"));
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_config_failure_reports_index() {
    let (server, mut node) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": 1002,
                "message": "CLI command 3 of 4 'bogus' failed: invalid command",
                "data": {"errors": ["Invalid input (at token 0: 'bogus')"]}
            }
        })))
        .mount(&server)
        .await;

    let err = node.config(["bogus", "hostname x"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Command);

    let cmd_err = err.as_command_error().unwrap();
    assert_eq!(cmd_err.code, 1002);
    assert_eq!(cmd_err.failed_index(), Some(3));
    assert_eq!(
        cmd_err.command_error(),
        Some("Invalid input (at token 0: 'bogus')")
    );

    let last = node.last_error().unwrap();
    assert_eq!(last.kind, ErrorKind::Command);
    assert_eq!(last.code, Some(1002));
}

#[tokio::test]
async fn test_per_command_error_array() {
    let (server, mut node) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": 1002,
                "message": "CLI command 2 of 3 'show bogus' failed: invalid command",
                "data": [
                    {},
                    {"errors": ["Invalid input (at token 1: 'bogus')"]}
                ]
            }
        })))
        .mount(&server)
        .await;

    let err = node
        .enable(["show bogus", "show version"])
        .await
        .unwrap_err();
    let cmd_err = err.as_command_error().unwrap();
    assert_eq!(cmd_err.failed_index(), Some(1));
    assert_eq!(cmd_err.failed_command(), Some("show bogus"));
}

#[tokio::test]
async fn test_http_status_is_connection_error() {
    let (server, mut node) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = node.enable(["show version"]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(
        matches!(
            err,
            Error::Connection(ConnectionError::HttpStatus { status: 401, .. })
        ),
        "expected HTTP 401, got: {err:?}"
    );
}

#[tokio::test]
async fn test_result_count_mismatch_is_invalid_response() {
    let (server, mut node) = setup().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{}])))
        .mount(&server)
        .await;

    let err = node.enable(["show version"]).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Connection(ConnectionError::InvalidResponse { .. })
    ));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    let mut node = builder(&server)
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{}, {}])).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = node.enable(["show version"]).await.unwrap_err();
    assert!(
        matches!(err, Error::Connection(ConnectionError::Timeout(_))),
        "expected timeout, got: {err:?}"
    );
}

#[tokio::test]
async fn test_cancel_in_flight_batch() {
    let (server, mut node) = setup().await;

    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{}])).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = node
        .run_commands_with_cancel(["show version"], Encoding::Json, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Connection(ConnectionError::Cancelled)
    ));
}

// ── Config cache ────────────────────────────────────────────────────

#[tokio::test]
async fn test_config_invalidates_running_config_cache() {
    let (server, mut node) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(cmds(json!([
            "enable",
            "show running-config all"
        ]))))
        .respond_with(rpc_result(json!([{}, {"output": RUNNING}])))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "params": {
                "cmds": ["enable", "configure", "hostname leaf2"],
                "format": "text"
            }
        })))
        .respond_with(rpc_result(json!([{}, {}, {}])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(node.running_config().await.unwrap().starts_with("hostname leaf1"));
    node.running_config().await.unwrap();

    let responses = node.config(["hostname leaf2"]).await.unwrap();
    assert_eq!(responses.len(), 1);

    node.running_config().await.unwrap();
}

#[tokio::test]
async fn test_feature_read_through_node_cache() {
    let (server, mut node) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(cmds(json!([
            "enable",
            "show running-config all"
        ]))))
        .respond_with(rpc_result(json!([{}, {"output": RUNNING}])))
        .expect(1)
        .mount(&server)
        .await;

    let vlan = node.vlans().get(10).await.unwrap().unwrap();
    assert_eq!(vlan.name, "servers");

    let intf = node.interfaces().get("Ethernet1").await.unwrap().unwrap();
    assert_eq!(intf.description.as_deref(), Some("uplink"));
    assert!(!intf.shutdown);

    assert_eq!(node.system().get().await.unwrap().hostname, "leaf1");
}

// ── Handles ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_handle_batches_typed_commands() {
    let (server, mut node) = setup().await;

    Mock::given(method("POST"))
        .and(body_partial_json(cmds(json!([
            "enable",
            "show version",
            "show hostname"
        ]))))
        .respond_with(rpc_result(json!([
            {},
            {"version": "4.30.1F-32308478.4301F", "modelName": "DCS-7050SX3-48YC8"},
            {"hostname": "leaf1", "fqdn": "leaf1.dc1"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut version = ShowVersion::default();
    let mut hostname = ShowHostname::default();
    {
        let mut handle = node.get_handle(Encoding::Json);
        handle.add_command(&mut version).unwrap();
        handle.add_command(&mut hostname).unwrap();
        handle.call().await.unwrap();
        assert_eq!(handle.results().len(), 3);
        handle.close();
    }

    assert_eq!(version.version_number(), "4.30.1F");
    assert_eq!(version.model_name, "DCS-7050SX3-48YC8");
    assert_eq!(hostname.fqdn, "leaf1.dc1");
}
