//! Integration tests for the channel bridge and its stdio transport.

use std::io::Cursor;

use passvault::crypto::Argon2Params;
use passvault::ipc::{serve, Bridge};
use passvault::service::{VaultOptions, VaultService};
use passvault::vault::CredentialStore;
use serde_json::{json, Value};
use tempfile::TempDir;

fn service(dir: &TempDir) -> VaultService {
    let options = VaultOptions {
        argon2_params: Argon2Params {
            memory_kib: 8_192,
            iterations: 1,
            parallelism: 1,
        },
        ..VaultOptions::default()
    };
    VaultService::new(
        CredentialStore::new(dir.path().join("passwords.pwvault")),
        options,
    )
}

fn call(bridge: &mut Bridge<'_>, channel: &str, payload: Value) -> Value {
    let reply = bridge.handle_str(channel, &payload.to_string());
    serde_json::from_str(&reply).expect("reply is JSON")
}

#[test]
fn full_client_flow_over_string_payloads() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let mut bridge = Bridge::new(&svc);

    let created = call(
        &mut bridge,
        "create-password",
        json!({
            "password": "abc123XY!",
            "masterKey": "Tr0ub4dor&3zz",
            "website": "example.com",
            "nickname": "work",
        }),
    );
    assert_eq!(created, json!({ "ok": true }));

    let listed = call(&mut bridge, "get-passwords", json!({ "masterKey": "Tr0ub4dor&3zz" }));
    assert_eq!(
        listed,
        json!([{ "website": "example.com", "password": "abc123XY!", "nickname": "work" }])
    );

    let deleted = call(
        &mut bridge,
        "delete-password",
        json!({
            "website": "example.com",
            "password": "abc123XY!",
            "nickname": "work",
            "masterKey": "Tr0ub4dor&3zz",
        }),
    );
    assert_eq!(deleted, json!({ "ok": true, "removed": 1 }));

    let listed = call(&mut bridge, "get-passwords", json!({ "masterKey": "Tr0ub4dor&3zz" }));
    assert_eq!(listed, json!([]));
}

#[test]
fn wrong_key_gets_error_envelope() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let mut bridge = Bridge::new(&svc);

    call(&mut bridge, "get-passwords", json!({ "masterKey": "abc123XY!" }));
    let reply = call(&mut bridge, "get-passwords", json!({ "masterKey": "Zyx987WV?" }));
    assert_eq!(reply, json!({ "error": "Wrong master key" }));
}

#[test]
fn delete_all_needs_no_payload() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let mut bridge = Bridge::new(&svc);

    call(&mut bridge, "get-passwords", json!({ "masterKey": "abc123XY!" }));
    assert_eq!(bridge.handle_str("delete-all-passwords", ""), r#"{"ok":true}"#);
    assert!(!svc.store().exists());
}

#[test]
fn bad_payloads_and_channels_are_errors_not_panics() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let mut bridge = Bridge::new(&svc);

    let reply: Value = serde_json::from_str(&bridge.handle_str("get-passwords", "{oops")).unwrap();
    assert!(reply.get("error").is_some());

    let reply = call(&mut bridge, "get-passwords", json!({ "website": "no key" }));
    assert!(reply.get("error").is_some());

    let reply = call(&mut bridge, "open-sesame", json!({}));
    assert!(reply["error"].as_str().unwrap().contains("open-sesame"));
}

#[test]
fn serve_answers_each_line_with_matching_id() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);

    let create_payload = json!({
        "password": "pw",
        "masterKey": "abc123XY!",
        "website": "a.com",
    })
    .to_string();
    let input = [
        json!({ "id": 1, "channel": "create-password", "payload": create_payload }).to_string(),
        String::new(),
        "not json".to_string(),
        json!({ "id": "x", "channel": "getPasswords", "payload": { "masterKey": "abc123XY!" } })
            .to_string(),
    ]
    .join("\n");

    let mut out = Vec::new();
    let answered = serve(&svc, Cursor::new(input), &mut out).unwrap();
    assert_eq!(answered, 3);

    let replies: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(replies[0], json!({ "id": 1, "response": { "ok": true } }));
    assert_eq!(replies[1]["id"], Value::Null);
    assert!(replies[1]["response"]["error"].is_string());
    assert_eq!(replies[2]["id"], "x");
    assert_eq!(replies[2]["response"][0]["website"], "a.com");
}

#[test]
fn serve_survives_a_line_that_is_not_utf8() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);

    let mut input = b"{\"id\":1,\"channel\":\"get-\xffpasswords\"}\n".to_vec();
    input.extend_from_slice(b"{\"id\":2,\"channel\":\"delete-all-passwords\"}\n");

    let mut out = Vec::new();
    let answered = serve(&svc, Cursor::new(input), &mut out).unwrap();
    assert_eq!(answered, 2);

    let replies: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(replies.len(), 2);
    assert!(replies[0]["response"]["error"].is_string());
    assert_eq!(replies[1], json!({ "id": 2, "response": { "ok": true } }));
}
