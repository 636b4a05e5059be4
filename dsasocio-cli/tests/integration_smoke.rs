//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn dsasocio() -> Command {
    let mut cmd = Command::cargo_bin("dsasocio").unwrap();
    for var in ["PUSHER_APP_ID", "PUSHER_KEY", "PUSHER_SECRET", "DATABASE_URL", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

// === Help ===

#[test]
fn test_top_level_help() {
    dsasocio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("channel"));
}

#[test]
fn test_serve_help() {
    dsasocio()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--cors-permissive"));
}

#[test]
fn test_send_help() {
    dsasocio()
        .args(["send", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Connection id to exclude"));
}

// === Channel ===

#[test]
fn test_channel_is_order_independent() {
    dsasocio()
        .args(["channel", "bob", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chat_id: alice_bob"))
        .stdout(predicate::str::contains("channel: private-chat-alice_bob"));
}

#[test]
fn test_channel_json() {
    let output = dsasocio()
        .args(["channel", "alice", "bob", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["chat_id"], "alice_bob");
    assert_eq!(json["channel"], "private-chat-alice_bob");
}

// === Auth ===

#[test]
fn test_auth_private_channel() {
    dsasocio()
        .args(["auth", "--socket-id", "1234.1234", "--channel", "private-foobar"])
        .env("PUSHER_KEY", "278d425bdf160c739803")
        .env("PUSHER_SECRET", "7ad3773142a6692b25b8")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "278d425bdf160c739803:58df8b0c36d6982b82c3ecf6b4662e34fe8c25bba48f5369f135bf843651c3a4",
        ));
}

#[test]
fn test_auth_rejects_public_channel() {
    dsasocio()
        .args(["auth", "--socket-id", "1.2", "--channel", "lobby"])
        .env("PUSHER_KEY", "key")
        .env("PUSHER_SECRET", "secret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("public"));
}

#[test]
fn test_auth_rejects_bad_socket_id() {
    dsasocio()
        .args(["auth", "--socket-id", "abc", "--channel", "private-x"])
        .env("PUSHER_KEY", "key")
        .env("PUSHER_SECRET", "secret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --socket-id"));
}

// === Serve / Send failures ===

#[test]
fn test_serve_requires_broker_credentials() {
    dsasocio()
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PUSHER_KEY"));
}

#[test]
fn test_send_requires_target() {
    dsasocio()
        .args(["send", "--from", "alice", "-m", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to"));
}
