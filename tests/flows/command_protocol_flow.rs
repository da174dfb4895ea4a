#[path = "../common/mod.rs"]
mod common;

use common::fixtures::{command_server_test_port, TestAddresses};
use common::test_server::{CommandClient, CommandHarness};

/// Exercises the command-server wire protocol end to end, minus the TLS
/// handshake itself: the real `CommandServer` takes loopback peers down the
/// plaintext branch regardless of `allow_plaintext_commands`, so this
/// covers the same one-line-in, one-response-out contract the TLS+AES path
/// wraps around.
#[tokio::test]
async fn list_block_unblock_round_trip() {
    let port = command_server_test_port();
    let harness = CommandHarness::start(port).await;
    let mut client = CommandClient::connect(port)
        .await
        .expect("failed to connect to command server");

    let addr = TestAddresses::rate_offender();

    let response = client.send_line("list").await.unwrap();
    assert!(!response.to_lowercase().contains(&addr.to_string()));

    let response = client.send_line(&format!("block {addr}")).await.unwrap();
    assert!(!response.to_lowercase().contains("error"), "unexpected error: {response}");
    assert!(harness.is_blocked(addr));
    assert_eq!(harness.block_count(), 1);

    let response = client.send_line("list").await.unwrap();
    assert!(response.contains(&addr.to_string()));

    let response = client.send_line(&format!("unblock {addr}")).await.unwrap();
    assert!(!response.to_lowercase().contains("error"), "unexpected error: {response}");
    assert!(!harness.is_blocked(addr));

    harness.stop();
}

#[tokio::test]
async fn unknown_command_is_reported_textually_not_fatally() {
    let port = command_server_test_port() + 1;
    let harness = CommandHarness::start(port).await;
    let mut client = CommandClient::connect(port).await.unwrap();

    let response = client.send_line("definitely-not-a-real-command").await.unwrap();
    assert!(response.to_lowercase().contains("unknown"));

    // the connection and the server must both still be usable afterward
    let response = client.send_line("help").await.unwrap();
    assert!(!response.is_empty());

    harness.stop();
}
