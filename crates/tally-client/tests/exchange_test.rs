//! Client exchanges against a stand-in server on loopback.
//!
//! The stand-in receives one payload and replies with it upper-cased, so
//! these tests cover the client side without the statistics server.

use std::fs;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tally_client::{ClientConfig, ClientError, exchange, send_file};
use tally_transfer::{NullLogger, PeerSocket, Session, TransferError, TransferLogger};

fn null_logger() -> Arc<dyn TransferLogger> {
    Arc::new(NullLogger)
}

/// Serve one upper-casing exchange, then exit.
fn spawn_upper_server() -> (SocketAddr, thread::JoinHandle<Vec<u8>>) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(50)))
        .unwrap();
    let addr = socket.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let received = Session::new(&socket, "stand-in").receive().unwrap();
        let reply = received.payload.to_ascii_uppercase();
        Session::new(PeerSocket::new(&socket, received.peer), "stand-in")
            .send(&reply)
            .unwrap();
        received.payload
    });

    (addr, handle)
}

fn temp_file(name: &str, content: &[u8]) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("tally_client_test_{}", std::process::id()));
    let _ = fs::create_dir_all(&dir);
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn exchange_round_trip() {
    let (addr, server) = spawn_upper_server();

    let reply = exchange(&addr.to_string(), b"hello world hello", null_logger()).unwrap();

    assert_eq!(reply, "HELLO WORLD HELLO");
    assert_eq!(server.join().unwrap(), b"hello world hello");
}

#[test]
fn exchange_multi_chunk_payload() {
    let (addr, server) = spawn_upper_server();
    let payload: Vec<u8> = (0..10_000).map(|i| b'a' + (i % 26) as u8).collect();

    let reply = exchange(&addr.to_string(), &payload, null_logger()).unwrap();

    assert_eq!(reply.as_bytes(), payload.to_ascii_uppercase());
    assert_eq!(server.join().unwrap(), payload);
}

#[test]
fn send_file_reads_content() {
    let (addr, server) = spawn_upper_server();
    let path = temp_file("notes.txt", b"some notes\n");
    let config = ClientConfig {
        host: "127.0.0.1".into(),
        port: addr.port().to_string(),
    };

    let reply = send_file(&config, &path, null_logger()).unwrap();

    assert_eq!(reply, "SOME NOTES\n");
    assert_eq!(server.join().unwrap(), b"some notes\n");
    let _ = fs::remove_file(&path);
}

#[test]
fn send_file_rejects_empty_file() {
    let path = temp_file("empty.txt", b"");
    let config = ClientConfig {
        host: "127.0.0.1".into(),
        port: "9".into(),
    };

    let result = send_file(&config, &path, null_logger());

    assert!(matches!(result, Err(ClientError::EmptyFile { .. })));
    let _ = fs::remove_file(&path);
}

#[test]
fn send_file_missing_file() {
    let config = ClientConfig {
        host: "127.0.0.1".into(),
        port: "9".into(),
    };
    let path = std::env::temp_dir().join("tally_client_test_does_not_exist.txt");

    let result = send_file(&config, &path, null_logger());

    assert!(matches!(result, Err(ClientError::ReadFile { .. })));
    assert!(!result.unwrap_err().is_fatal());
}

#[test]
fn unresolvable_target_is_fatal() {
    let result = exchange("no-such-host.invalid:8081", b"x", null_logger());

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transfer(TransferError::Resolve { .. })
    ));
    assert!(err.is_fatal());
}
