//! Exit-status behavior of the binary around connection setup.

use std::net::TcpListener;
use std::process::{Command, Stdio};

/// A loopback port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn client_setup_failure_exits_nonzero() {
    let port = closed_port().to_string();
    let status = Command::new(env!("CARGO_BIN_EXE_pairchat"))
        .args(&["client", "--port", &port, "--address", "127.0.0.1"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn server_bind_failure_exits_nonzero() {
    // Hold the port open so the server's bind fails.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    let status = Command::new(env!("CARGO_BIN_EXE_pairchat"))
        .args(&["server", "--port", &port])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
    drop(listener);
}
