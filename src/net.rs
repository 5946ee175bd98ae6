//! Connection setup for both chat roles.
//!
//! A session needs exactly one established socket. The server role binds,
//! listens, and accepts a single peer; the client role connects out to a
//! server's IPv4 address. Either way the caller gets a future resolving to
//! the `TcpStream` the session will own. Dropping the stream (or the
//! listener) releases the connection.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use tokio::net::{TcpListener, TcpStream};
use tokio::prelude::*;

/// A pending connection: resolves to the established socket or the setup
/// failure that prevented the chat from starting.
pub type Establish = Box<Future<Item = TcpStream, Error = io::Error> + Send>;

/// Opens an outbound stream to the given IPv4 address and port.
pub fn connect(port: u16, ip: Ipv4Addr) -> Establish {
    let addr = SocketAddr::V4(SocketAddrV4::new(ip, port));
    Box::new(TcpStream::connect(&addr))
}

/// Binds the port on all interfaces and accepts exactly one inbound
/// connection. Bind and listen failures surface immediately; accept
/// failures surface through the returned future. The listener is closed
/// once the first peer is accepted, so nobody else can join the session.
pub fn listen(port: u16) -> io::Result<Establish> {
    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(0, 0, 0, 0), port));
    let listener = TcpListener::bind(&addr)?;
    Ok(Box::new(
        listener
            .incoming()
            .into_future()
            .map_err(|(err, _incoming)| err)
            .and_then(|(socket, _incoming)| {
                socket.ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::Other,
                        "listener closed before a client connected",
                    )
                })
            }),
    ))
}
