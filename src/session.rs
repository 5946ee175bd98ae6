//! The chat session loop.
//!
//! `Session` owns the established socket for one conversation and drives it
//! until either party leaves. Each tick it forwards completed keyboard lines
//! to the peer, then drains whatever the peer has sent, then parks until the
//! reactor sees the socket or the keyboard channel become ready again. The
//! loop itself never blocks; only the keyboard thread does.

use std::io;

use bytes::Bytes;
use tokio::net::TcpStream;
use tokio::prelude::*;

use BUF_CAP;
use LINES_PER_TICK;

/// Why a session ended. Every variant is terminal: once a session resolves,
/// no further sends or receives are attempted on its socket.
#[derive(Debug)]
pub enum SessionEnd {
    /// The peer closed the connection deliberately (zero-byte receive).
    PeerQuit,
    /// The peer dropped the connection abruptly.
    PeerReset,
    /// Local stdin reached EOF, so no more lines can ever be sent.
    InputClosed,
    /// Any other socket failure during the session.
    Fault(io::Error),
}

impl SessionEnd {
    /// The line shown to the user when the session is over.
    pub fn report(&self) -> String {
        match *self {
            SessionEnd::PeerQuit => "Other party quit!".to_string(),
            SessionEnd::PeerReset => "Other party disconnected!".to_string(),
            SessionEnd::InputClosed => "Input closed. Leaving chat.".to_string(),
            SessionEnd::Fault(ref err) => match err.raw_os_error() {
                Some(code) => format!("Socket Error! Code: {}", code),
                None => format!("Socket Error! {}", err),
            },
        }
    }
}

/// Classifies a socket error. A reset by the peer is reported distinctly
/// from any other failure; both end the session.
fn end_from_io(err: io::Error) -> SessionEnd {
    match err.kind() {
        io::ErrorKind::ConnectionReset | io::ErrorKind::BrokenPipe => SessionEnd::PeerReset,
        _ => SessionEnd::Fault(err),
    }
}

/// Formats one received chunk for the console. Non-unicode bytes are shown
/// lossily rather than dropped.
pub fn render_incoming(bytes: &[u8]) -> String {
    format!("They said: {}", String::from_utf8_lossy(bytes))
}

/// Drives one conversation over an established socket.
///
/// Generic over the line source so tests can feed scripted lines; the binary
/// uses [`::line::LineInput`]. Resolves with the [`SessionEnd`] describing
/// why the conversation is over. The `io::Error` arm is never produced;
/// socket failures are classified into the item instead so the caller gets
/// exactly one report per session.
pub struct Session<L> {
    socket: TcpStream,
    lines: L,
    /// A line accepted from the keyboard but not yet fully written.
    pending: Option<Bytes>,
    recv_buf: [u8; BUF_CAP],
}

impl<L> Session<L>
where
    L: Stream<Item = Bytes, Error = ()>,
{
    pub fn new(socket: TcpStream, lines: L) -> Session<L> {
        Session {
            socket,
            lines,
            pending: None,
            recv_buf: [0; BUF_CAP],
        }
    }

    /// Forwards completed keyboard lines to the peer. Returns `Some` when
    /// the session is over.
    fn pump_outbound(&mut self) -> Option<SessionEnd> {
        let mut budget = LINES_PER_TICK;
        loop {
            // Finish the line in flight before accepting another.
            if let Some(line) = self.pending.take() {
                match self.socket.poll_write(&line) {
                    Ok(Async::Ready(0)) => {
                        return Some(SessionEnd::Fault(io::Error::new(
                            io::ErrorKind::WriteZero,
                            "socket accepted no bytes",
                        )));
                    }
                    Ok(Async::Ready(written)) => {
                        if written < line.len() {
                            self.pending = Some(line.slice_from(written));
                        }
                    }
                    Ok(Async::NotReady) => {
                        self.pending = Some(line);
                        return None;
                    }
                    Err(err) => return Some(end_from_io(err)),
                }
                continue;
            }
            if budget == 0 {
                // Yield so a flood of lines cannot starve the inbound side.
                task::current().notify();
                return None;
            }
            budget -= 1;
            match self.lines.poll() {
                Ok(Async::Ready(Some(line))) => {
                    // An empty line is not a message.
                    if !line.is_empty() {
                        self.pending = Some(line);
                    }
                }
                Ok(Async::Ready(None)) | Err(()) => return Some(SessionEnd::InputClosed),
                Ok(Async::NotReady) => return None,
            }
        }
    }

    /// Drains and displays whatever the peer has sent. Returns `Some` when
    /// the session is over.
    fn pump_inbound(&mut self) -> Option<SessionEnd> {
        let mut budget = LINES_PER_TICK;
        loop {
            match self.socket.poll_read(&mut self.recv_buf) {
                // A graceful close by the peer, not an error.
                Ok(Async::Ready(0)) => return Some(SessionEnd::PeerQuit),
                Ok(Async::Ready(received)) => {
                    println!("{}", render_incoming(&self.recv_buf[..received]));
                    if budget == 0 {
                        task::current().notify();
                        return None;
                    }
                    budget -= 1;
                }
                Ok(Async::NotReady) => return None,
                Err(err) => return Some(end_from_io(err)),
            }
        }
    }
}

impl<L> Future for Session<L>
where
    L: Stream<Item = Bytes, Error = ()>,
{
    type Item = SessionEnd;
    type Error = io::Error;

    fn poll(&mut self) -> Poll<SessionEnd, io::Error> {
        if let Some(end) = self.pump_outbound() {
            return Ok(Async::Ready(end));
        }
        if let Some(end) = self.pump_inbound() {
            return Ok(Async::Ready(end));
        }
        Ok(Async::NotReady)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{end_from_io, render_incoming, SessionEnd};

    #[test]
    fn reset_is_reported_distinctly() {
        let end = end_from_io(io::Error::from(io::ErrorKind::ConnectionReset));
        match end {
            SessionEnd::PeerReset => {}
            other => panic!("expected PeerReset, got {:?}", other),
        }
        assert_eq!(end.report(), "Other party disconnected!");
    }

    #[test]
    fn broken_pipe_counts_as_reset() {
        match end_from_io(io::Error::from(io::ErrorKind::BrokenPipe)) {
            SessionEnd::PeerReset => {}
            other => panic!("expected PeerReset, got {:?}", other),
        }
    }

    #[test]
    fn other_errors_are_faults() {
        let end = end_from_io(io::Error::new(io::ErrorKind::Other, "boom"));
        match end {
            SessionEnd::Fault(_) => {}
            other => panic!("expected Fault, got {:?}", other),
        }
        assert!(end.report().starts_with("Socket Error!"));
    }

    #[test]
    fn fault_report_carries_os_code() {
        let end = end_from_io(io::Error::from_raw_os_error(98));
        match end {
            SessionEnd::Fault(_) => assert_eq!(end.report(), "Socket Error! Code: 98"),
            other => panic!("expected Fault, got {:?}", other),
        }
    }

    #[test]
    fn peer_quit_is_not_an_error_report() {
        assert_eq!(SessionEnd::PeerQuit.report(), "Other party quit!");
    }

    #[test]
    fn incoming_bytes_render_as_a_line() {
        assert_eq!(render_incoming(b"hello"), "They said: hello");
    }

    #[test]
    fn incoming_non_unicode_renders_lossily() {
        assert_eq!(render_incoming(&[0xff, b'h', b'i']), "They said: \u{fffd}hi");
    }
}
