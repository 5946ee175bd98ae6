//! Keyboard input for an active chat session.
//!
//! Reading a line from the terminal blocks until the user presses enter, and
//! stdin cannot be registered with the reactor the way a socket can. The
//! blocking read therefore runs on a dedicated thread, and completed lines
//! are handed to the session over a channel. Sending on the channel is what
//! publishes "a line is ready"; the channel gives the session a
//! happens-before edge on the line contents, so no further synchronization
//! is needed.

use std::io::{self, BufRead};
use std::thread;

use bytes::Bytes;
use futures::sync::mpsc::{self, UnboundedReceiver};
use tokio::prelude::*;

use BUF_CAP;

/// Strips one trailing newline, then one trailing carriage return. Operates
/// on raw bytes so non-unicode keyboard input passes through untouched.
pub fn trim_line(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    line
}

/// Splits a completed line into send-sized messages of at most
/// `BUF_CAP - 1` bytes each. A line that fits yields itself; an oversized
/// line is delivered as successive messages with nothing discarded.
pub fn chunk_line(line: Vec<u8>) -> Vec<Bytes> {
    let mut rest = Bytes::from(line);
    let mut chunks = Vec::new();
    while rest.len() > BUF_CAP - 1 {
        chunks.push(rest.split_to(BUF_CAP - 1));
    }
    chunks.push(rest);
    chunks
}

/// A stream of completed, trimmed keyboard lines. A line longer than the
/// send buffer arrives as successive messages rather than being cut short.
///
/// Backed by a reader thread that blocks on stdin for the life of the
/// session. The thread retires when stdin reaches EOF, a read fails, or the
/// session side hangs up; the stream then ends. The thread is detached and
/// never blocks process exit.
pub struct LineInput {
    rx: UnboundedReceiver<Bytes>,
}

impl LineInput {
    /// Spawns the reader thread and returns the stream half.
    pub fn spawn() -> LineInput {
        let (tx, rx) = mpsc::unbounded();
        thread::spawn(move || {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            loop {
                let mut raw: Vec<u8> = Vec::new();
                match input.read_until(b'\n', &mut raw) {
                    // EOF. The user closed stdin; retire and end the stream.
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                let mut hung_up = false;
                for chunk in chunk_line(trim_line(raw)) {
                    if tx.unbounded_send(chunk).is_err() {
                        // The session is gone, nobody wants lines anymore.
                        hung_up = true;
                        break;
                    }
                }
                if hung_up {
                    break;
                }
            }
        });
        LineInput { rx }
    }
}

impl Stream for LineInput {
    type Item = Bytes;
    type Error = ();

    fn poll(&mut self) -> Poll<Option<Bytes>, ()> {
        self.rx.poll()
    }
}
