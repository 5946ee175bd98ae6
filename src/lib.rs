//! # A two-party real-time chat over a single TCP connection.
//!
//! One process runs as the SERVER (binds a port and accepts exactly one
//! peer), the other as the CLIENT (connects to the server's IPv4 address and
//! port). Once the connection is up both ends behave identically: whatever
//! line you type is sent to the other party as raw bytes, and whatever the
//! other party sends is printed to your console. The conversation ends when
//! either side closes the connection or a socket error occurs.
//!
//! There is no framing on the wire. A completed keyboard line (terminator
//! stripped) is sent as one chunk, and whatever chunk `recv` hands back is
//! displayed as one line. Both directions are bounded by a 300 byte buffer.
//!
//! Architecture:
//!
//! +-------+   reader thread    +-----------+
//! | stdin |--read_until('\n')->| LineInput |
//! +-------+                    +-----------+
//!                                    |
//!                          UnboundedBytesChannel
//!                                    v
//!                              +---------+           +-----------+
//!                              | Session |<--bytes-->| TcpStream |
//!                              +---------+           +-----------+
//!                                    |
//!                                    v
//!                                 stdout
//!
//! The keyboard is the one input that cannot be polled without blocking, so
//! it lives on its own thread; everything else is driven by the `Session`
//! future on the tokio runtime.

extern crate bytes;
extern crate futures;
extern crate tokio;

pub mod line;
pub mod net;
pub mod prompt;
pub mod session;

/// Capacity of the send and receive buffers. A keyboard line is capped at
/// `BUF_CAP - 1` bytes after its terminator is stripped, and one receive
/// consumes at most `BUF_CAP` bytes.
pub const BUF_CAP: usize = 300;

// Tokio (and futures) use cooperative scheduling without any
// preemption. If a task never yields execution back to the executor,
// then other tasks may be starved.
//
// To deal with this, robust applications should not have any unbounded
// loops. The session loop processes at most `LINES_PER_TICK` keyboard
// lines, and as many inbound reads, on each tick.
//
// If the limit is hit, the current task is notified, informing the
// executor to schedule the task again asap.
pub const LINES_PER_TICK: usize = 10;
