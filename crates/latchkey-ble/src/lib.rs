//! BLE command sink.
//!
//! The radio stack delivers GATT events from outside the scheduler's control
//! flow; this crate is the boundary between that asynchronous world and the
//! cooperative loop. Writes land in a single-slot [`RxMailbox`] through the
//! [`SinkCallbacks`] capability object; the scheduler drains the mailbox on
//! a gated once-per-second tick.

pub mod error;
pub mod mailbox;
pub mod sink;

pub use error::{BleError, Result};
pub use mailbox::RxMailbox;
pub use sink::{BleCommandSink, LinkEvents, NotifySink, SinkCallbacks};
