//! Incremental HTTP request parser.
//!
//! This module provides a stateful parser capable of handling a request
//! arriving one byte at a time from a socket. The parser accumulates bytes
//! in an internal buffer and tracks the current header line; an empty header
//! line (two consecutive line terminators) marks end-of-headers.
//!
//! # Parsing model
//!
//! ```text
//! ┌──────────────┐ first '\n'  ┌─────────────────┐ empty line  ┌───────────────┐
//! │ request line │────────────>│ header lines    │────────────>│ headers done  │
//! │ (POST check) │             │ (accumulated)   │             │ (+ body drain)│
//! └──────────────┘             └─────────────────┘             └───────────────┘
//! ```
//!
//! Bytes keep accumulating into one flat buffer; the `pin` field and the
//! route are found by substring scans over the whole buffer afterwards, so a
//! PIN supplied in a query string, a header, or a POST body all work the
//! same way. Carriage returns are kept in the buffer but never enter the
//! current-line tracking.
//!
//! # Buffer growth
//!
//! A stream that grows past [`MAX_REQUEST_SIZE`] without completing its
//! headers marks the parser overflowed; the service treats that connection
//! like a timed-out one and drops it without a response.
//!
//! # Examples
//!
//! ```
//! use latchkey_http::{RequestParser, RouteAction};
//!
//! let mut parser = RequestParser::new();
//! for &byte in b"POST /unlock HTTP/1.1\r\nHost: x\r\n\r\n" {
//!     if parser.feed(byte) {
//!         break;
//!     }
//! }
//! parser.absorb_body(b"pin=1234");
//!
//! let request = parser.into_request();
//! assert!(request.is_post());
//! assert_eq!(request.action(), Some(RouteAction::Unlock));
//! assert_eq!(request.pin(), "1234");
//! ```

use latchkey_core::constants::{MAX_REQUEST_SIZE, PIN_FIELD_KEY};

/// What the request asks the lock to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    /// `/lock` appeared in the request.
    Lock,

    /// `/unlock` appeared in the request.
    Unlock,
}

/// Stateful byte-at-a-time request parser.
#[derive(Debug, Default)]
pub struct RequestParser {
    /// Everything received so far, header and body bytes alike.
    request: String,

    /// The header line currently being read (no terminators).
    current_line: String,

    /// Whether the request line has been completed.
    first_line_done: bool,

    /// Whether the request line began with `POST`.
    is_post: bool,

    /// Whether the empty header line has been seen.
    headers_complete: bool,

    /// Whether the buffer limit was hit before headers completed.
    overflowed: bool,
}

impl RequestParser {
    /// Create an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte from the header phase of the connection.
    ///
    /// Returns `true` once end-of-headers has been seen; further bytes for
    /// the body should go through [`absorb_body`](Self::absorb_body).
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.headers_complete {
            return true;
        }
        if self.request.len() >= MAX_REQUEST_SIZE {
            self.overflowed = true;
            return false;
        }
        self.request.push(char::from(byte));

        match byte {
            b'\n' => {
                if self.current_line.is_empty() {
                    self.headers_complete = true;
                    return true;
                }
                if !self.first_line_done {
                    self.is_post = self.current_line.starts_with("POST");
                    self.first_line_done = true;
                }
                self.current_line.clear();
            }
            b'\r' => {}
            _ => self.current_line.push(char::from(byte)),
        }
        false
    }

    /// Append body bytes after end-of-headers.
    pub fn absorb_body(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.request.len() >= MAX_REQUEST_SIZE {
                self.overflowed = true;
                return;
            }
            self.request.push(char::from(byte));
        }
    }

    /// Whether the request line began with `POST`.
    pub fn is_post(&self) -> bool {
        self.is_post
    }

    /// Whether end-of-headers has been seen.
    pub fn headers_complete(&self) -> bool {
        self.headers_complete
    }

    /// Whether the buffer limit was hit.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Finish parsing and extract the routed request.
    pub fn into_request(self) -> ParsedRequest {
        let request_line = self
            .request
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        let pin = extract_pin(&self.request);
        let action = route(&self.request);

        ParsedRequest {
            is_post: self.is_post,
            request_line,
            pin,
            action,
        }
    }
}

/// One fully-read request, reduced to what the lock cares about.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    is_post: bool,
    request_line: String,
    pin: String,
    action: Option<RouteAction>,
}

impl ParsedRequest {
    /// Whether this was a POST.
    pub fn is_post(&self) -> bool {
        self.is_post
    }

    /// The raw request line, for logging.
    pub fn request_line(&self) -> &str {
        &self.request_line
    }

    /// The extracted `pin` value; empty when the field was absent.
    pub fn pin(&self) -> &str {
        &self.pin
    }

    /// The requested action, if any route substring matched.
    pub fn action(&self) -> Option<RouteAction> {
        self.action
    }
}

/// Scan the accumulated request for the `pin` field.
///
/// Copies characters after `pin=` until `&`, CR, LF, or end-of-buffer.
/// An absent field yields an empty string.
fn extract_pin(request: &str) -> String {
    match request.find(PIN_FIELD_KEY) {
        None => String::new(),
        Some(index) => request[index + PIN_FIELD_KEY.len()..]
            .chars()
            .take_while(|c| !matches!(c, '&' | '\r' | '\n'))
            .collect(),
    }
}

/// Route by substring presence anywhere in the accumulated request.
///
/// `/lock` is checked first, matching the reference firmware's order.
fn route(request: &str) -> Option<RouteAction> {
    if request.contains("/lock") {
        Some(RouteAction::Lock)
    } else if request.contains("/unlock") {
        Some(RouteAction::Unlock)
    } else {
        None
    }
}
