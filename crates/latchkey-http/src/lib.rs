//! Minimal HTTP front end for the lock.
//!
//! This crate serves one client at a time over a plain [`tokio::net::TcpListener`]
//! with a hand-rolled incremental request parser — no HTTP library. The
//! parser recognizes end-of-headers, detects POST bodies, and extracts the
//! single `pin` form field, all under a connection-level deadline.
//!
//! The crate is transport and parsing only: [`HttpService::poll`] yields an
//! [`Exchange`] carrying the parsed request, the caller decides what the
//! request does to the lock, and [`Exchange::respond`] writes the status
//! page and closes the connection. Business logic stays in the scheduler.

pub mod error;
pub mod page;
pub mod parser;
pub mod service;

pub use error::HttpError;
pub use page::render_page;
pub use parser::{ParsedRequest, RequestParser, RouteAction};
pub use service::{Exchange, HttpService};
