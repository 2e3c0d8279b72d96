//! Single-connection HTTP service.
//!
//! One client is processed at a time, inline in the scheduler tick that
//! accepted it. The read loop pulls bytes one at a time through the
//! incremental parser under a connection deadline; a request that does not
//! complete its headers in time is dropped without a response. This means a
//! slow client can legitimately occupy the scheduler for up to the full
//! deadline — the documented starvation trade-off of the cooperative loop.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use latchkey_core::LockState;
use latchkey_core::constants::{HTTP_BODY_GRACE, HTTP_CONNECTION_TIMEOUT};

use crate::error::HttpError;
use crate::page::render_page;
use crate::parser::{ParsedRequest, RequestParser};

/// How long `poll` waits for a pending connection before reporting none.
const ACCEPT_PROBE: Duration = Duration::from_millis(1);

/// How long the body drain waits for further bytes before giving up.
const DRAIN_PROBE: Duration = Duration::from_millis(1);

/// Read chunk size for the POST body drain.
const DRAIN_CHUNK: usize = 256;

/// HTTP front end for the lock.
///
/// # Example
///
/// ```no_run
/// use latchkey_core::LockState;
/// use latchkey_http::HttpService;
///
/// # async fn example() -> Result<(), latchkey_http::HttpError> {
/// let mut service = HttpService::bind("0.0.0.0:80".parse().unwrap()).await?;
///
/// // In the scheduler tick:
/// if let Some(exchange) = service.poll().await? {
///     // ...decide what the request does to the lock...
///     exchange.respond(LockState::Unlocked, false).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpService {
    listener: TcpListener,
    connection_timeout: Duration,
    body_grace: Duration,
}

impl HttpService {
    /// Bind the service to the given address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is in use or cannot be bound.
    pub async fn bind(addr: SocketAddr) -> Result<Self, HttpError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|_| HttpError::BindFailed(addr))?;

        info!("http service listening on {}", addr);

        Ok(Self {
            listener,
            connection_timeout: HTTP_CONNECTION_TIMEOUT,
            body_grace: HTTP_BODY_GRACE,
        })
    }

    /// Override the connection deadline and body grace (shortened in tests).
    pub fn with_timeouts(mut self, connection_timeout: Duration, body_grace: Duration) -> Self {
        self.connection_timeout = connection_timeout;
        self.body_grace = body_grace;
        self
    }

    /// The locally bound address; useful when binding port 0 in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener socket is gone.
    pub fn local_addr(&self) -> Result<SocketAddr, HttpError> {
        self.listener.local_addr().map_err(Into::into)
    }

    /// Serve at most one pending connection through its read phase.
    ///
    /// Probes the listener briefly; with no client waiting this returns
    /// `None` almost immediately. With a client, the whole header read (and
    /// POST body drain) happens inline before returning, bounded by the
    /// connection deadline. A connection that times out, closes early, or
    /// overruns the buffer limit is dropped silently and `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error only for listener-level I/O failures; per-connection
    /// read errors close that connection and are not propagated.
    pub async fn poll(&mut self) -> Result<Option<Exchange>, HttpError> {
        let (mut stream, addr) = match timeout(ACCEPT_PROBE, self.listener.accept()).await {
            Err(_) => return Ok(None),
            Ok(Ok(accepted)) => accepted,
            Ok(Err(error)) => return Err(error.into()),
        };
        debug!(%addr, "new http client");

        let deadline = Instant::now() + self.connection_timeout;
        let mut parser = RequestParser::new();
        let mut byte = [0u8; 1];

        loop {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                debug!(%addr, "connection deadline elapsed before end of headers");
                return Ok(None);
            };

            match timeout(remaining, stream.read(&mut byte)).await {
                Err(_) => {
                    debug!(%addr, "connection deadline elapsed before end of headers");
                    return Ok(None);
                }
                Ok(Ok(0)) => {
                    debug!(%addr, "client closed before end of headers");
                    return Ok(None);
                }
                Ok(Ok(_)) => {
                    if parser.feed(byte[0]) {
                        break;
                    }
                    if parser.overflowed() {
                        warn!(%addr, "request exceeded buffer limit, dropping connection");
                        return Ok(None);
                    }
                }
                Ok(Err(error)) => {
                    debug!(%addr, %error, "read failed, dropping connection");
                    return Ok(None);
                }
            }
        }

        if parser.is_post() {
            // Give body bytes time to arrive, then take whatever is there.
            sleep(self.body_grace).await;
            let mut chunk = [0u8; DRAIN_CHUNK];
            loop {
                match timeout(DRAIN_PROBE, stream.read(&mut chunk)).await {
                    Ok(Ok(0)) | Err(_) | Ok(Err(_)) => break,
                    Ok(Ok(n)) => parser.absorb_body(&chunk[..n]),
                }
            }
        }

        let request = parser.into_request();
        debug!(
            %addr,
            line = %request.request_line(),
            post = request.is_post(),
            pin_present = !request.pin().is_empty(),
            "request read"
        );

        Ok(Some(Exchange {
            stream,
            addr,
            request,
        }))
    }
}

/// A connection that finished its read phase and awaits its response.
///
/// Consumed by [`respond`](Self::respond); dropping it closes the connection
/// without a response.
#[derive(Debug)]
pub struct Exchange {
    stream: TcpStream,
    addr: SocketAddr,
    request: ParsedRequest,
}

impl Exchange {
    /// The parsed request.
    pub fn request(&self) -> &ParsedRequest {
        &self.request
    }

    /// The client's address.
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Write the status page and close the connection.
    ///
    /// The connection closes after one response regardless of any keep-alive
    /// headers the client sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the response cannot be written.
    pub async fn respond(mut self, state: LockState, invalid_pin: bool) -> Result<(), HttpError> {
        let page = render_page(state, invalid_pin);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-type:text/html\r\nConnection: close\r\n\r\n{page}"
        );

        self.stream.write_all(response.as_bytes()).await?;
        self.stream.shutdown().await?;
        debug!(addr = %self.addr, "client disconnected");
        Ok(())
    }
}
