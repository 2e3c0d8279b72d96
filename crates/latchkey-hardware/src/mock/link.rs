//! Mock WiFi link for testing and development.

use crate::traits::NetworkLink;
use crate::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock station link whose association state is flipped through a
/// [`MockLinkHandle`]. `reconnect` always succeeds and re-associates.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockLink;
/// use latchkey_hardware::NetworkLink;
///
/// # async fn example() -> latchkey_hardware::Result<()> {
/// let (mut link, handle) = MockLink::new();
/// assert!(link.is_connected().await);
///
/// handle.drop_link();
/// assert!(!link.is_connected().await);
///
/// link.reconnect().await?;
/// assert!(link.is_connected().await);
/// assert_eq!(handle.reconnect_attempts(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockLink {
    connected: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
}

impl MockLink {
    /// Create an associated mock link and its control handle.
    pub fn new() -> (Self, MockLinkHandle) {
        let connected = Arc::new(AtomicBool::new(true));
        let attempts = Arc::new(AtomicUsize::new(0));
        let link = Self {
            connected: Arc::clone(&connected),
            attempts: Arc::clone(&attempts),
        };
        (link, MockLinkHandle { connected, attempts })
    }
}

impl NetworkLink for MockLink {
    async fn is_connected(&mut self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn reconnect(&mut self) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Handle for controlling and observing a [`MockLink`].
#[derive(Debug, Clone)]
pub struct MockLinkHandle {
    connected: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
}

impl MockLinkHandle {
    /// Simulate losing the association.
    pub fn drop_link(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Whether the link is currently associated.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// How many reconnect attempts the link has seen.
    pub fn reconnect_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}
