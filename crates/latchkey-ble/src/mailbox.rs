//! Single-slot receive mailbox.
//!
//! The radio stack's write callback is the producer; the BLE tick is the
//! consumer. The slot has replace-wholesale semantics: a second write before
//! the next tick overwrites the first, exactly like the shared receive
//! string in the reference firmware. The mutex is held only for the swap, so
//! the producer never blocks for longer than one pointer-sized exchange.

use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to the single payload slot. Clones share the slot.
///
/// # Examples
///
/// ```
/// use latchkey_ble::RxMailbox;
///
/// let mailbox = RxMailbox::new();
/// let producer = mailbox.clone();
///
/// producer.store("1111");
/// producer.store("2222"); // replaces, does not queue
///
/// assert_eq!(mailbox.take(), Some("2222".to_string()));
/// assert_eq!(mailbox.take(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RxMailbox {
    slot: Arc<Mutex<Option<String>>>,
}

impl RxMailbox {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot contents wholesale.
    pub fn store(&self, payload: impl Into<String>) {
        *self.lock() = Some(payload.into());
    }

    /// Take the payload, leaving the slot empty.
    pub fn take(&self) -> Option<String> {
        self.lock().take()
    }

    /// Whether a payload is waiting.
    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
