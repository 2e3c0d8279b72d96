//! Mock keypad implementation for testing and development.
//!
//! This module provides a simulated keypad that is fed programmatically
//! through a handle. Unlike a blocking reader, the device side exposes the
//! non-blocking [`KeypadPort::poll_key`] the scheduler expects: one pending
//! key per call, `None` when idle.

use crate::{
    Result,
    traits::{KeypadKey, KeypadPort},
    types::DeviceInfo,
};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Mock keypad device for testing and development.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockKeypad;
/// use latchkey_hardware::{KeypadKey, KeypadPort};
///
/// # async fn example() -> latchkey_hardware::Result<()> {
/// let (mut keypad, handle) = MockKeypad::new();
///
/// handle.send_key(KeypadKey::Digit(1)).await?;
/// handle.send_key(KeypadKey::Hash).await?;
///
/// assert_eq!(keypad.poll_key().await?, Some(KeypadKey::Digit(1)));
/// assert_eq!(keypad.poll_key().await?, Some(KeypadKey::Hash));
/// assert_eq!(keypad.poll_key().await?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated input
    input_rx: mpsc::Receiver<KeypadKey>,

    /// Device name
    name: String,
}

impl MockKeypad {
    /// Create a new mock keypad with the default name.
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a new mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (input_tx, input_rx) = mpsc::channel(32);

        let keypad = Self {
            input_rx,
            name: name.clone(),
        };

        let handle = MockKeypadHandle { input_tx, name };

        (keypad, handle)
    }

    /// Get device information.
    pub fn info(&self) -> DeviceInfo {
        DeviceInfo::new(self.name.clone(), "Mock Keypad v1.0").with_firmware_version("1.0.0")
    }
}

impl KeypadPort for MockKeypad {
    async fn poll_key(&mut self) -> Result<Option<KeypadKey>> {
        match self.input_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(crate::HardwareError::disconnected(
                "keypad input channel closed",
            )),
        }
    }
}

/// Handle for feeding a [`MockKeypad`]. Cloneable and shareable across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated input
    input_tx: mpsc::Sender<KeypadKey>,

    /// Device name
    name: String,
}

impl MockKeypadHandle {
    /// Send a single key event to the mock keypad.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped and the channel is closed.
    pub async fn send_key(&self, key: KeypadKey) -> Result<()> {
        self.input_tx
            .send(key)
            .await
            .map_err(|_| crate::HardwareError::disconnected("keypad input channel closed"))
    }

    /// Send a sequence of digit keys.
    ///
    /// # Errors
    ///
    /// Returns an error if any digit is greater than 9 or the channel is closed.
    pub async fn send_digits(&self, digits: &[u8]) -> Result<()> {
        for &digit in digits {
            let key = KeypadKey::digit(digit)?;
            self.send_key(key).await?;
        }
        Ok(())
    }

    /// Send a complete code entry: digits followed by `#`.
    ///
    /// # Errors
    ///
    /// Returns an error if any digit is greater than 9 or the channel is closed.
    pub async fn send_entry(&self, digits: &[u8]) -> Result<()> {
        self.send_digits(digits).await?;
        self.send_key(KeypadKey::Hash).await?;
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
