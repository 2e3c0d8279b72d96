//! Mock push-button for testing and development.

use crate::{Result, traits::ButtonInput};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Mock push-button whose level is driven through a [`MockButtonHandle`].
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockButton;
/// use latchkey_hardware::ButtonInput;
///
/// # async fn example() -> latchkey_hardware::Result<()> {
/// let (mut button, handle) = MockButton::new();
///
/// assert!(!button.is_pressed().await?);
/// handle.press();
/// assert!(button.is_pressed().await?);
/// handle.release();
/// assert!(!button.is_pressed().await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockButton {
    pressed: Arc<AtomicBool>,
}

impl MockButton {
    /// Create a released mock button and its control handle.
    pub fn new() -> (Self, MockButtonHandle) {
        let pressed = Arc::new(AtomicBool::new(false));
        let button = Self {
            pressed: Arc::clone(&pressed),
        };
        (button, MockButtonHandle { pressed })
    }
}

impl ButtonInput for MockButton {
    async fn is_pressed(&mut self) -> Result<bool> {
        Ok(self.pressed.load(Ordering::SeqCst))
    }
}

/// Handle for driving a [`MockButton`]. Cloneable; clones drive the same
/// button.
#[derive(Debug, Clone)]
pub struct MockButtonHandle {
    pressed: Arc<AtomicBool>,
}

impl MockButtonHandle {
    /// Press and hold the button.
    pub fn press(&self) {
        self.pressed.store(true, Ordering::SeqCst);
    }

    /// Release the button.
    pub fn release(&self) {
        self.pressed.store(false, Ordering::SeqCst);
    }

    /// Set the pressed state directly.
    pub fn set_pressed(&self, pressed: bool) {
        self.pressed.store(pressed, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_button_level() {
        let (mut button, handle) = MockButton::new();

        assert!(!button.is_pressed().await.unwrap());

        handle.press();
        assert!(button.is_pressed().await.unwrap());

        handle.release();
        assert!(!button.is_pressed().await.unwrap());

        handle.set_pressed(true);
        assert!(button.is_pressed().await.unwrap());
    }
}
