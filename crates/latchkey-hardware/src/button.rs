//! One-sample edge detection for the push-button.
//!
//! The detector samples the button once per scheduler tick and reports a
//! press edge exactly once per physical press: the transition from released
//! to pressed. There is no debounce timer beyond this one-sample edge
//! detection, so a bouncy switch can register spurious extra presses — a
//! known limitation of the reference hardware, kept as-is.

use crate::error::Result;
use crate::traits::ButtonInput;

/// Result of one button sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonSample {
    /// Logical pressed state at this sample.
    pub pressed: bool,

    /// `true` exactly on the released-to-pressed transition.
    pub edge: bool,
}

/// Edge detector over a [`ButtonInput`].
///
/// Holds the previous sample; the initial previous state is "released", so a
/// button held down at boot registers one press edge on the first tick.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::EdgeDetector;
/// use latchkey_hardware::mock::MockButton;
///
/// # async fn example() -> latchkey_hardware::Result<()> {
/// let (button, handle) = MockButton::new();
/// let mut detector = EdgeDetector::new(button);
///
/// handle.press();
/// assert!(detector.sample().await?.edge);
/// assert!(!detector.sample().await?.edge); // still held, no new edge
///
/// handle.release();
/// assert!(!detector.sample().await?.edge);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EdgeDetector<B: ButtonInput> {
    button: B,
    last_pressed: bool,
}

impl<B: ButtonInput> EdgeDetector<B> {
    /// Wrap a button input. The previous state starts as released.
    pub fn new(button: B) -> Self {
        Self {
            button,
            last_pressed: false,
        }
    }

    /// Sample the button once and report the current level and any edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input cannot be read.
    pub async fn sample(&mut self) -> Result<ButtonSample> {
        let pressed = self.button.is_pressed().await?;
        let edge = pressed && !self.last_pressed;
        self.last_pressed = pressed;
        Ok(ButtonSample { pressed, edge })
    }
}
