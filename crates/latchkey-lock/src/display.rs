//! Transient status display over a [`TextPanel`] sink.
//!
//! The display shows one message at a time. Persistent messages (keypad
//! echo) stay until replaced; transient messages (state changes, rejection
//! notices) carry an expiry and revert to the idle message when `update()`
//! runs in the timeout phase of a scheduler tick. Glyph size is picked per
//! message by the [`TextSize`] tier rule.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use latchkey_hardware::mock::{Journal, MockPanel};
//! use latchkey_lock::StatusDisplay;
//!
//! # async fn example() -> latchkey_hardware::Result<()> {
//! let journal = Journal::new();
//! let mut display = StatusDisplay::new(MockPanel::new(&journal));
//! display.init().await?;
//!
//! display.show_temporary("Unlocked", Duration::from_secs(2)).await?;
//! assert_eq!(display.current_text(), "Unlocked");
//!
//! // After the hold elapses, update() reverts to the idle message.
//! # Ok(())
//! # }
//! ```

use std::time::{Duration, Instant};

use latchkey_core::constants::IDLE_MESSAGE;
use latchkey_hardware::{Result, TextPanel, TextSize};

/// Status display with an idle message and optional transient message.
#[derive(Debug)]
pub struct StatusDisplay<P: TextPanel> {
    panel: P,

    /// Message shown when nothing transient is active.
    idle_message: String,

    /// Currently displayed text.
    current: String,

    /// Expiry of the active transient message, if any.
    expires_at: Option<Instant>,
}

impl<P: TextPanel> StatusDisplay<P> {
    /// Create a display with the default idle message. Nothing is rendered
    /// until [`init`](Self::init) runs.
    pub fn new(panel: P) -> Self {
        Self::with_idle_message(panel, IDLE_MESSAGE)
    }

    /// Create a display with a custom idle message.
    pub fn with_idle_message(panel: P, idle_message: impl Into<String>) -> Self {
        let idle_message = idle_message.into();
        Self {
            panel,
            current: idle_message.clone(),
            idle_message,
            expires_at: None,
        }
    }

    /// Bring up the panel and render the idle message.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel does not initialize. The application
    /// treats this as unrecoverable: a lock with no user feedback must not
    /// run.
    pub async fn init(&mut self) -> Result<()> {
        self.panel.init().await?;
        self.render_current().await
    }

    /// Show a persistent message (stays until replaced or reset).
    ///
    /// # Errors
    ///
    /// Returns an error if the panel cannot be driven.
    pub async fn show(&mut self, text: &str) -> Result<()> {
        self.current = text.to_string();
        self.expires_at = None;
        self.render_current().await
    }

    /// Show a message that reverts to the idle message after `hold`.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel cannot be driven.
    pub async fn show_temporary(&mut self, text: &str, hold: Duration) -> Result<()> {
        self.current = text.to_string();
        self.expires_at = Some(Instant::now() + hold);
        self.render_current().await
    }

    /// Revert to the idle message immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel cannot be driven.
    pub async fn reset_idle(&mut self) -> Result<()> {
        self.current = self.idle_message.clone();
        self.expires_at = None;
        self.render_current().await
    }

    /// Expire the transient message if its hold has elapsed.
    ///
    /// Call once per scheduler tick. Returns `true` if the display content
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel cannot be driven.
    pub async fn update(&mut self) -> Result<bool> {
        if let Some(expires_at) = self.expires_at
            && Instant::now() >= expires_at
        {
            self.reset_idle().await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Currently displayed text.
    pub fn current_text(&self) -> &str {
        &self.current
    }

    /// Whether the idle message is showing with no transient pending.
    pub fn is_idle(&self) -> bool {
        self.expires_at.is_none() && self.current == self.idle_message
    }

    async fn render_current(&mut self) -> Result<()> {
        let size = TextSize::for_message(&self.current);
        self.panel.render(&self.current, size).await
    }
}
