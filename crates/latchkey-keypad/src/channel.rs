//! Keypad channel state machine.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use latchkey_core::constants::{KEYPAD_INACTIVITY, MESSAGE_HOLD, WRONG_CODE_MESSAGE};
use latchkey_core::{LockState, TogglePolicy, ToggleRequest, ToggleSource, UnlockCode};
use latchkey_hardware::{KeypadKey, KeypadPort, Result, Sounder, TextPanel};
use latchkey_lock::cues::{self, Cue};
use latchkey_lock::display::StatusDisplay;

/// Buffered keypad entry channel.
///
/// Owns the keypad port and the entry buffer. The scheduler calls
/// [`poll`](Self::poll) once per tick to consume at most one pending key,
/// and [`sweep`](Self::sweep) in the tick's timeout phase to discard stale
/// entries.
///
/// The buffer is always empty immediately after a `#` or `*` key, whatever
/// the outcome.
#[derive(Debug)]
pub struct KeypadChannel<K: KeypadPort> {
    port: K,
    buffer: String,
    last_key_at: Option<Instant>,
    inactivity_window: Duration,
    message_hold: Duration,
}

impl<K: KeypadPort> KeypadChannel<K> {
    /// Create a channel with the standard inactivity window and message hold.
    pub fn new(port: K) -> Self {
        Self::with_windows(port, KEYPAD_INACTIVITY, MESSAGE_HOLD)
    }

    /// Create a channel with custom windows (shortened in tests).
    pub fn with_windows(port: K, inactivity_window: Duration, message_hold: Duration) -> Self {
        Self {
            port,
            buffer: String::new(),
            last_key_at: None,
            inactivity_window,
            message_hold,
        }
    }

    /// Current buffer contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Consume at most one pending key and advance the entry state machine.
    ///
    /// Returns a toggle request when a submission should reach the
    /// controller:
    /// - `#` with a matching code while `Locked` → `{OnlyIfLocked,
    ///   code_matched: true}`;
    /// - `*` while `Unlocked` → `{OnlyIfUnlocked}`.
    ///
    /// A rejected `#` (wrong code, or right code while already unlocked)
    /// plays the lock cue and shows the rejection notice here; no request is
    /// emitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the port, sounder, or display cannot be driven.
    pub async fn poll<S, P>(
        &mut self,
        state: LockState,
        code: &UnlockCode,
        sounder: &mut S,
        display: &mut StatusDisplay<P>,
    ) -> Result<Option<ToggleRequest>>
    where
        S: Sounder,
        P: TextPanel,
    {
        let Some(key) = self.port.poll_key().await? else {
            return Ok(None);
        };
        self.last_key_at = Some(Instant::now());

        match key {
            KeypadKey::Digit(_) => {
                self.buffer.push(key.to_char());
                trace!(len = self.buffer.len(), "keypad digit buffered");
                display.show(&self.buffer).await?;
                cues::play(sounder, Cue::KeyTick).await?;
                Ok(None)
            }
            KeypadKey::Hash => {
                let matched = code.matches_text(&self.buffer);
                self.buffer.clear();

                if matched && state.is_locked() {
                    debug!("keypad submission accepted");
                    Ok(Some(ToggleRequest::new(
                        ToggleSource::Keypad,
                        TogglePolicy::OnlyIfLocked,
                        true,
                    )))
                } else {
                    debug!(matched, state = %state, "keypad submission rejected");
                    cues::play(sounder, Cue::Lock).await?;
                    display
                        .show_temporary(WRONG_CODE_MESSAGE, self.message_hold)
                        .await?;
                    Ok(None)
                }
            }
            KeypadKey::Star => {
                self.buffer.clear();
                if !state.is_locked() {
                    debug!("keypad force-lock");
                    Ok(Some(ToggleRequest::new(
                        ToggleSource::Keypad,
                        TogglePolicy::OnlyIfUnlocked,
                        false,
                    )))
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Discard the entry if the inactivity window has elapsed since the last
    /// key. Restores the idle display. Returns `true` if a sweep happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be driven.
    pub async fn sweep<P: TextPanel>(&mut self, display: &mut StatusDisplay<P>) -> Result<bool> {
        if let Some(last_key_at) = self.last_key_at
            && last_key_at.elapsed() >= self.inactivity_window
        {
            debug!(
                discarded = self.buffer.len(),
                "keypad entry timed out"
            );
            self.last_key_at = None;
            self.buffer.clear();
            display.reset_idle().await?;
            return Ok(true);
        }
        Ok(false)
    }
}
