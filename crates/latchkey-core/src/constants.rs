//! Core constants for the latchkey controller.
//!
//! This module defines the timing windows, audible cue durations, and display
//! texts shared by the input channels and the lock state controller. The
//! values mirror the behavior of the shipped firmware; changing them changes
//! observable device behavior (cue rhythm, entry timeouts, page latency), so
//! they are centralized here rather than scattered per channel.

use std::time::Duration;

// ============================================================================
// Channel timing
// ============================================================================

/// Inactivity window after which a partially-entered keypad code is discarded.
///
/// If no key is pressed for this long, the entry buffer is cleared and the
/// display returns to the idle message, regardless of how many digits were
/// typed.
pub const KEYPAD_INACTIVITY: Duration = Duration::from_millis(6000);

/// Minimum interval between two executions of the BLE tick body.
///
/// The scheduler calls the BLE sink every iteration; the sink itself gates
/// its work to at most once per this interval so a payload sitting in the
/// mailbox is evaluated exactly once even across many ready cycles.
pub const BLE_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Wall-clock budget for reading one HTTP request.
///
/// Measured from the moment a connection is accepted. If the end of the
/// header block has not been seen when this elapses, the connection is
/// dropped without a response.
pub const HTTP_CONNECTION_TIMEOUT: Duration = Duration::from_millis(2000);

/// Grace delay after the header block of a POST request.
///
/// Body bytes may still be in flight when the blank line arrives; the reader
/// pauses this long before draining whatever is available.
pub const HTTP_BODY_GRACE: Duration = Duration::from_millis(100);

// ============================================================================
// Audible cues
// ============================================================================

/// Duration of the single long pulse played when the lock engages.
pub const LOCK_PULSE: Duration = Duration::from_millis(500);

/// Duration of each short pulse played when the lock releases.
pub const UNLOCK_PULSE: Duration = Duration::from_millis(100);

/// Silence between the unlock pulses.
pub const UNLOCK_PULSE_GAP: Duration = Duration::from_millis(100);

/// Number of short pulses in the unlock pattern.
pub const UNLOCK_PULSE_COUNT: usize = 3;

/// Duration of the tick played for each accepted keypad digit.
pub const KEY_TICK_PULSE: Duration = Duration::from_millis(50);

// ============================================================================
// Display
// ============================================================================

/// How long a transient status message (state change, rejection notice) is
/// held before the display reverts to [`IDLE_MESSAGE`].
pub const MESSAGE_HOLD: Duration = Duration::from_millis(2000);

/// Text shown when nothing else is going on.
pub const IDLE_MESSAGE: &str = "SMART LOCK";

/// Text shown after a rejected keypad submission.
pub const WRONG_CODE_MESSAGE: &str = "WRONG CODE";

// ============================================================================
// HTTP form field
// ============================================================================

/// Key that introduces the PIN value in a request, query string or body.
pub const PIN_FIELD_KEY: &str = "pin=";

/// Upper bound on accumulated request bytes for a single connection.
///
/// A stream that grows past this without completing its header block is
/// treated the same as a timed-out connection.
pub const MAX_REQUEST_SIZE: usize = 64 * 1024;
