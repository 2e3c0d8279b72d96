//! Lock state controller.
//!
//! The controller is the sole writer of [`LockState`]. Input channels
//! propose transitions as [`ToggleRequest`]s; the controller evaluates the
//! request's policy against the current state and, on acceptance, applies
//! the side effects in a fixed order: actuator, then indicator, then the
//! audible cue, then the display message. The actuator runs first so the
//! reported state is never observably ahead of the mechanical change.
//!
//! A rejected request has no side effects at all; channel-specific feedback
//! for rejections (for example the keypad's "WRONG CODE" notice) belongs to
//! the channel, not here.
//!
//! # Examples
//!
//! ```
//! use latchkey_core::{LockState, ToggleRequest, ToggleSource};
//! use latchkey_hardware::Peripherals;
//! use latchkey_hardware::mock::{Journal, MockActuator, MockLamp, MockPanel, MockSounder};
//! use latchkey_lock::{LockController, StatusDisplay};
//!
//! # async fn example() -> latchkey_hardware::Result<()> {
//! let journal = Journal::new();
//! let mut periph = Peripherals::new(
//!     MockActuator::new(&journal),
//!     MockLamp::new(&journal),
//!     MockSounder::new(&journal),
//! );
//! let mut display = StatusDisplay::new(MockPanel::new(&journal));
//! display.init().await?;
//!
//! let mut controller = LockController::new();
//! assert_eq!(controller.state(), LockState::Unlocked);
//!
//! let request = ToggleRequest::unconditional(ToggleSource::Button);
//! assert!(controller.toggle(&request, &mut periph, &mut display).await?);
//! assert_eq!(controller.state(), LockState::Locked);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tracing::{debug, info};

use latchkey_core::constants::MESSAGE_HOLD;
use latchkey_core::{LockState, ToggleRequest};
use latchkey_hardware::{
    IndicatorLamp, LockActuator, Peripherals, Result, Sounder, TextPanel,
};

use crate::cues::{self, Cue};
use crate::display::StatusDisplay;

/// Single source of truth for the lock position.
#[derive(Debug)]
pub struct LockController {
    state: LockState,

    /// How long the state-change message stays on the display.
    message_hold: Duration,
}

impl LockController {
    /// Create a controller in the boot state (`Unlocked`).
    pub fn new() -> Self {
        Self {
            state: LockState::default(),
            message_hold: MESSAGE_HOLD,
        }
    }

    /// Create a controller with a custom display hold (shortened in tests).
    pub fn with_message_hold(message_hold: Duration) -> Self {
        Self {
            message_hold,
            ..Self::new()
        }
    }

    /// Current lock state.
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Evaluate a toggle request and, if its policy holds, flip the state
    /// and apply the side effects in order: actuator, indicator, audible
    /// cue, display message.
    ///
    /// Returns whether a transition occurred. A rejected request changes
    /// nothing and drives nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a sink cannot be driven. The state flip happens
    /// before the first sink call, matching the reference firmware where the
    /// flag and the outputs were written in one uninterruptible stretch.
    pub async fn toggle<A, L, S, P>(
        &mut self,
        request: &ToggleRequest,
        periph: &mut Peripherals<A, L, S>,
        display: &mut StatusDisplay<P>,
    ) -> Result<bool>
    where
        A: LockActuator,
        L: IndicatorLamp,
        S: Sounder,
        P: TextPanel,
    {
        if !request.policy.permits(self.state) {
            debug!(
                source = %request.source,
                state = %self.state,
                policy = ?request.policy,
                "toggle request rejected by policy"
            );
            return Ok(false);
        }

        self.state = self.state.toggled();
        let engaged = self.state.is_locked();

        periph.actuator.set_engaged(engaged).await?;
        periph.lamp.set_lit(engaged).await?;
        let cue = if engaged { Cue::Lock } else { Cue::Unlock };
        cues::play(&mut periph.sounder, cue).await?;
        display
            .show_temporary(self.state.display_text(), self.message_hold)
            .await?;

        info!(source = %request.source, state = %self.state, "lock state changed");
        Ok(true)
    }
}

impl Default for LockController {
    fn default() -> Self {
        Self::new()
    }
}
