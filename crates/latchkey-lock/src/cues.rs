//! Audible cue patterns.
//!
//! Cues are composed from single sounder pulses: one long pulse when the
//! lock engages, three short pulses with gaps when it releases, and a brief
//! tick for each accepted keypad digit. The gaps are slept here, so playing
//! a cue occupies the scheduler tick for the pattern's full duration — the
//! same as the reference firmware, where cue playback was inline.

use latchkey_core::constants::{
    KEY_TICK_PULSE, LOCK_PULSE, UNLOCK_PULSE, UNLOCK_PULSE_COUNT, UNLOCK_PULSE_GAP,
};
use latchkey_hardware::{Result, Sounder};

/// The audible patterns the system can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Single long pulse: the lock engaged.
    Lock,

    /// Three short pulses: the lock released.
    Unlock,

    /// Brief tick: a keypad digit was accepted.
    KeyTick,
}

/// Play a cue through the sounder.
///
/// # Errors
///
/// Returns an error if the sounder cannot be driven.
pub async fn play<S: Sounder>(sounder: &mut S, cue: Cue) -> Result<()> {
    match cue {
        Cue::Lock => sounder.pulse(LOCK_PULSE).await,
        Cue::Unlock => {
            for _ in 0..UNLOCK_PULSE_COUNT {
                sounder.pulse(UNLOCK_PULSE).await?;
                tokio::time::sleep(UNLOCK_PULSE_GAP).await;
            }
            Ok(())
        }
        Cue::KeyTick => sounder.pulse(KEY_TICK_PULSE).await,
    }
}
