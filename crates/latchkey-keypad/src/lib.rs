//! Buffered numeric entry from the matrix keypad.
//!
//! The channel accumulates digits into an entry buffer, echoing the buffer
//! to the display and ticking the sounder per accepted digit. `#` submits
//! the buffer against the unlock code, `*` forces the lock closed without a
//! code, and an inactivity sweep discards a stale half-typed entry.
//!
//! The channel never writes lock state itself; a successful submission is
//! returned as a [`ToggleRequest`] for the scheduler to hand to the
//! controller. Rejection feedback (the lock cue and the "WRONG CODE"
//! notice) is played here, because the controller only produces feedback
//! for accepted transitions.

pub mod channel;

pub use channel::KeypadChannel;
