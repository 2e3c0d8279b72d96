use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Current position of the lock.
///
/// There is exactly one instance of this state in a running system, owned by
/// the lock state controller. The device boots `Unlocked` and the state is
/// not persisted across restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Bolt engaged; entry requires a matching code.
    Locked,

    /// Bolt retracted. Boot state.
    #[default]
    Unlocked,
}

impl LockState {
    /// The opposite state.
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            LockState::Locked => LockState::Unlocked,
            LockState::Unlocked => LockState::Locked,
        }
    }

    /// Returns `true` if the bolt is engaged.
    #[inline]
    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(self, LockState::Locked)
    }

    /// Human-readable state text, as shown on the display and the web page.
    #[must_use]
    pub fn display_text(self) -> &'static str {
        match self {
            LockState::Locked => "Locked",
            LockState::Unlocked => "Unlocked",
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_text())
    }
}

/// Which input channel produced a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleSource {
    Button,
    Keypad,
    Ble,
    Http,
}

impl fmt::Display for ToggleSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ToggleSource::Button => "button",
            ToggleSource::Keypad => "keypad",
            ToggleSource::Ble => "ble",
            ToggleSource::Http => "http",
        };
        write!(f, "{}", name)
    }
}

/// Precondition on the current lock state for a toggle request to be honored.
///
/// Policies let a channel express "lock" or "unlock" intent through the
/// single toggle operation: an unlock action carries `OnlyIfLocked` so it is
/// a no-op when the lock is already open, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TogglePolicy {
    /// Always flips, whatever the current state.
    Unconditional,

    /// Flips only when currently `Locked` (an unlock action).
    OnlyIfLocked,

    /// Flips only when currently `Unlocked` (a lock action).
    OnlyIfUnlocked,
}

impl TogglePolicy {
    /// Check whether this policy holds for the given pre-toggle state.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_core::{LockState, TogglePolicy};
    ///
    /// assert!(TogglePolicy::OnlyIfLocked.permits(LockState::Locked));
    /// assert!(!TogglePolicy::OnlyIfLocked.permits(LockState::Unlocked));
    /// assert!(TogglePolicy::Unconditional.permits(LockState::Unlocked));
    /// ```
    #[must_use]
    pub fn permits(self, state: LockState) -> bool {
        match self {
            TogglePolicy::Unconditional => true,
            TogglePolicy::OnlyIfLocked => state.is_locked(),
            TogglePolicy::OnlyIfUnlocked => !state.is_locked(),
        }
    }
}

/// A channel's proposal to flip the lock state.
///
/// Requests are transient: a channel constructs one during its poll and the
/// controller consumes it within the same scheduler tick. `code_matched`
/// records whether the channel verified the unlock code for this request;
/// requests that bypass the code check (button press, force-lock, absent web
/// PIN) carry `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRequest {
    pub source: ToggleSource,
    pub policy: TogglePolicy,
    pub code_matched: bool,
}

impl ToggleRequest {
    /// Create a request with an explicit policy.
    #[must_use]
    pub fn new(source: ToggleSource, policy: TogglePolicy, code_matched: bool) -> Self {
        Self {
            source,
            policy,
            code_matched,
        }
    }

    /// Create an unconditional request (no code verification involved).
    #[must_use]
    pub fn unconditional(source: ToggleSource) -> Self {
        Self::new(source, TogglePolicy::Unconditional, false)
    }
}

/// The numeric secret shared by all four input channels.
///
/// Loaded once from configuration at startup and never mutated. The compare
/// is a plaintext equality check — there is no cryptographic authentication
/// claim here — but it runs in constant time so the comparison itself leaks
/// nothing through timing.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockCode(u32);

impl UnlockCode {
    /// Wrap a configured code value.
    #[must_use]
    pub fn new(code: u32) -> Self {
        UnlockCode(code)
    }

    /// Constant-time equality against a candidate value.
    #[must_use]
    pub fn matches(&self, candidate: u32) -> bool {
        self.0.ct_eq(&candidate).into()
    }

    /// Match a textual payload the way the firmware's integer parse did:
    /// leading whitespace is ignored, the longest prefix of decimal digits is
    /// taken, and anything unparseable counts as 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_core::UnlockCode;
    ///
    /// let code = UnlockCode::new(1234);
    /// assert!(code.matches_text("1234"));
    /// assert!(code.matches_text("1234\n"));
    /// assert!(code.matches_text(" 1234 "));
    /// assert!(!code.matches_text("12345"));
    /// assert!(!code.matches_text("abcd"));
    /// assert!(!code.matches_text(""));
    /// ```
    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        let digits: String = text
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        let candidate = digits.parse::<u32>().unwrap_or(0);
        self.matches(candidate)
    }
}

impl fmt::Debug for UnlockCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Keep the secret out of logs and panic messages.
        write!(f, "UnlockCode(****)")
    }
}

impl std::str::FromStr for UnlockCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCode(format!("expected decimal digits, got '{s}'")))?;
        Ok(UnlockCode::new(code))
    }
}
