//! Common types shared across hardware device implementations.

use serde::{Deserialize, Serialize};

/// Generic device information.
///
/// Contains metadata about a hardware device such as name, model,
/// and firmware version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "SSD1306", "MockKeypad").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            firmware_version: None,
        }
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// Render size tier for the status panel.
///
/// The panel is small; long messages drop to a smaller glyph size so they
/// still fit. The tier rule matches the shipped display helper: anything over
/// 20 characters renders small, over 10 renders medium, otherwise large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

impl TextSize {
    /// Pick the size tier for a message.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_hardware::TextSize;
    ///
    /// assert_eq!(TextSize::for_message("1234"), TextSize::Large);
    /// assert_eq!(TextSize::for_message("WRONG CODE!"), TextSize::Medium);
    /// assert_eq!(TextSize::for_message("a much longer message"), TextSize::Small);
    /// ```
    #[must_use]
    pub fn for_message(text: &str) -> Self {
        let len = text.chars().count();
        if len > 20 {
            TextSize::Small
        } else if len > 10 {
            TextSize::Medium
        } else {
            TextSize::Large
        }
    }
}
