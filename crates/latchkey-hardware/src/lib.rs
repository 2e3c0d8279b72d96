//! Hardware abstraction layer for the latchkey controller.
//!
//! This crate defines the trait seams between the arbitration core and the
//! physical collaborators it drives — the lock actuator, indicator LED,
//! buzzer, display panel, push-button, keypad matrix, and WiFi link — plus
//! mock implementations used by the test suite and the runnable binary.
//!
//! Real GPIO/I2C/radio backends live behind the (currently empty) hardware-*
//! feature flags; the core never talks to a pin directly.

pub mod button;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use button::{ButtonSample, EdgeDetector};
pub use error::{HardwareError, Result};
pub use traits::{
    ButtonInput, IndicatorLamp, KeypadKey, KeypadPort, LockActuator, NetworkLink, Peripherals,
    Sounder, TextPanel,
};
pub use types::{DeviceInfo, TextSize};
