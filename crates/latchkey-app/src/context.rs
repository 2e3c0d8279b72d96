//! Explicit application context.
//!
//! Everything the scheduler touches lives here, passed by `&mut` into each
//! poll — the controller, the feedback surfaces, and one channel per input
//! source. There are no ambient globals; the one cross-context value (the
//! BLE receive mailbox) is owned by the BLE sink and shared only with the
//! callbacks object handed to the radio stack.

use tracing::info;

use latchkey_ble::{BleCommandSink, NotifySink, Result as BleResult};
use latchkey_core::UnlockCode;
use latchkey_hardware::{
    ButtonInput, EdgeDetector, IndicatorLamp, KeypadPort, LockActuator, NetworkLink, Peripherals,
    Sounder, TextPanel,
};
use latchkey_http::HttpService;
use latchkey_keypad::KeypadChannel;
use latchkey_lock::{LockController, StatusDisplay};

/// The full set of state the scheduler owns.
///
/// Generic over the device backends so the same wiring runs against mocks in
/// tests and real drivers on hardware.
pub struct AppContext<A, L, S, P, B, K, W, N>
where
    A: LockActuator,
    L: IndicatorLamp,
    S: Sounder,
    P: TextPanel,
    B: ButtonInput,
    K: KeypadPort,
    W: NetworkLink,
    N: NotifySink,
{
    /// Sole writer of the lock state.
    pub controller: LockController,

    /// Status panel with transient-message handling.
    pub display: StatusDisplay<P>,

    /// Actuator, indicator, and sounder outputs.
    pub periph: Peripherals<A, L, S>,

    /// Push-button channel.
    pub button: EdgeDetector<B>,

    /// Keypad entry channel.
    pub keypad: KeypadChannel<K>,

    /// BLE command sink (mailbox consumer side).
    pub ble: BleCommandSink,

    /// Outbound notify sink for the BLE tick to drain into.
    pub notifier: N,

    /// WiFi station link.
    pub link: W,

    /// HTTP front end.
    pub http: HttpService,

    /// The shared unlock code.
    pub code: UnlockCode,
}

/// Notify sink that just logs the payload.
///
/// Stands in for the radio's notify characteristic when no central is being
/// driven, mirroring the serial echo the reference firmware printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotifySink for LogNotifier {
    fn notify(&mut self, payload: &str) -> BleResult<()> {
        info!(payload, "ble notify");
        Ok(())
    }
}
