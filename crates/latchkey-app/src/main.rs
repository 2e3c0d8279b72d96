//! latchkey binary: wire the channels to simulated peripherals and run the
//! scheduler.
//!
//! Real GPIO, OLED, and radio backends slot in behind the hardware traits;
//! this binary runs the full arbitration core against the mock devices, with
//! the HTTP front end live on the configured address.

use std::path::Path;

use anyhow::Context as _;
use tracing::info;
use tracing_subscriber::EnvFilter;

use latchkey_app::{AppContext, Config, LogNotifier, Scheduler};
use latchkey_ble::BleCommandSink;
use latchkey_hardware::mock::{
    Journal, MockActuator, MockButton, MockKeypad, MockLamp, MockLink, MockPanel, MockSounder,
};
use latchkey_hardware::{EdgeDetector, Peripherals};
use latchkey_http::HttpService;
use latchkey_keypad::KeypadChannel;
use latchkey_lock::{LockController, StatusDisplay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "latchkey.json".to_string());
    let config = Config::load(Path::new(&config_path))?;

    info!(version = latchkey_core::VERSION, "latchkey starting");
    info!(ssid = %config.wifi.ssid, "wifi station configured");
    info!(
        name = %config.ble.device_name,
        service = %config.ble.service_uuid,
        "ble service configured"
    );

    let journal = Journal::new();
    let (button, button_handle) = MockButton::new();
    let (keypad, keypad_handle) = MockKeypad::new();
    let (link, link_handle) = MockLink::new();

    // A lock with no user feedback must not run: display init is fatal.
    let mut display = StatusDisplay::new(MockPanel::new(&journal));
    display
        .init()
        .await
        .context("display initialization failed")?;

    let periph = Peripherals::new(
        MockActuator::new(&journal),
        MockLamp::new(&journal),
        MockSounder::new(&journal),
    );

    let ble = BleCommandSink::new();
    // Registered with the radio stack; kept alive for the process lifetime.
    let callbacks = ble.callbacks();

    let http = HttpService::bind(config.http.bind_addr).await?;
    info!(addr = %http.local_addr()?, "http front end ready");

    let ctx = AppContext {
        controller: LockController::new(),
        display,
        periph,
        button: EdgeDetector::new(button),
        keypad: KeypadChannel::new(keypad),
        ble,
        notifier: LogNotifier,
        link,
        http,
        code: config.unlock_code,
    };

    // The simulated input handles stand in for the GPIO/radio backends and
    // must outlive the scheduler.
    let _io = (button_handle, keypad_handle, link_handle, callbacks, journal);

    Scheduler::new(ctx).run().await?;
    Ok(())
}
